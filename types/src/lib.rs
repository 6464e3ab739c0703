//! Fundamental types for the Countersign authorization core.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: principals, amounts, digests, key material, roles, action
//! kinds, timestamps, proposal states, and the audit event log.

pub mod action;
pub mod amount;
pub mod digest;
pub mod event;
pub mod keys;
pub mod principal;
pub mod role;
pub mod state;
pub mod time;

pub use action::ActionKind;
pub use amount::Amount;
pub use digest::Digest32;
pub use event::{Event, EventLog};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use principal::{ParsePrincipalError, Principal};
pub use role::Role;
pub use state::{ProposalId, ProposalStatus};
pub use time::{Clock, SystemClock, Timestamp};
