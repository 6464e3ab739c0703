//! Endorsement protocol for the Countersign authorization core.
//!
//! An endorsement is an off-band signature by an endorser-role principal
//! over a canonical digest binding {caller, action, payload, nonce,
//! deadline} under a versioned signing domain. The engine verifies the
//! signature, checks the signer's role, and consumes the caller's nonce —
//! atomically, so a failed attempt never burns a nonce and a consumed
//! endorsement can never be replayed.

pub mod domain;
pub mod engine;
pub mod error;
pub mod message;
pub mod nonce;
pub mod payload;

pub use domain::SigningDomain;
pub use engine::{ConsumedEndorsement, EndorsementEngine};
pub use error::EndorseError;
pub use message::{EndorsementMessage, SignedEndorsement};
pub use nonce::NonceLedger;
pub use payload::{airdrop_payload, mint_payload, proposal_payload};
