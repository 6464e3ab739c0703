//! The Countersign authority — the public surface of the authorization
//! core.
//!
//! [`Authority`] owns all shared state (roles, nonces, balances,
//! proposals, events) and exposes every public operation. Each mutating
//! operation runs inside an explicit transaction boundary: it either
//! commits entirely, events included, or leaves no trace. Sensitive
//! operations are gated by role membership or by a consumed endorsement.

pub mod authority;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod state;
pub mod txn;

pub use authority::Authority;
pub use config::DeployConfig;
pub use error::CoreError;
pub use snapshot::{SnapshotError, StateSnapshot};
pub use state::CoreState;
