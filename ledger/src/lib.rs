//! Capped balance ledger for the Countersign authorization core.
//!
//! Pure bookkeeping with invariant enforcement: the supply cap holds after
//! every mutating call, including failed ones, and every guard runs before
//! any mutation. Role and endorsement gating live in the core facade.

pub mod error;
pub mod ledger;

pub use error::LedgerError;
pub use ledger::TokenLedger;
