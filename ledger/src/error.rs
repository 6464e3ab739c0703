use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("cap exceeded: minting {requested} would push supply past cap {cap}")]
    CapExceeded { requested: u128, cap: u128 },

    #[error("array length mismatch: {recipients} recipients, {amounts} amounts")]
    ArrayLengthMismatch { recipients: usize, amounts: usize },

    #[error("ledger is paused")]
    Paused,

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },
}
