use countersign_endorse::EndorseError;
use countersign_ledger::LedgerError;
use countersign_roles::RoleError;
use countersign_workflow::WorkflowError;
use thiserror::Error;

/// Aggregate error for public operations.
///
/// Every failure surfaces with its specific kind; nothing is swallowed
/// into a catch-all. A failed operation has no effect on state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error(transparent)]
    Role(#[from] RoleError),

    #[error(transparent)]
    Endorse(#[from] EndorseError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}
