use countersign_types::{ProposalId, ProposalStatus};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("proposal is {status}, which does not permit this operation")]
    InvalidStatus { status: ProposalStatus },

    #[error("only the proposer may perform this operation")]
    NotProposer,

    #[error("reviewer has already voted on this proposal")]
    AlreadyVoted,

    #[error("the review deadline has passed")]
    PastDeadline,

    #[error("the review deadline has not passed yet")]
    DeadlineNotReached,

    #[error("thresholds must each be at least 1")]
    BadThreshold,

    #[error("proposal has already been paid out")]
    NothingToDisburse,

    #[error("insufficient pool: need {needed}, have {available}")]
    InsufficientPool { needed: u128, available: u128 },

    #[error("requested amount must be greater than zero")]
    ZeroAmount,
}
