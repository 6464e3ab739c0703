//! The proposal record.

use countersign_types::{Amount, Principal, ProposalId, ProposalStatus, Timestamp};
use serde::{Deserialize, Serialize};

/// A funding request moving through review and disbursement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Principal,
    pub title: String,
    /// Opaque reference to off-ledger detail (URI, content hash, ...).
    pub metadata_ref: String,
    pub requested_amount: Amount,
    /// Reviews are accepted up to and including this timestamp.
    pub review_deadline: Timestamp,
    pub status: ProposalStatus,
    pub approvals: u32,
    pub rejections: u32,
    /// Set exactly once, by disbursement. `Funded` implies `paid`.
    pub paid: bool,
}
