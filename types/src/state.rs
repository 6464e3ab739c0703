//! Proposal identifiers and lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential proposal identifier, starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProposalId(pub u64);

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The lifecycle state of a proposal.
///
/// ```text
/// Draft ──▶ Submitted ──▶ Approved ──▶ Funded
///   │            │  └────▶ Rejected
///   └────────────┴───────▶ Cancelled
/// ```
///
/// `Funded`, `Rejected`, and `Cancelled` are terminal. Every mutating
/// operation validates its move through [`ProposalStatus::can_transition`];
/// state checks are never scattered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Created and still editable by the proposer.
    Draft,
    /// Under review; reviewers may vote until the review deadline.
    Submitted,
    /// Approval threshold reached; awaiting disbursement.
    Approved,
    /// Rejection threshold reached, or the deadline passed unresolved.
    Rejected,
    /// Disbursed. Implies `paid`.
    Funded,
    /// Withdrawn by the proposer or an admin.
    Cancelled,
}

impl ProposalStatus {
    /// Whether no further transition is permitted out of this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Funded | Self::Rejected | Self::Cancelled)
    }

    /// The transition table. All lifecycle movement goes through here.
    pub fn can_transition(from: Self, to: Self) -> bool {
        use ProposalStatus::*;
        matches!(
            (from, to),
            (Draft, Submitted)
                | (Draft, Cancelled)
                | (Submitted, Approved)
                | (Submitted, Rejected)
                | (Submitted, Cancelled)
                | (Approved, Funded)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Funded => "funded",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProposalStatus::*;

    const ALL: [ProposalStatus; 6] = [Draft, Submitted, Approved, Rejected, Funded, Cancelled];

    #[test]
    fn terminal_states_have_no_exits() {
        for from in ALL {
            if from.is_terminal() {
                for to in ALL {
                    assert!(!ProposalStatus::can_transition(from, to), "{from} -> {to}");
                }
            }
        }
    }

    #[test]
    fn no_state_reaches_draft() {
        for from in ALL {
            assert!(!ProposalStatus::can_transition(from, Draft));
        }
    }

    #[test]
    fn funded_only_from_approved() {
        for from in ALL {
            assert_eq!(
                ProposalStatus::can_transition(from, Funded),
                from == Approved
            );
        }
    }

    #[test]
    fn draft_cannot_skip_to_decision() {
        assert!(!ProposalStatus::can_transition(Draft, Approved));
        assert!(!ProposalStatus::can_transition(Draft, Rejected));
    }
}
