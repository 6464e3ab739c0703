//! Workflow state and operations.

use crate::error::WorkflowError;
use crate::proposal::Proposal;
use countersign_types::{Amount, Principal, ProposalId, ProposalStatus, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The proposal table, vote records, funds pool, and thresholds.
///
/// Role checks live in the core facade; everything here assumes the
/// caller identity handed in has already been authenticated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProposalWorkflow {
    proposals: BTreeMap<u64, Proposal>,
    votes: HashMap<(ProposalId, Principal), bool>,
    next_id: u64,
    pool: Amount,
    approval_threshold: u32,
    rejection_threshold: u32,
}

impl ProposalWorkflow {
    pub fn new(approval_threshold: u32, rejection_threshold: u32) -> Result<Self, WorkflowError> {
        validate_thresholds(approval_threshold, rejection_threshold)?;
        Ok(Self {
            proposals: BTreeMap::new(),
            votes: HashMap::new(),
            next_id: 1,
            pool: Amount::ZERO,
            approval_threshold,
            rejection_threshold,
        })
    }

    pub fn thresholds(&self) -> (u32, u32) {
        (self.approval_threshold, self.rejection_threshold)
    }

    pub fn set_thresholds(
        &mut self,
        approval: u32,
        rejection: u32,
    ) -> Result<(), WorkflowError> {
        validate_thresholds(approval, rejection)?;
        self.approval_threshold = approval;
        self.rejection_threshold = rejection;
        Ok(())
    }

    pub fn pool(&self) -> Amount {
        self.pool
    }

    pub fn get(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(&id.0)
    }

    pub fn has_voted(&self, id: ProposalId, reviewer: &Principal) -> bool {
        self.votes.contains_key(&(id, *reviewer))
    }

    /// Create a proposal in `Draft`.
    pub fn create(
        &mut self,
        proposer: Principal,
        title: impl Into<String>,
        metadata_ref: impl Into<String>,
        requested_amount: Amount,
        review_deadline: Timestamp,
        now: Timestamp,
    ) -> Result<ProposalId, WorkflowError> {
        validate_request(requested_amount, review_deadline, now)?;
        let id = ProposalId(self.next_id);
        self.next_id += 1;
        self.proposals.insert(
            id.0,
            Proposal {
                id,
                proposer,
                title: title.into(),
                metadata_ref: metadata_ref.into(),
                requested_amount,
                review_deadline,
                status: ProposalStatus::Draft,
                approvals: 0,
                rejections: 0,
                paid: false,
            },
        );
        Ok(id)
    }

    /// Replace a draft's contents. Only the proposer, only while `Draft`.
    pub fn update(
        &mut self,
        proposer: &Principal,
        id: ProposalId,
        title: impl Into<String>,
        metadata_ref: impl Into<String>,
        requested_amount: Amount,
        review_deadline: Timestamp,
        now: Timestamp,
    ) -> Result<(), WorkflowError> {
        validate_request(requested_amount, review_deadline, now)?;
        let proposal = self.get_mut(id)?;
        require_proposer(proposal, proposer)?;
        require_status(proposal, ProposalStatus::Draft)?;
        proposal.title = title.into();
        proposal.metadata_ref = metadata_ref.into();
        proposal.requested_amount = requested_amount;
        proposal.review_deadline = review_deadline;
        Ok(())
    }

    /// Move a draft into review. Only the proposer, only while the review
    /// deadline is still in the future.
    pub fn submit(
        &mut self,
        proposer: &Principal,
        id: ProposalId,
        now: Timestamp,
    ) -> Result<(), WorkflowError> {
        let proposal = self.get_mut(id)?;
        require_proposer(proposal, proposer)?;
        if proposal.review_deadline <= now {
            return Err(WorkflowError::PastDeadline);
        }
        transition(proposal, ProposalStatus::Submitted)
    }

    /// Create and submit in one step — the endorsed path.
    pub fn create_submitted(
        &mut self,
        proposer: Principal,
        title: impl Into<String>,
        metadata_ref: impl Into<String>,
        requested_amount: Amount,
        review_deadline: Timestamp,
        now: Timestamp,
    ) -> Result<ProposalId, WorkflowError> {
        let id = self.create(
            proposer,
            title,
            metadata_ref,
            requested_amount,
            review_deadline,
            now,
        )?;
        let proposal = self.get_mut(id)?;
        transition(proposal, ProposalStatus::Submitted)?;
        Ok(id)
    }

    /// Withdraw a proposal. The proposer may cancel their own; an admin
    /// may cancel any cancellable proposal.
    pub fn cancel(
        &mut self,
        caller: &Principal,
        is_admin: bool,
        id: ProposalId,
    ) -> Result<(), WorkflowError> {
        let proposal = self.get_mut(id)?;
        if !is_admin {
            require_proposer(proposal, caller)?;
        }
        transition(proposal, ProposalStatus::Cancelled)
    }

    /// Cast a review vote. Returns the terminal status if this vote
    /// crossed a threshold.
    pub fn review(
        &mut self,
        reviewer: &Principal,
        id: ProposalId,
        approve: bool,
        now: Timestamp,
    ) -> Result<Option<ProposalStatus>, WorkflowError> {
        let approval_threshold = self.approval_threshold;
        let rejection_threshold = self.rejection_threshold;
        if self.has_voted(id, reviewer) {
            // Checked against the vote table before touching the proposal
            // so a stale vote on a finalized proposal still reads as such.
            let proposal = self.get_ref(id)?;
            require_status(proposal, ProposalStatus::Submitted)?;
            return Err(WorkflowError::AlreadyVoted);
        }
        let proposal = self.get_mut(id)?;
        require_status(proposal, ProposalStatus::Submitted)?;
        if proposal.review_deadline.is_past(now) {
            return Err(WorkflowError::PastDeadline);
        }

        if approve {
            proposal.approvals += 1;
        } else {
            proposal.rejections += 1;
        }

        // First threshold crossed wins; thresholds are checked after each
        // single vote, so both can never be satisfied at once.
        let finalized = if proposal.approvals >= approval_threshold {
            transition(proposal, ProposalStatus::Approved)?;
            Some(ProposalStatus::Approved)
        } else if proposal.rejections >= rejection_threshold {
            transition(proposal, ProposalStatus::Rejected)?;
            Some(ProposalStatus::Rejected)
        } else {
            None
        };
        self.votes.insert((id, *reviewer), approve);
        Ok(finalized)
    }

    /// Reject a submitted proposal whose deadline passed without either
    /// threshold being reached. Callable by anyone.
    pub fn finalize_after_deadline(
        &mut self,
        id: ProposalId,
        now: Timestamp,
    ) -> Result<(), WorkflowError> {
        let proposal = self.get_mut(id)?;
        require_status(proposal, ProposalStatus::Submitted)?;
        if !proposal.review_deadline.is_past(now) {
            return Err(WorkflowError::DeadlineNotReached);
        }
        transition(proposal, ProposalStatus::Rejected)
    }

    /// Add value to the funds pool. Returns the new pool balance.
    pub fn deposit(&mut self, amount: Amount) -> Amount {
        self.pool = self
            .pool
            .checked_add(amount)
            .expect("pool cannot overflow: bounded by total supply");
        self.pool
    }

    /// Pay out an approved, unpaid proposal.
    ///
    /// All workflow state (paid flag, status, pool) is mutated before
    /// returning; the caller performs the actual value credit strictly
    /// afterwards, and rolls the whole operation back if that fails.
    pub fn disburse(&mut self, id: ProposalId) -> Result<(Principal, Amount), WorkflowError> {
        let pool = self.pool;
        let proposal = self.get_mut(id)?;
        // Paid is checked first so a repeat disbursement reads as "nothing
        // to disburse" rather than a generic status failure.
        if proposal.paid {
            return Err(WorkflowError::NothingToDisburse);
        }
        require_status(proposal, ProposalStatus::Approved)?;
        let amount = proposal.requested_amount;
        let remaining = pool
            .checked_sub(amount)
            .ok_or(WorkflowError::InsufficientPool {
                needed: amount.raw(),
                available: pool.raw(),
            })?;

        proposal.paid = true;
        transition(proposal, ProposalStatus::Funded)?;
        let proposer = proposal.proposer;
        self.pool = remaining;
        Ok((proposer, amount))
    }

    fn get_ref(&self, id: ProposalId) -> Result<&Proposal, WorkflowError> {
        self.proposals
            .get(&id.0)
            .ok_or(WorkflowError::ProposalNotFound(id))
    }

    fn get_mut(&mut self, id: ProposalId) -> Result<&mut Proposal, WorkflowError> {
        self.proposals
            .get_mut(&id.0)
            .ok_or(WorkflowError::ProposalNotFound(id))
    }
}

/// The single gate every lifecycle movement goes through.
fn transition(proposal: &mut Proposal, to: ProposalStatus) -> Result<(), WorkflowError> {
    if !ProposalStatus::can_transition(proposal.status, to) {
        return Err(WorkflowError::InvalidStatus {
            status: proposal.status,
        });
    }
    tracing::debug!(id = %proposal.id, from = %proposal.status, %to, "proposal transition");
    proposal.status = to;
    Ok(())
}

fn require_status(proposal: &Proposal, status: ProposalStatus) -> Result<(), WorkflowError> {
    if proposal.status != status {
        return Err(WorkflowError::InvalidStatus {
            status: proposal.status,
        });
    }
    Ok(())
}

fn require_proposer(proposal: &Proposal, caller: &Principal) -> Result<(), WorkflowError> {
    if proposal.proposer != *caller {
        return Err(WorkflowError::NotProposer);
    }
    Ok(())
}

fn validate_thresholds(approval: u32, rejection: u32) -> Result<(), WorkflowError> {
    if approval == 0 || rejection == 0 {
        return Err(WorkflowError::BadThreshold);
    }
    Ok(())
}

fn validate_request(
    amount: Amount,
    review_deadline: Timestamp,
    now: Timestamp,
) -> Result<(), WorkflowError> {
    if amount.is_zero() {
        return Err(WorkflowError::ZeroAmount);
    }
    if review_deadline <= now {
        return Err(WorkflowError::PastDeadline);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(byte: u8) -> Principal {
        Principal::new([byte; 20])
    }

    fn workflow() -> ProposalWorkflow {
        ProposalWorkflow::new(2, 2).unwrap()
    }

    fn draft(wf: &mut ProposalWorkflow, proposer: Principal) -> ProposalId {
        wf.create(
            proposer,
            "repair the well",
            "ipfs://details",
            Amount::new(500),
            Timestamp::new(1000),
            Timestamp::new(0),
        )
        .unwrap()
    }

    fn submitted(wf: &mut ProposalWorkflow, proposer: Principal) -> ProposalId {
        let id = draft(wf, proposer);
        wf.submit(&proposer, id, Timestamp::new(1)).unwrap();
        id
    }

    #[test]
    fn thresholds_must_be_positive() {
        assert_eq!(ProposalWorkflow::new(0, 1).unwrap_err(), WorkflowError::BadThreshold);
        assert_eq!(ProposalWorkflow::new(1, 0).unwrap_err(), WorkflowError::BadThreshold);
        let mut wf = workflow();
        assert_eq!(wf.set_thresholds(0, 3).unwrap_err(), WorkflowError::BadThreshold);
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let mut wf = workflow();
        let a = draft(&mut wf, principal(1));
        let b = draft(&mut wf, principal(1));
        assert_eq!(a, ProposalId(1));
        assert_eq!(b, ProposalId(2));
        assert_eq!(wf.get(a).unwrap().status, ProposalStatus::Draft);
    }

    #[test]
    fn create_rejects_zero_amount_and_past_deadline() {
        let mut wf = workflow();
        let err = wf
            .create(principal(1), "t", "m", Amount::ZERO, Timestamp::new(10), Timestamp::new(0))
            .unwrap_err();
        assert_eq!(err, WorkflowError::ZeroAmount);

        let err = wf
            .create(principal(1), "t", "m", Amount::new(1), Timestamp::new(5), Timestamp::new(5))
            .unwrap_err();
        assert_eq!(err, WorkflowError::PastDeadline);
    }

    #[test]
    fn update_only_by_proposer_and_only_draft() {
        let mut wf = workflow();
        let proposer = principal(1);
        let id = draft(&mut wf, proposer);

        let err = wf
            .update(&principal(2), id, "x", "y", Amount::new(1), Timestamp::new(999), Timestamp::new(0))
            .unwrap_err();
        assert_eq!(err, WorkflowError::NotProposer);

        wf.update(&proposer, id, "new title", "m", Amount::new(700), Timestamp::new(999), Timestamp::new(0))
            .unwrap();
        assert_eq!(wf.get(id).unwrap().title, "new title");
        assert_eq!(wf.get(id).unwrap().requested_amount, Amount::new(700));

        wf.submit(&proposer, id, Timestamp::new(1)).unwrap();
        let err = wf
            .update(&proposer, id, "late", "m", Amount::new(1), Timestamp::new(999), Timestamp::new(0))
            .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidStatus {
                status: ProposalStatus::Submitted,
            }
        );
    }

    #[test]
    fn submit_requires_future_deadline() {
        let mut wf = workflow();
        let proposer = principal(1);
        let id = draft(&mut wf, proposer);
        let err = wf.submit(&proposer, id, Timestamp::new(1000)).unwrap_err();
        assert_eq!(err, WorkflowError::PastDeadline);
        assert_eq!(wf.get(id).unwrap().status, ProposalStatus::Draft);
    }

    #[test]
    fn create_submitted_lands_in_review() {
        let mut wf = workflow();
        let id = wf
            .create_submitted(principal(1), "t", "m", Amount::new(10), Timestamp::new(100), Timestamp::new(0))
            .unwrap();
        assert_eq!(wf.get(id).unwrap().status, ProposalStatus::Submitted);
    }

    #[test]
    fn cancel_by_proposer_and_admin() {
        let mut wf = workflow();
        let proposer = principal(1);

        let id = draft(&mut wf, proposer);
        wf.cancel(&proposer, false, id).unwrap();
        assert_eq!(wf.get(id).unwrap().status, ProposalStatus::Cancelled);

        let id = submitted(&mut wf, proposer);
        let err = wf.cancel(&principal(9), false, id).unwrap_err();
        assert_eq!(err, WorkflowError::NotProposer);
        wf.cancel(&principal(9), true, id).unwrap();
        assert_eq!(wf.get(id).unwrap().status, ProposalStatus::Cancelled);
    }

    #[test]
    fn approval_lands_exactly_on_threshold() {
        let mut wf = workflow();
        let id = submitted(&mut wf, principal(1));

        let first = wf.review(&principal(10), id, true, Timestamp::new(2)).unwrap();
        assert_eq!(first, None);
        assert_eq!(wf.get(id).unwrap().status, ProposalStatus::Submitted);

        let second = wf.review(&principal(11), id, true, Timestamp::new(3)).unwrap();
        assert_eq!(second, Some(ProposalStatus::Approved));
        assert_eq!(wf.get(id).unwrap().status, ProposalStatus::Approved);
        assert_eq!(wf.get(id).unwrap().approvals, 2);
    }

    #[test]
    fn rejection_threshold_wins_when_crossed_first() {
        let mut wf = workflow();
        let id = submitted(&mut wf, principal(1));
        wf.review(&principal(10), id, false, Timestamp::new(2)).unwrap();
        let outcome = wf.review(&principal(11), id, false, Timestamp::new(3)).unwrap();
        assert_eq!(outcome, Some(ProposalStatus::Rejected));
    }

    #[test]
    fn reviewer_votes_at_most_once() {
        let mut wf = workflow();
        let id = submitted(&mut wf, principal(1));
        let reviewer = principal(10);
        wf.review(&reviewer, id, true, Timestamp::new(2)).unwrap();
        let err = wf.review(&reviewer, id, false, Timestamp::new(3)).unwrap_err();
        assert_eq!(err, WorkflowError::AlreadyVoted);
        assert_eq!(wf.get(id).unwrap().approvals, 1);
        assert_eq!(wf.get(id).unwrap().rejections, 0);
    }

    #[test]
    fn review_closed_after_deadline() {
        let mut wf = workflow();
        let id = submitted(&mut wf, principal(1));
        let err = wf
            .review(&principal(10), id, true, Timestamp::new(1001))
            .unwrap_err();
        assert_eq!(err, WorkflowError::PastDeadline);
    }

    #[test]
    fn finalize_after_deadline_rejects() {
        let mut wf = workflow();
        let id = submitted(&mut wf, principal(1));
        wf.review(&principal(10), id, true, Timestamp::new(2)).unwrap();

        let err = wf.finalize_after_deadline(id, Timestamp::new(500)).unwrap_err();
        assert_eq!(err, WorkflowError::DeadlineNotReached);

        wf.finalize_after_deadline(id, Timestamp::new(1001)).unwrap();
        assert_eq!(wf.get(id).unwrap().status, ProposalStatus::Rejected);

        // The proposal is terminal now; a late vote reads as InvalidStatus.
        let err = wf
            .review(&principal(11), id, true, Timestamp::new(1002))
            .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidStatus {
                status: ProposalStatus::Rejected,
            }
        );
    }

    #[test]
    fn terminal_proposals_cannot_move() {
        let mut wf = workflow();
        let proposer = principal(1);
        let id = submitted(&mut wf, proposer);
        wf.cancel(&proposer, false, id).unwrap();

        assert!(wf.submit(&proposer, id, Timestamp::new(1)).is_err());
        assert!(wf.cancel(&proposer, false, id).is_err());
        assert!(wf.finalize_after_deadline(id, Timestamp::new(2000)).is_err());
        assert!(wf.disburse(id).is_err());
    }

    #[test]
    fn disburse_pays_once_from_a_sufficient_pool() {
        let mut wf = workflow();
        let proposer = principal(1);
        let id = submitted(&mut wf, proposer);
        wf.review(&principal(10), id, true, Timestamp::new(2)).unwrap();
        wf.review(&principal(11), id, true, Timestamp::new(3)).unwrap();

        let err = wf.disburse(id).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InsufficientPool {
                needed: 500,
                available: 0,
            }
        );

        wf.deposit(Amount::new(600));
        let (to, amount) = wf.disburse(id).unwrap();
        assert_eq!(to, proposer);
        assert_eq!(amount, Amount::new(500));
        assert_eq!(wf.pool(), Amount::new(100));
        let proposal = wf.get(id).unwrap();
        assert!(proposal.paid);
        assert_eq!(proposal.status, ProposalStatus::Funded);

        // Funded implies paid; a second disbursement has nothing to pay.
        let err = wf.disburse(id).unwrap_err();
        assert_eq!(err, WorkflowError::NothingToDisburse);
    }

    #[test]
    fn disburse_requires_approved() {
        let mut wf = workflow();
        let id = submitted(&mut wf, principal(1));
        wf.deposit(Amount::new(1000));
        let err = wf.disburse(id).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidStatus {
                status: ProposalStatus::Submitted,
            }
        );
        assert_eq!(wf.pool(), Amount::new(1000));
    }

    #[test]
    fn vote_counts_bound_by_distinct_reviewers() {
        let mut wf = workflow();
        wf.set_thresholds(10, 10).unwrap();
        let id = submitted(&mut wf, principal(1));
        for i in 0..5u8 {
            wf.review(&principal(100 + i), id, i % 2 == 0, Timestamp::new(2))
                .unwrap();
        }
        let proposal = wf.get(id).unwrap();
        assert_eq!(proposal.approvals + proposal.rejections, 5);
    }
}
