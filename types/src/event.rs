//! Audit events — the append-only record of every applied state change.

use crate::{ActionKind, Amount, Principal, ProposalId, ProposalStatus, Role, Timestamp};
use serde::{Deserialize, Serialize};

/// One auditable state change.
///
/// Events are emitted only for operations that committed; a failed
/// operation leaves no event behind. Each variant carries the acting
/// principal and the resulting values an external observer needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    RoleGranted {
        role: Role,
        principal: Principal,
        by: Principal,
    },
    RoleRevoked {
        role: Role,
        principal: Principal,
        by: Principal,
    },
    Paused {
        by: Principal,
    },
    Unpaused {
        by: Principal,
    },
    Minted {
        to: Principal,
        amount: Amount,
        total_supply: Amount,
    },
    Airdropped {
        recipients: u32,
        total: Amount,
        total_supply: Amount,
    },
    Transferred {
        from: Principal,
        to: Principal,
        amount: Amount,
    },
    EndorsementConsumed {
        caller: Principal,
        signer: Principal,
        action: ActionKind,
        nonce: u64,
    },
    ProposalCreated {
        id: ProposalId,
        proposer: Principal,
        amount: Amount,
        review_deadline: Timestamp,
    },
    ProposalUpdated {
        id: ProposalId,
        proposer: Principal,
    },
    ProposalSubmitted {
        id: ProposalId,
        proposer: Principal,
    },
    ProposalCancelled {
        id: ProposalId,
        by: Principal,
    },
    ReviewCast {
        id: ProposalId,
        reviewer: Principal,
        approved: bool,
        approvals: u32,
        rejections: u32,
    },
    ProposalFinalized {
        id: ProposalId,
        status: ProposalStatus,
    },
    ThresholdsChanged {
        approval: u32,
        rejection: u32,
        by: Principal,
    },
    PoolDeposited {
        from: Principal,
        amount: Amount,
        pool: Amount,
    },
    Disbursed {
        id: ProposalId,
        to: Principal,
        amount: Amount,
        pool: Amount,
    },
}

/// Append-only, ordered log of [`Event`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, returning its sequence number.
    pub fn record(&mut self, event: Event) -> u64 {
        self.entries.push(event);
        (self.entries.len() - 1) as u64
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.entries
    }
}
