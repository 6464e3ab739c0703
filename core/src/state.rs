//! The process-wide shared state owned by the authority.

use countersign_endorse::NonceLedger;
use countersign_ledger::TokenLedger;
use countersign_roles::RoleRegistry;
use countersign_types::{Event, EventLog};
use countersign_workflow::ProposalWorkflow;
use serde::{Deserialize, Serialize};

/// Everything a deployment mutates, in one cloneable bag.
///
/// Cloneability is what makes the transaction boundary in [`crate::txn`]
/// trivial: snapshot, apply, restore on failure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoreState {
    pub roles: RoleRegistry,
    pub nonces: NonceLedger,
    pub ledger: TokenLedger,
    pub workflow: ProposalWorkflow,
    pub events: EventLog,
}

/// Append an event to the audit log and emit it on the tracing surface.
pub(crate) fn record(state: &mut CoreState, event: Event) {
    tracing::info!(?event, "state change");
    state.events.record(event);
}
