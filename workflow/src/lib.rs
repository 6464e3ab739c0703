//! Threshold-reviewed proposal workflow.
//!
//! Proposals move Draft → Submitted → Approved/Rejected → Funded/Cancelled
//! under a central transition table; reviewers vote once each against
//! configurable thresholds; the funds pool pays out only on disbursement
//! of an approved, unpaid proposal.

pub mod error;
pub mod proposal;
pub mod workflow;

pub use error::WorkflowError;
pub use proposal::Proposal;
pub use workflow::ProposalWorkflow;
