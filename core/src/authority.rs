//! The authority facade — every public operation of the core.

use crate::config::DeployConfig;
use crate::error::CoreError;
use crate::snapshot::{SnapshotError, StateSnapshot};
use crate::state::{record, CoreState};
use crate::txn::transactional;
use countersign_endorse::{
    airdrop_payload, mint_payload, proposal_payload, EndorsementEngine, NonceLedger,
    SignedEndorsement, SigningDomain,
};
use countersign_ledger::TokenLedger;
use countersign_roles::RoleRegistry;
use countersign_types::{
    ActionKind, Amount, Clock, Event, EventLog, Principal, ProposalId, ProposalStatus, Role,
    Timestamp,
};
use countersign_workflow::{Proposal, ProposalWorkflow};

/// One deployed instance of the authorization core.
///
/// All state mutation goes through the methods below; each runs inside
/// the transaction boundary and either commits fully (state changes and
/// events) or not at all.
pub struct Authority {
    state: CoreState,
    engine: EndorsementEngine,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authority").finish_non_exhaustive()
    }
}

impl Authority {
    /// Deploy a new instance.
    ///
    /// Grants Admin, Minter, Pauser, and Endorser to `deployer`, then
    /// mints `initial_amount` to `initial_receiver` when both are set
    /// (cap-checked like any mint).
    pub fn new(
        deployer: Principal,
        config: DeployConfig,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CoreError> {
        let roles = RoleRegistry::bootstrap(deployer);
        let mut ledger = TokenLedger::new(
            &config.name,
            &config.symbol,
            config.cap,
            config.pause_blocks_mint,
        );
        let workflow = ProposalWorkflow::new(config.approval_threshold, config.rejection_threshold)?;

        let mut events = EventLog::new();
        for role in [Role::Admin, Role::Minter, Role::Pauser, Role::Endorser] {
            events.record(Event::RoleGranted {
                role,
                principal: deployer,
                by: deployer,
            });
        }
        if let Some(receiver) = config.initial_receiver {
            if !config.initial_amount.is_zero() {
                ledger.mint(&receiver, config.initial_amount)?;
                events.record(Event::Minted {
                    to: receiver,
                    amount: config.initial_amount,
                    total_supply: ledger.total_supply(),
                });
            }
        }

        let domain = SigningDomain::new(
            config.name.clone(),
            config.domain_version.clone(),
            config.realm,
            deployer,
        );
        tracing::info!(%deployer, name = %config.name, cap = %config.cap, "authority deployed");
        Ok(Self {
            state: CoreState {
                roles,
                nonces: NonceLedger::new(),
                ledger,
                workflow,
                events,
            },
            engine: EndorsementEngine::new(domain),
            clock,
        })
    }

    // ── Roles ────────────────────────────────────────────────────────────

    pub fn grant_role(
        &mut self,
        caller: &Principal,
        role: Role,
        principal: Principal,
    ) -> Result<(), CoreError> {
        let caller = *caller;
        transactional(&mut self.state, |state| {
            if state.roles.grant(&caller, role, principal)? {
                record(state, Event::RoleGranted {
                    role,
                    principal,
                    by: caller,
                });
            }
            Ok(())
        })
    }

    pub fn revoke_role(
        &mut self,
        caller: &Principal,
        role: Role,
        principal: &Principal,
    ) -> Result<(), CoreError> {
        let caller = *caller;
        let principal = *principal;
        transactional(&mut self.state, |state| {
            if state.roles.revoke(&caller, role, &principal)? {
                record(state, Event::RoleRevoked {
                    role,
                    principal,
                    by: caller,
                });
            }
            Ok(())
        })
    }

    // ── Balance ledger ───────────────────────────────────────────────────

    /// Legacy mint path: requires the Minter role.
    pub fn mint(
        &mut self,
        caller: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), CoreError> {
        let caller = *caller;
        let to = *to;
        transactional(&mut self.state, |state| {
            state.roles.require(Role::Minter, &caller)?;
            apply_mint(state, &to, amount)
        })
    }

    /// Endorsed mint path: consumes an endorsement for
    /// `ActionKind::Mint` over `(to, amount)` instead of requiring the
    /// Minter role.
    pub fn mint_endorsed(
        &mut self,
        caller: &Principal,
        to: &Principal,
        amount: Amount,
        deadline: Timestamp,
        endorsement: &SignedEndorsement,
    ) -> Result<(), CoreError> {
        let caller = *caller;
        let to = *to;
        let now = self.clock.now();
        let engine = &self.engine;
        transactional(&mut self.state, |state| {
            let payload = mint_payload(&to, amount);
            let consumed = engine.verify_and_consume(
                &state.roles,
                &mut state.nonces,
                &caller,
                ActionKind::Mint,
                payload,
                deadline,
                endorsement,
                now,
            )?;
            record(state, Event::EndorsementConsumed {
                caller,
                signer: consumed.signer,
                action: ActionKind::Mint,
                nonce: consumed.nonce,
            });
            apply_mint(state, &to, amount)
        })
    }

    /// Legacy airdrop path: requires the Minter role.
    pub fn airdrop(
        &mut self,
        caller: &Principal,
        recipients: &[Principal],
        amounts: &[Amount],
    ) -> Result<(), CoreError> {
        let caller = *caller;
        transactional(&mut self.state, |state| {
            state.roles.require(Role::Minter, &caller)?;
            apply_airdrop(state, recipients, amounts)
        })
    }

    /// Endorsed airdrop path: the payload commits to the full recipient
    /// and amount sequences via the two-level hash.
    pub fn airdrop_endorsed(
        &mut self,
        caller: &Principal,
        recipients: &[Principal],
        amounts: &[Amount],
        deadline: Timestamp,
        endorsement: &SignedEndorsement,
    ) -> Result<(), CoreError> {
        let caller = *caller;
        let now = self.clock.now();
        let engine = &self.engine;
        transactional(&mut self.state, |state| {
            let payload = airdrop_payload(recipients, amounts);
            let consumed = engine.verify_and_consume(
                &state.roles,
                &mut state.nonces,
                &caller,
                ActionKind::Airdrop,
                payload,
                deadline,
                endorsement,
                now,
            )?;
            record(state, Event::EndorsementConsumed {
                caller,
                signer: consumed.signer,
                action: ActionKind::Airdrop,
                nonce: consumed.nonce,
            });
            apply_airdrop(state, recipients, amounts)
        })
    }

    pub fn transfer(
        &mut self,
        caller: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), CoreError> {
        let caller = *caller;
        let to = *to;
        transactional(&mut self.state, |state| {
            state.ledger.transfer(&caller, &to, amount)?;
            record(state, Event::Transferred {
                from: caller,
                to,
                amount,
            });
            Ok(())
        })
    }

    pub fn pause(&mut self, caller: &Principal) -> Result<(), CoreError> {
        let caller = *caller;
        transactional(&mut self.state, |state| {
            state.roles.require(Role::Pauser, &caller)?;
            if state.ledger.set_paused(true) {
                record(state, Event::Paused { by: caller });
            }
            Ok(())
        })
    }

    pub fn unpause(&mut self, caller: &Principal) -> Result<(), CoreError> {
        let caller = *caller;
        transactional(&mut self.state, |state| {
            state.roles.require(Role::Pauser, &caller)?;
            if state.ledger.set_paused(false) {
                record(state, Event::Unpaused { by: caller });
            }
            Ok(())
        })
    }

    // ── Proposal workflow ────────────────────────────────────────────────

    pub fn create_proposal(
        &mut self,
        caller: &Principal,
        title: &str,
        metadata_ref: &str,
        amount: Amount,
        review_deadline: Timestamp,
    ) -> Result<ProposalId, CoreError> {
        let caller = *caller;
        let now = self.clock.now();
        transactional(&mut self.state, |state| {
            let id = state
                .workflow
                .create(caller, title, metadata_ref, amount, review_deadline, now)?;
            record(state, Event::ProposalCreated {
                id,
                proposer: caller,
                amount,
                review_deadline,
            });
            Ok(id)
        })
    }

    pub fn update_proposal(
        &mut self,
        caller: &Principal,
        id: ProposalId,
        title: &str,
        metadata_ref: &str,
        amount: Amount,
        review_deadline: Timestamp,
    ) -> Result<(), CoreError> {
        let caller = *caller;
        let now = self.clock.now();
        transactional(&mut self.state, |state| {
            state
                .workflow
                .update(&caller, id, title, metadata_ref, amount, review_deadline, now)?;
            record(state, Event::ProposalUpdated {
                id,
                proposer: caller,
            });
            Ok(())
        })
    }

    pub fn submit_proposal(&mut self, caller: &Principal, id: ProposalId) -> Result<(), CoreError> {
        let caller = *caller;
        let now = self.clock.now();
        transactional(&mut self.state, |state| {
            state.workflow.submit(&caller, id, now)?;
            record(state, Event::ProposalSubmitted {
                id,
                proposer: caller,
            });
            Ok(())
        })
    }

    /// Endorsed create-and-submit in one atomic operation. The payload
    /// commits to `(title, metadata_ref, amount, review_deadline)`.
    pub fn submit_proposal_endorsed(
        &mut self,
        caller: &Principal,
        title: &str,
        metadata_ref: &str,
        amount: Amount,
        review_deadline: Timestamp,
        deadline: Timestamp,
        endorsement: &SignedEndorsement,
    ) -> Result<ProposalId, CoreError> {
        let caller = *caller;
        let now = self.clock.now();
        let engine = &self.engine;
        transactional(&mut self.state, |state| {
            let payload = proposal_payload(title, metadata_ref, amount, review_deadline);
            let consumed = engine.verify_and_consume(
                &state.roles,
                &mut state.nonces,
                &caller,
                ActionKind::CreateProposal,
                payload,
                deadline,
                endorsement,
                now,
            )?;
            record(state, Event::EndorsementConsumed {
                caller,
                signer: consumed.signer,
                action: ActionKind::CreateProposal,
                nonce: consumed.nonce,
            });
            let id = state
                .workflow
                .create_submitted(caller, title, metadata_ref, amount, review_deadline, now)?;
            record(state, Event::ProposalCreated {
                id,
                proposer: caller,
                amount,
                review_deadline,
            });
            record(state, Event::ProposalSubmitted {
                id,
                proposer: caller,
            });
            Ok(id)
        })
    }

    /// Cancel a proposal — the proposer may cancel their own; an admin
    /// may cancel any cancellable proposal.
    pub fn cancel_proposal(&mut self, caller: &Principal, id: ProposalId) -> Result<(), CoreError> {
        let caller = *caller;
        transactional(&mut self.state, |state| {
            let is_admin = state.roles.has_role(Role::Admin, &caller);
            state.workflow.cancel(&caller, is_admin, id)?;
            record(state, Event::ProposalCancelled { id, by: caller });
            Ok(())
        })
    }

    /// Cast a review vote. Requires the Reviewer role.
    pub fn review(
        &mut self,
        caller: &Principal,
        id: ProposalId,
        approve: bool,
    ) -> Result<(), CoreError> {
        let caller = *caller;
        let now = self.clock.now();
        transactional(&mut self.state, |state| {
            state.roles.require(Role::Reviewer, &caller)?;
            let finalized = state.workflow.review(&caller, id, approve, now)?;
            let proposal = state
                .workflow
                .get(id)
                .expect("reviewed proposal exists");
            let (approvals, rejections) = (proposal.approvals, proposal.rejections);
            record(state, Event::ReviewCast {
                id,
                reviewer: caller,
                approved: approve,
                approvals,
                rejections,
            });
            if let Some(status) = finalized {
                record(state, Event::ProposalFinalized { id, status });
            }
            Ok(())
        })
    }

    /// Reject a submitted proposal whose deadline passed without a
    /// threshold being reached. Callable by anyone.
    pub fn finalize_after_deadline(&mut self, id: ProposalId) -> Result<(), CoreError> {
        let now = self.clock.now();
        transactional(&mut self.state, |state| {
            state.workflow.finalize_after_deadline(id, now)?;
            record(state, Event::ProposalFinalized {
                id,
                status: ProposalStatus::Rejected,
            });
            Ok(())
        })
    }

    /// Move value from the caller's balance into the workflow funds pool.
    pub fn deposit(&mut self, caller: &Principal, amount: Amount) -> Result<(), CoreError> {
        let caller = *caller;
        transactional(&mut self.state, |state| {
            state.ledger.debit(&caller, amount)?;
            let pool = state.workflow.deposit(amount);
            record(state, Event::PoolDeposited {
                from: caller,
                amount,
                pool,
            });
            Ok(())
        })
    }

    /// Pay out an approved, unpaid proposal from the pool.
    ///
    /// Workflow state (paid flag, status, pool) is fully mutated before
    /// the value credit is attempted; if the credit fails, the
    /// transaction boundary rolls everything back.
    pub fn disburse(&mut self, id: ProposalId) -> Result<(), CoreError> {
        transactional(&mut self.state, |state| {
            let (proposer, amount) = state.workflow.disburse(id)?;
            state.ledger.credit(&proposer, amount)?;
            let pool = state.workflow.pool();
            record(state, Event::Disbursed {
                id,
                to: proposer,
                amount,
                pool,
            });
            Ok(())
        })
    }

    /// Reconfigure the review thresholds. Requires the Admin role.
    pub fn set_thresholds(
        &mut self,
        caller: &Principal,
        approval: u32,
        rejection: u32,
    ) -> Result<(), CoreError> {
        let caller = *caller;
        transactional(&mut self.state, |state| {
            state.roles.require(Role::Admin, &caller)?;
            state.workflow.set_thresholds(approval, rejection)?;
            record(state, Event::ThresholdsChanged {
                approval,
                rejection,
                by: caller,
            });
            Ok(())
        })
    }

    // ── Views ────────────────────────────────────────────────────────────

    pub fn balance_of(&self, principal: &Principal) -> Amount {
        self.state.ledger.balance_of(principal)
    }

    pub fn total_supply(&self) -> Amount {
        self.state.ledger.total_supply()
    }

    pub fn cap(&self) -> Amount {
        self.state.ledger.cap()
    }

    pub fn is_paused(&self) -> bool {
        self.state.ledger.is_paused()
    }

    pub fn nonce_of(&self, principal: &Principal) -> u64 {
        self.state.nonces.current(principal)
    }

    pub fn has_role(&self, role: Role, principal: &Principal) -> bool {
        self.state.roles.has_role(role, principal)
    }

    pub fn role_members(&self, role: Role) -> Vec<Principal> {
        self.state.roles.members(role)
    }

    pub fn token_name(&self) -> &str {
        self.state.ledger.name()
    }

    pub fn token_symbol(&self) -> &str {
        self.state.ledger.symbol()
    }

    pub fn get_proposal(&self, id: ProposalId) -> Option<&Proposal> {
        self.state.workflow.get(id)
    }

    pub fn has_voted(&self, id: ProposalId, reviewer: &Principal) -> bool {
        self.state.workflow.has_voted(id, reviewer)
    }

    pub fn pool_balance(&self) -> Amount {
        self.state.workflow.pool()
    }

    pub fn thresholds(&self) -> (u32, u32) {
        self.state.workflow.thresholds()
    }

    pub fn events(&self) -> &[Event] {
        self.state.events.as_slice()
    }

    /// The signing domain off-ledger endorsers must reproduce.
    pub fn domain(&self) -> &SigningDomain {
        self.engine.domain()
    }

    // ── Snapshots ────────────────────────────────────────────────────────

    /// Capture the full state for persistence.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(&self.state, self.clock.now())
    }

    /// Rebuild an authority from a snapshot. The domain must match the
    /// one the snapshot's deployment used, or endorsement digests will
    /// not line up.
    pub fn restore(
        snapshot: &StateSnapshot,
        domain: SigningDomain,
        clock: Box<dyn Clock>,
    ) -> Result<Self, SnapshotError> {
        let state = snapshot.restore()?;
        Ok(Self {
            state,
            engine: EndorsementEngine::new(domain),
            clock,
        })
    }
}

fn apply_mint(state: &mut CoreState, to: &Principal, amount: Amount) -> Result<(), CoreError> {
    state.ledger.mint(to, amount)?;
    let total_supply = state.ledger.total_supply();
    record(state, Event::Minted {
        to: *to,
        amount,
        total_supply,
    });
    Ok(())
}

fn apply_airdrop(
    state: &mut CoreState,
    recipients: &[Principal],
    amounts: &[Amount],
) -> Result<(), CoreError> {
    let total = state.ledger.airdrop(recipients, amounts)?;
    let total_supply = state.ledger.total_supply();
    record(state, Event::Airdropped {
        recipients: recipients.len() as u32,
        total,
        total_supply,
    });
    Ok(())
}
