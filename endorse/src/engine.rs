//! Verify-and-consume — the single entry point for endorsed authorization.

use crate::domain::SigningDomain;
use crate::error::EndorseError;
use crate::message::{EndorsementMessage, SignedEndorsement};
use crate::nonce::NonceLedger;
use countersign_crypto::recover_signer;
use countersign_roles::RoleRegistry;
use countersign_types::{ActionKind, Digest32, Principal, Role, Timestamp};

/// The result of a successfully consumed endorsement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsumedEndorsement {
    /// The nonce value that was consumed.
    pub nonce: u64,
    /// The endorser who signed.
    pub signer: Principal,
}

/// Stateless verification engine bound to one signing domain.
pub struct EndorsementEngine {
    domain: SigningDomain,
}

impl EndorsementEngine {
    pub fn new(domain: SigningDomain) -> Self {
        Self { domain }
    }

    pub fn domain(&self) -> &SigningDomain {
        &self.domain
    }

    /// Verify an endorsement for `caller` and consume the caller's nonce.
    ///
    /// The digest is computed over the caller's *current* nonce; the nonce
    /// advances only after every check has passed, so a failed attempt
    /// never burns a nonce and a consumed endorsement never verifies
    /// again (the recomputed digest no longer matches the signature).
    pub fn verify_and_consume(
        &self,
        roles: &RoleRegistry,
        nonces: &mut NonceLedger,
        caller: &Principal,
        action: ActionKind,
        payload: Digest32,
        deadline: Timestamp,
        endorsement: &SignedEndorsement,
        now: Timestamp,
    ) -> Result<ConsumedEndorsement, EndorseError> {
        if deadline.is_past(now) {
            return Err(EndorseError::Expired { deadline, now });
        }

        let message = EndorsementMessage {
            caller: *caller,
            action,
            payload,
            nonce: nonces.current(caller),
            deadline,
        };
        let digest = message.digest(&self.domain);

        let signer = recover_signer(&digest, &endorsement.public_key, &endorsement.signature)
            .ok_or(EndorseError::BadSigner)?;
        if !roles.has_role(Role::Endorser, &signer) {
            return Err(EndorseError::BadSigner);
        }

        let nonce = nonces.consume(caller);
        tracing::debug!(%caller, %signer, %action, nonce, "endorsement consumed");
        Ok(ConsumedEndorsement { nonce, signer })
    }
}
