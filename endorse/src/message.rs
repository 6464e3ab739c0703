//! The endorsement message and its canonical digest.
//!
//! The byte layout below is the wire contract: any off-ledger signer must
//! reproduce it exactly, field for field, to produce a consumable
//! endorsement.

use crate::domain::SigningDomain;
use countersign_crypto::blake2b_256_multi;
use countersign_types::{ActionKind, Digest32, Principal, PublicKey, Signature, Timestamp};
use serde::{Deserialize, Serialize};

const MESSAGE_TAG: &[u8] = b"COUNTERSIGN_ENDORSE_V1";

/// The value an endorser signs. Constructed, signed off-band, submitted
/// once; never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndorsementMessage {
    /// The on-ledger invoker the endorsement is bound to (not the signer).
    pub caller: Principal,
    pub action: ActionKind,
    /// Digest of the action's parameters (see [`crate::payload`]).
    pub payload: Digest32,
    /// The caller's nonce at signing time.
    pub nonce: u64,
    /// Last timestamp (inclusive) at which the endorsement is valid.
    pub deadline: Timestamp,
}

impl EndorsementMessage {
    /// Canonical digest:
    /// `Blake2b-256(tag ‖ separator ‖ caller ‖ action ‖ payload ‖
    /// nonce(BE) ‖ deadline(BE))`.
    pub fn digest(&self, domain: &SigningDomain) -> Digest32 {
        let separator = domain.separator();
        let action = [self.action.wire_code()];
        let nonce = self.nonce.to_be_bytes();
        let deadline = self.deadline.to_be_bytes();
        Digest32::new(blake2b_256_multi(&[
            MESSAGE_TAG,
            separator.as_bytes(),
            self.caller.as_bytes(),
            &action,
            self.payload.as_bytes(),
            &nonce,
            &deadline,
        ]))
    }
}

/// A signature over an [`EndorsementMessage`] digest, with the signer's
/// public key carried alongside for identity recovery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEndorsement {
    pub public_key: PublicKey,
    pub signature: Signature,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> SigningDomain {
        SigningDomain::new("token", "1", 7, Principal::new([9u8; 20]))
    }

    fn message() -> EndorsementMessage {
        EndorsementMessage {
            caller: Principal::new([1u8; 20]),
            action: ActionKind::Mint,
            payload: Digest32::new([2u8; 32]),
            nonce: 0,
            deadline: Timestamp::new(1000),
        }
    }

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(message().digest(&domain()), message().digest(&domain()));
    }

    #[test]
    fn every_field_is_bound() {
        let base = message().digest(&domain());

        let mut m = message();
        m.caller = Principal::new([3u8; 20]);
        assert_ne!(m.digest(&domain()), base);

        let mut m = message();
        m.action = ActionKind::Airdrop;
        assert_ne!(m.digest(&domain()), base);

        let mut m = message();
        m.payload = Digest32::new([4u8; 32]);
        assert_ne!(m.digest(&domain()), base);

        let mut m = message();
        m.nonce = 1;
        assert_ne!(m.digest(&domain()), base);

        let mut m = message();
        m.deadline = Timestamp::new(2000);
        assert_ne!(m.digest(&domain()), base);
    }

    #[test]
    fn domain_is_bound() {
        let other = SigningDomain::new("token", "2", 7, Principal::new([9u8; 20]));
        assert_ne!(message().digest(&domain()), message().digest(&other));
    }
}
