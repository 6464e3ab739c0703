//! Digest signing and signer recovery.
//!
//! Ed25519 has no ecrecover-style key recovery, so the wire format carries
//! the signer's public key next to the signature; "recovery" verifies the
//! signature against that key and derives the principal from it. A failed
//! or malformed verification yields `None` — callers branch on the
//! sentinel, nothing throws.

use countersign_types::{Digest32, Principal, PrivateKey, PublicKey, Signature};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

/// Sign a 32-byte canonical digest with a private key.
pub fn sign_digest(digest: &Digest32, private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    let sig = signing_key.sign(digest.as_bytes());
    Signature(sig.to_bytes())
}

/// Recover the principal that signed `digest`, or `None`.
///
/// Pure and deterministic. Returns `None` when the public key bytes are
/// not a valid curve point or the signature does not verify; dalek also
/// rejects non-canonical signatures, so two distinct signature encodings
/// never both verify (the nonce, not the signature bytes, is the replay
/// defense regardless).
pub fn recover_signer(
    digest: &Digest32,
    public_key: &PublicKey,
    signature: &Signature,
) -> Option<Principal> {
    let verifying_key = VerifyingKey::from_bytes(&public_key.0).ok()?;
    let dalek_sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify(digest.as_bytes(), &dalek_sig).ok()?;
    Some(Principal::from_public_key(public_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    fn digest(byte: u8) -> Digest32 {
        Digest32::new([byte; 32])
    }

    #[test]
    fn sign_and_recover() {
        let kp = generate_keypair();
        let d = digest(7);
        let sig = sign_digest(&d, &kp.private);
        let recovered = recover_signer(&d, &kp.public, &sig);
        assert_eq!(recovered, Some(Principal::from_public_key(&kp.public)));
    }

    #[test]
    fn wrong_digest_recovers_nothing() {
        let kp = generate_keypair();
        let sig = sign_digest(&digest(1), &kp.private);
        assert_eq!(recover_signer(&digest(2), &kp.public, &sig), None);
    }

    #[test]
    fn wrong_key_recovers_nothing() {
        let kp1 = generate_keypair();
        let kp2 = generate_keypair();
        let d = digest(3);
        let sig = sign_digest(&d, &kp1.private);
        assert_eq!(recover_signer(&d, &kp2.public, &sig), None);
    }

    #[test]
    fn malformed_public_key_recovers_nothing() {
        let kp = generate_keypair();
        let d = digest(4);
        let sig = sign_digest(&d, &kp.private);
        let bad_key = PublicKey([0xFF; 32]);
        assert_eq!(recover_signer(&d, &bad_key, &sig), None);
    }

    #[test]
    fn signature_deterministic() {
        let kp = keypair_from_seed(&[99u8; 32]);
        let d = digest(5);
        let sig1 = sign_digest(&d, &kp.private);
        let sig2 = sign_digest(&d, &kp.private);
        assert_eq!(sig1.0, sig2.0);
    }

    #[test]
    fn tampered_signature_recovers_nothing() {
        let kp = generate_keypair();
        let d = digest(6);
        let mut sig = sign_digest(&d, &kp.private);
        sig.0[0] ^= 0x01;
        assert_eq!(recover_signer(&d, &kp.public, &sig), None);
    }
}
