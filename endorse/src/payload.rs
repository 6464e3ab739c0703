//! Payload digests — fixed-size commitments to action parameters.
//!
//! Each builder is tagged so payloads of different shapes can never
//! collide. Batch payloads hash the recipients and amounts sequences
//! separately, then hash the pair, keeping the signed payload 32 bytes
//! regardless of batch length.

use countersign_crypto::{blake2b_256, blake2b_256_multi};
use countersign_types::{Amount, Digest32, Principal, Timestamp};

/// Payload for a single mint: `(to, amount)`.
pub fn mint_payload(to: &Principal, amount: Amount) -> Digest32 {
    Digest32::new(blake2b_256_multi(&[
        b"CSG_MINT",
        to.as_bytes(),
        &amount.to_be_bytes(),
    ]))
}

/// Payload for a batch airdrop: two-level hash over the recipients and
/// amounts sequences.
pub fn airdrop_payload(recipients: &[Principal], amounts: &[Amount]) -> Digest32 {
    let recipient_parts: Vec<&[u8]> = recipients.iter().map(|r| r.as_bytes().as_slice()).collect();
    let recipients_digest = blake2b_256_multi(&recipient_parts);

    let amount_bytes: Vec<[u8; 16]> = amounts.iter().map(|a| a.to_be_bytes()).collect();
    let amount_parts: Vec<&[u8]> = amount_bytes.iter().map(|b| b.as_slice()).collect();
    let amounts_digest = blake2b_256_multi(&amount_parts);

    Digest32::new(blake2b_256_multi(&[
        b"CSG_AIRDROP",
        &recipients_digest,
        &amounts_digest,
    ]))
}

/// Payload for endorsed proposal submission:
/// `(title digest, metadata digest, amount, review deadline)`.
pub fn proposal_payload(
    title: &str,
    metadata_ref: &str,
    amount: Amount,
    review_deadline: Timestamp,
) -> Digest32 {
    let title_digest = blake2b_256(title.as_bytes());
    let metadata_digest = blake2b_256(metadata_ref.as_bytes());
    Digest32::new(blake2b_256_multi(&[
        b"CSG_PROPOSAL",
        &title_digest,
        &metadata_digest,
        &amount.to_be_bytes(),
        &review_deadline.to_be_bytes(),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(byte: u8) -> Principal {
        Principal::new([byte; 20])
    }

    #[test]
    fn mint_payload_binds_both_fields() {
        let base = mint_payload(&principal(1), Amount::new(100));
        assert_ne!(base, mint_payload(&principal(2), Amount::new(100)));
        assert_ne!(base, mint_payload(&principal(1), Amount::new(101)));
    }

    #[test]
    fn airdrop_payload_is_order_sensitive() {
        let a = principal(1);
        let b = principal(2);
        let amounts = [Amount::new(10), Amount::new(20)];
        assert_ne!(
            airdrop_payload(&[a, b], &amounts),
            airdrop_payload(&[b, a], &amounts)
        );
    }

    #[test]
    fn airdrop_payload_binds_amounts() {
        let recipients = [principal(1), principal(2)];
        assert_ne!(
            airdrop_payload(&recipients, &[Amount::new(10), Amount::new(20)]),
            airdrop_payload(&recipients, &[Amount::new(10), Amount::new(21)])
        );
    }

    #[test]
    fn airdrop_payload_is_fixed_size_commitment() {
        // Same digest type regardless of batch length; distinct values.
        let small = airdrop_payload(&[principal(1)], &[Amount::new(1)]);
        let recipients: Vec<Principal> = (0..64).map(principal).collect();
        let amounts: Vec<Amount> = (0..64).map(|i| Amount::new(i as u128)).collect();
        let large = airdrop_payload(&recipients, &amounts);
        assert_ne!(small, large);
    }

    #[test]
    fn proposal_payload_binds_all_fields() {
        let base = proposal_payload("t", "m", Amount::new(5), Timestamp::new(100));
        assert_ne!(base, proposal_payload("u", "m", Amount::new(5), Timestamp::new(100)));
        assert_ne!(base, proposal_payload("t", "n", Amount::new(5), Timestamp::new(100)));
        assert_ne!(base, proposal_payload("t", "m", Amount::new(6), Timestamp::new(100)));
        assert_ne!(base, proposal_payload("t", "m", Amount::new(5), Timestamp::new(101)));
    }

    #[test]
    fn payload_kinds_never_collide() {
        // A mint payload and an airdrop payload over similar bytes differ.
        let mint = mint_payload(&principal(1), Amount::new(1));
        let airdrop = airdrop_payload(&[principal(1)], &[Amount::new(1)]);
        assert_ne!(mint, airdrop);
    }
}
