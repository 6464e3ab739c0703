use proptest::prelude::*;

use countersign_types::{Amount, Digest32, Principal, Timestamp};

proptest! {
    /// Digest32 roundtrip: new -> as_bytes produces identical bytes.
    #[test]
    fn digest_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let digest = Digest32::new(bytes);
        prop_assert_eq!(digest.as_bytes(), &bytes);
    }

    /// Digest32::is_zero is true only for all-zero bytes.
    #[test]
    fn digest_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let digest = Digest32::new(bytes);
        prop_assert_eq!(digest.is_zero(), bytes == [0u8; 32]);
    }

    /// Digest32 hex display/parse roundtrip.
    #[test]
    fn digest_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let digest = Digest32::new(bytes);
        let parsed: Digest32 = digest.to_string().parse().unwrap();
        prop_assert_eq!(parsed, digest);
    }

    /// Principal display/parse roundtrip.
    #[test]
    fn principal_display_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let principal = Principal::new(bytes);
        let parsed: Principal = principal.to_string().parse().unwrap();
        prop_assert_eq!(parsed, principal);
    }

    /// Principal bincode serialization roundtrip.
    #[test]
    fn principal_bincode_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let principal = Principal::new(bytes);
        let encoded = bincode::serialize(&principal).unwrap();
        let decoded: Principal = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, principal);
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Deadline semantics: is_past only strictly after the deadline second.
    #[test]
    fn timestamp_is_past_is_strict(deadline in 0u64..1_000_000, now in 0u64..1_000_000) {
        let d = Timestamp::new(deadline);
        prop_assert_eq!(d.is_past(Timestamp::new(now)), now > deadline);
    }

    /// Amount raw roundtrip.
    #[test]
    fn amount_raw_roundtrip(raw in 0u128..u128::MAX / 2) {
        let amount = Amount::new(raw);
        prop_assert_eq!(amount.raw(), raw);
    }

    /// Amount: checked_add(a, b) == Some(a + b) when no overflow.
    #[test]
    fn amount_checked_add(a in 0u128..u128::MAX / 2, b in 0u128..u128::MAX / 2) {
        let sum = Amount::new(a).checked_add(Amount::new(b));
        prop_assert_eq!(sum, Some(Amount::new(a + b)));
    }

    /// Amount: checked_sub returns None exactly when b > a.
    #[test]
    fn amount_checked_sub_underflow(a in 0u128..1_000_000, b in 0u128..1_000_000) {
        let result = Amount::new(a).checked_sub(Amount::new(b));
        if b > a {
            prop_assert!(result.is_none());
        } else {
            prop_assert_eq!(result, Some(Amount::new(a - b)));
        }
    }

    /// Amount: saturating_sub never panics and floors at ZERO.
    #[test]
    fn amount_saturating_sub(a in 0u128..1_000_000, b in 0u128..1_000_000) {
        let result = Amount::new(a).saturating_sub(Amount::new(b));
        if b > a {
            prop_assert_eq!(result, Amount::ZERO);
        } else {
            prop_assert_eq!(result, Amount::new(a - b));
        }
    }

    /// Amount: is_zero matches raw == 0.
    #[test]
    fn amount_is_zero(raw in 0u128..1_000) {
        let amount = Amount::new(raw);
        prop_assert_eq!(amount.is_zero(), raw == 0);
    }
}
