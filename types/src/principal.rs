//! Principal identity with `csg_` prefix.

use crate::keys::PublicKey;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A 20-byte principal identity, rendered as `csg_<40 hex chars>`.
///
/// Derived from an Ed25519 public key: the trailing 20 bytes of the key's
/// Blake2b-256 hash. Principals are map keys throughout the workspace, so
/// the type is a `Copy` array rather than a string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Principal([u8; 20]);

impl Principal {
    /// The standard prefix for rendered principals.
    pub const PREFIX: &'static str = "csg_";

    /// The all-zero sentinel. Never a valid actor; used only in tests and
    /// display contexts.
    pub const NULL: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive a principal from an Ed25519 public key.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let mut hasher = Blake2b::<U32>::new();
        hasher.update(public_key.as_bytes());
        let digest = hasher.finalize();
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest[12..32]);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

/// Failure to parse a rendered principal back into its byte form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParsePrincipalError {
    #[error("principal must start with {}", Principal::PREFIX)]
    MissingPrefix,

    #[error("principal hex is invalid: {0}")]
    InvalidHex(String),

    #[error("principal must encode 20 bytes, got {0}")]
    BadLength(usize),
}

impl FromStr for Principal {
    type Err = ParsePrincipalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix(Self::PREFIX)
            .ok_or(ParsePrincipalError::MissingPrefix)?;
        let bytes = hex::decode(body).map_err(|e| ParsePrincipalError::InvalidHex(e.to_string()))?;
        let arr: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParsePrincipalError::BadLength(bytes.len()))?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, hex::encode(self.0))
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({}{}..)", Self::PREFIX, hex::encode(&self.0[..4]))
    }
}

// Serde as the rendered string so principals work as JSON map keys.
impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PrincipalVisitor;

        impl serde::de::Visitor<'_> for PrincipalVisitor {
            type Value = Principal;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a csg_-prefixed hex string")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(PrincipalVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let key = PublicKey([7u8; 32]);
        assert_eq!(Principal::from_public_key(&key), Principal::from_public_key(&key));
    }

    #[test]
    fn different_keys_different_principals() {
        let a = Principal::from_public_key(&PublicKey([1u8; 32]));
        let b = Principal::from_public_key(&PublicKey([2u8; 32]));
        assert_ne!(a, b);
    }

    #[test]
    fn display_parse_roundtrip() {
        let p = Principal::new([0xAB; 20]);
        let parsed: Principal = p.to_string().parse().unwrap();
        assert_eq!(p, parsed);
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        let err = "abcd".parse::<Principal>().unwrap_err();
        assert_eq!(err, ParsePrincipalError::MissingPrefix);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = "csg_abcd".parse::<Principal>().unwrap_err();
        assert_eq!(err, ParsePrincipalError::BadLength(2));
    }

    #[test]
    fn parse_rejects_bad_hex() {
        assert!(matches!(
            "csg_zz".parse::<Principal>().unwrap_err(),
            ParsePrincipalError::InvalidHex(_)
        ));
    }

    #[test]
    fn null_is_null() {
        assert!(Principal::NULL.is_null());
        assert!(!Principal::new([1u8; 20]).is_null());
    }

    #[test]
    fn serde_json_uses_rendered_form() {
        let p = Principal::new([0x11; 20]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, format!("\"{p}\""));
        let back: Principal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
