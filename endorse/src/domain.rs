//! Signing domain — separates endorsement digests between deployments.

use countersign_crypto::blake2b_256_multi;
use countersign_types::{Digest32, Principal};
use serde::{Deserialize, Serialize};

/// The domain an endorsement is valid for.
///
/// Two deployments that differ in any field produce disjoint digests, so
/// an endorsement signed for one can never verify under another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningDomain {
    /// Human-readable protocol instance name.
    pub name: String,
    /// Protocol version label.
    pub version: String,
    /// Environment identifier (chain/realm id equivalent).
    pub realm: u64,
    /// The verifying entity — the authority instance consuming
    /// endorsements.
    pub authority: Principal,
}

impl SigningDomain {
    const DOMAIN_TAG: &'static [u8] = b"COUNTERSIGN_DOMAIN_V1";

    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        realm: u64,
        authority: Principal,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            realm,
            authority,
        }
    }

    /// The 32-byte domain separator mixed into every endorsement digest.
    ///
    /// Variable-length fields are length-prefixed so no two field
    /// assignments can collide on the same byte stream.
    pub fn separator(&self) -> Digest32 {
        let name_len = (self.name.len() as u32).to_be_bytes();
        let version_len = (self.version.len() as u32).to_be_bytes();
        let realm = self.realm.to_be_bytes();
        Digest32::new(blake2b_256_multi(&[
            Self::DOMAIN_TAG,
            &name_len,
            self.name.as_bytes(),
            &version_len,
            self.version.as_bytes(),
            &realm,
            self.authority.as_bytes(),
        ]))
    }
}
