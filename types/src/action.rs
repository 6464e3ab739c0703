//! Action kinds an endorsement can authorize.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The sensitive operation an endorsement authorizes.
///
/// Each kind has a distinct wire code bound into the endorsement digest, so
/// a signature over one kind can never authorize another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Mint,
    Airdrop,
    CreateProposal,
}

impl ActionKind {
    /// One-byte code bound into the canonical digest.
    pub fn wire_code(&self) -> u8 {
        match self {
            ActionKind::Mint => 0x01,
            ActionKind::Airdrop => 0x02,
            ActionKind::CreateProposal => 0x03,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Mint => "mint",
            ActionKind::Airdrop => "airdrop",
            ActionKind::CreateProposal => "create_proposal",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mint" => Ok(ActionKind::Mint),
            "airdrop" => Ok(ActionKind::Airdrop),
            "create_proposal" => Ok(ActionKind::CreateProposal),
            other => Err(format!("unknown action kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_are_distinct() {
        let codes = [
            ActionKind::Mint.wire_code(),
            ActionKind::Airdrop.wire_code(),
            ActionKind::CreateProposal.wire_code(),
        ];
        let mut unique = codes.to_vec();
        unique.dedup();
        assert_eq!(unique.len(), codes.len());
    }
}
