//! Role identifiers for permission checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named permission class.
///
/// Membership is an explicit set per role (capability lookup), not a
/// hierarchy; holding one role implies nothing about any other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May grant and revoke roles, configure thresholds, and cancel any
    /// cancellable proposal.
    Admin,
    /// May mint and airdrop directly (the legacy path).
    Minter,
    /// May pause and unpause value movement.
    Pauser,
    /// May sign off-band endorsements consumed by the endorsed paths.
    Endorser,
    /// May vote on submitted proposals.
    Reviewer,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Minter,
        Role::Pauser,
        Role::Endorser,
        Role::Reviewer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Minter => "minter",
            Role::Pauser => "pauser",
            Role::Endorser => "endorser",
            Role::Reviewer => "reviewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "minter" => Ok(Role::Minter),
            "pauser" => Ok(Role::Pauser),
            "endorser" => Ok(Role::Endorser),
            "reviewer" => Ok(Role::Reviewer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_parse_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.name().parse::<Role>().unwrap(), role);
        }
    }
}
