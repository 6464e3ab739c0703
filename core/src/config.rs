//! Deployment configuration.

use countersign_types::{Amount, Principal};
use serde::{Deserialize, Serialize};

/// Constructor parameters supplied by the deployment collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Token and signing-domain name.
    pub name: String,
    pub symbol: String,
    /// Immutable supply cap.
    pub cap: Amount,
    /// Optional initial issuance, applied at deployment (must fit the cap).
    #[serde(default)]
    pub initial_receiver: Option<Principal>,
    #[serde(default)]
    pub initial_amount: Amount,
    #[serde(default = "default_threshold")]
    pub approval_threshold: u32,
    #[serde(default = "default_threshold")]
    pub rejection_threshold: u32,
    /// Whether pausing also blocks minting. Off by default: pause stops
    /// value movement, not issuance.
    #[serde(default)]
    pub pause_blocks_mint: bool,
    /// Signing-domain version label.
    #[serde(default = "default_domain_version")]
    pub domain_version: String,
    /// Environment identifier mixed into the signing domain.
    #[serde(default)]
    pub realm: u64,
}

fn default_threshold() -> u32 {
    1
}

fn default_domain_version() -> String {
    "1".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: DeployConfig = serde_json::from_str(
            r#"{"name": "Countersign Token", "symbol": "CSG", "cap": 1000000}"#,
        )
        .unwrap();
        assert_eq!(config.initial_receiver, None);
        assert_eq!(config.initial_amount, Amount::ZERO);
        assert_eq!(config.approval_threshold, 1);
        assert_eq!(config.rejection_threshold, 1);
        assert!(!config.pause_blocks_mint);
        assert_eq!(config.domain_version, "1");
        assert_eq!(config.realm, 0);
    }
}
