//! Configuration types for the CLAMM toolkit

use serde::{Deserialize, Serialize};

use crate::types::ObjectId;

/// Deployment target network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// CLAMM deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClammConfig {
    /// CLAMM package address
    pub package: ObjectId,

    /// Suitears utility package address (coin decimals registry)
    pub suitears: ObjectId,

    /// Shared coin-decimals registry object, if one has been published.
    /// When absent, pool creation builds and destroys a throwaway registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin_decimals_registry: Option<ObjectId>,

    /// Network the package is deployed on
    pub network: Network,

    /// Pool index service base URL (mainnet only)
    #[serde(default = "default_index_url")]
    pub index_url: String,
}

fn default_index_url() -> String {
    "https://api.suicoins.com/v1".to_string()
}

impl ClammConfig {
    pub fn new(package: ObjectId, suitears: ObjectId, network: Network) -> Self {
        Self {
            package,
            suitears,
            coin_decimals_registry: None,
            network,
            index_url: default_index_url(),
        }
    }

    /// Type tag of the stable curve witness
    pub fn stable_curve_type(&self) -> String {
        format!("{}::curves::Stable", self.package)
    }

    /// Type tag of the volatile curve witness
    pub fn volatile_curve_type(&self) -> String {
        format!("{}::curves::Volatile", self.package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClammConfig {
        ClammConfig::new(
            ObjectId::parse("0xa1").unwrap(),
            ObjectId::parse("0xb2").unwrap(),
            Network::Mainnet,
        )
    }

    #[test]
    fn test_curve_type_tags() {
        let config = config();
        let stable = config.stable_curve_type();
        assert!(stable.ends_with("::curves::Stable"));
        assert!(stable.starts_with(config.package.as_str()));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = config();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ClammConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.package, config.package);
        assert_eq!(parsed.network, config.network);
        assert_eq!(parsed.index_url, config.index_url);
    }
}
