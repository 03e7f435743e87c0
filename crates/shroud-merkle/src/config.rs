//! # Provider Selection
//!
//! Which tree backend a deployment runs is a configuration decision, not
//! a code path: a tagged config enum names the backend and carries its
//! settings, and [`ProviderConfig::build`] turns it into a boxed
//! [`MerkleTreeProvider`]. No runtime type inspection anywhere — the set
//! of backends is closed here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use shroud_bridge::{BridgeClient, BridgeConfig};
use shroud_core::{NetworkId, ProviderError};
use shroud_crypto::{HashAlgorithm, PairwiseHasher};

use crate::bridge::BridgeProvider;
use crate::memory::InMemoryDemoProvider;
use crate::onchain::{OnChainConfig, OnChainProvider};
use crate::provider::MerkleTreeProvider;

fn default_tree_depth() -> usize {
    20
}

/// Backend selection plus its settings, one tagged variant per backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "kebab-case")]
pub enum ProviderConfig {
    /// Seeded in-process trees for demos and tests.
    InMemoryDemo {
        /// Networks to seed.
        networks: Vec<NetworkId>,
        /// Tree depth.
        #[serde(default = "default_tree_depth")]
        tree_depth: usize,
    },
    /// Pool contracts read over JSON-RPC.
    OnChain {
        /// The on-chain provider settings.
        #[serde(flatten)]
        onchain: OnChainConfig,
    },
    /// Delegation to the external bridge engine.
    BridgeDelegated {
        /// Bridge endpoint settings.
        bridge: BridgeConfig,
        /// The bridge's (narrower) network set.
        networks: Vec<NetworkId>,
        /// Tree depth the bridge serves.
        #[serde(default = "default_tree_depth")]
        tree_depth: usize,
    },
}

/// Full provider selection: the backend and the hash backend preference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerkleProviderConfig {
    /// Preferred pairwise hash backend; falls back to SHA3-256 when the
    /// preference is unavailable in this process.
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,
    /// The selected backend.
    #[serde(flatten)]
    pub provider: ProviderConfig,
}

impl MerkleProviderConfig {
    /// Load a selection from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProviderError> {
        serde_yaml::from_str(yaml).map_err(|e| ProviderError::MissingConfiguration(e.to_string()))
    }

    /// Build the configured provider.
    pub fn build(self) -> Result<Box<dyn MerkleTreeProvider>, ProviderError> {
        let hasher = PairwiseHasher::new(self.hash_algorithm);
        self.provider.build(hasher)
    }
}

impl ProviderConfig {
    /// Build the selected backend with the given hasher.
    pub fn build(self, hasher: PairwiseHasher) -> Result<Box<dyn MerkleTreeProvider>, ProviderError> {
        match self {
            Self::InMemoryDemo {
                networks,
                tree_depth,
            } => Ok(Box::new(InMemoryDemoProvider::new(
                &networks, tree_depth, hasher,
            ))),
            Self::OnChain { onchain } => Ok(Box::new(OnChainProvider::new(onchain, hasher)?)),
            Self::BridgeDelegated {
                bridge,
                networks,
                tree_depth,
            } => {
                let client = BridgeClient::new(bridge)
                    .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
                Ok(Box::new(BridgeProvider::new(
                    Arc::new(client),
                    networks,
                    tree_depth,
                    hasher,
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_selection_from_yaml() {
        let yaml = r#"
backend: in-memory-demo
networks: [polygon, ethereum]
tree_depth: 8
"#;
        let config = MerkleProviderConfig::from_yaml_str(yaml).unwrap();
        let provider = config.build().unwrap();
        assert_eq!(provider.provider_name(), "in-memory-demo");
        assert_eq!(provider.tree_depth(), 8);
        assert!(provider.supports_network(&NetworkId::new("polygon").unwrap()));
    }

    #[test]
    fn test_on_chain_selection_from_yaml() {
        let yaml = r#"
backend: on-chain
hash_algorithm: sha3-256
networks:
  polygon:
    rpc_url: https://rpc.example.org
    pool_address: "0x1111111111111111111111111111111111111111"
"#;
        let provider = MerkleProviderConfig::from_yaml_str(yaml)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(provider.provider_name(), "on-chain");
        assert_eq!(provider.tree_depth(), 20);
    }

    #[test]
    fn test_bridge_selection_from_yaml() {
        let yaml = r#"
backend: bridge-delegated
bridge:
  base_url: http://localhost:9000
  api_secret: s3cret
networks: [ethereum]
"#;
        let provider = MerkleProviderConfig::from_yaml_str(yaml)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(provider.provider_name(), "bridge-delegated");
        assert!(!provider.supports_network(&NetworkId::new("polygon").unwrap()));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(MerkleProviderConfig::from_yaml_str("backend: csv-file\n").is_err());
    }
}
