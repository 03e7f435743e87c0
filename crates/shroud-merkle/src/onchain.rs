//! # On-Chain Production Provider
//!
//! Reads authoritative roots straight from the shielded pool contract:
//! three sequential JSON-RPC calls per fetch (root word, leaf count word,
//! block number), cached with a short TTL. This backend only *verifies*
//! externally supplied paths — it never synthesizes them, because walking
//! contract storage for sibling sets is the indexer's job, not an RPC
//! read path.
//!
//! No transaction is ever submitted here, and no call is retried; a
//! failed or timed-out read surfaces as `Unavailable`.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use shroud_core::{normalize_hash32, NetworkId, ProviderError, Timestamp};
use shroud_crypto::PairwiseHasher;

use crate::cache::RootCache;
use crate::provider::MerkleTreeProvider;
use crate::types::{MerklePath, MerkleRoot};

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_rpc_timeout_secs() -> u64 {
    10
}

fn default_tree_depth() -> usize {
    20
}

// Pool contract read selectors. Deployments pin these to their pool ABI;
// the defaults match the reference pool's `getLastRoot()` / `nextIndex()`.
fn default_root_selector() -> String {
    "0xba70f757".into()
}

fn default_leaf_count_selector() -> String {
    "0xfd271fae".into()
}

/// RPC endpoint and pool contract for one network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolContractConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Address of the shielded pool contract.
    pub pool_address: String,
}

/// Configuration for the on-chain provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnChainConfig {
    /// Networks this deployment serves. When empty, the keys of
    /// `networks` are used. A network listed here without a matching
    /// contract entry fails with `MissingConfiguration`, not
    /// `UnsupportedNetwork` — it is served, just not yet wired up.
    #[serde(default)]
    pub supported_networks: Vec<NetworkId>,
    /// Per-network endpoint and contract addresses.
    pub networks: HashMap<NetworkId, PoolContractConfig>,
    /// How long a fetched root stays fresh.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Per-call RPC timeout.
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,
    /// Depth of the pool's commitment tree.
    #[serde(default = "default_tree_depth")]
    pub tree_depth: usize,
    /// 4-byte selector for the root read call.
    #[serde(default = "default_root_selector")]
    pub root_selector: String,
    /// 4-byte selector for the leaf count read call.
    #[serde(default = "default_leaf_count_selector")]
    pub leaf_count_selector: String,
}

impl OnChainConfig {
    /// Load a config from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProviderError> {
        serde_yaml::from_str(yaml).map_err(|e| ProviderError::MissingConfiguration(e.to_string()))
    }
}

/// Production backend reading roots from pool contracts over JSON-RPC.
pub struct OnChainProvider {
    config: OnChainConfig,
    hasher: PairwiseHasher,
    cache: RootCache,
    http: reqwest::blocking::Client,
}

impl OnChainProvider {
    /// Build a provider with a bounded-timeout HTTP client.
    pub fn new(config: OnChainConfig, hasher: PairwiseHasher) -> Result<Self, ProviderError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .build()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        let cache = RootCache::new(Duration::from_secs(config.cache_ttl_secs));
        Ok(Self {
            config,
            hasher,
            cache,
            http,
        })
    }

    fn contract_for(&self, network: &NetworkId) -> Result<&PoolContractConfig, ProviderError> {
        if !self.supports_network(network) {
            return Err(ProviderError::UnsupportedNetwork(network.to_string()));
        }
        self.config.networks.get(network).ok_or_else(|| {
            ProviderError::MissingConfiguration(format!(
                "no pool contract configured for network {network}"
            ))
        })
    }

    fn rpc_call(&self, url: &str, method: &str, params: Value) -> Result<String, ProviderError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response: Value = self
            .http
            .post(url)
            .json(&body)
            .send()
            .map_err(|e| ProviderError::Unavailable(format!("{method}: {e}")))?
            .json()
            .map_err(|e| ProviderError::Unavailable(format!("{method}: invalid response: {e}")))?;

        if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
            return Err(ProviderError::Unavailable(format!("{method}: {error}")));
        }
        response
            .get("result")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| ProviderError::Unavailable(format!("{method}: missing result")))
    }

    fn eth_call(
        &self,
        contract: &PoolContractConfig,
        selector: &str,
    ) -> Result<String, ProviderError> {
        self.rpc_call(
            &contract.rpc_url,
            "eth_call",
            json!([{ "to": contract.pool_address, "data": selector }, "latest"]),
        )
    }

    /// The three sequential reads that make up one root fetch.
    fn fetch_root(&self, network: &NetworkId) -> Result<MerkleRoot, ProviderError> {
        let contract = self.contract_for(network)?;

        let root_word = self.eth_call(contract, &self.config.root_selector)?;
        let leaf_word = self.eth_call(contract, &self.config.leaf_count_selector)?;
        let block_word = self.rpc_call(&contract.rpc_url, "eth_blockNumber", json!([]))?;

        let root = normalize_hash32(&root_word)
            .map_err(|e| ProviderError::Unavailable(format!("malformed root word: {e}")))?;
        let leaf_count = parse_hex_u64(&leaf_word)
            .map_err(|e| ProviderError::Unavailable(format!("malformed leaf count: {e}")))?;
        let block_number = parse_hex_u64(&block_word)
            .map_err(|e| ProviderError::Unavailable(format!("malformed block number: {e}")))?;

        tracing::debug!(%network, root = %root, leaf_count, block_number, "fetched on-chain root");
        Ok(MerkleRoot {
            root,
            network: network.clone(),
            leaf_count,
            tree_depth: self.config.tree_depth,
            block_number,
            synced_at: Timestamp::now(),
        })
    }
}

/// Parse a hex-encoded scalar (`0x`-prefixed, any width) into a `u64`.
fn parse_hex_u64(word: &str) -> Result<u64, String> {
    let body = word
        .trim()
        .strip_prefix("0x")
        .ok_or_else(|| format!("missing 0x prefix: {word:?}"))?;
    let digits = body.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16).map_err(|e| format!("{word:?}: {e}"))
}

impl MerkleTreeProvider for OnChainProvider {
    fn provider_name(&self) -> &str {
        "on-chain"
    }

    fn supported_networks(&self) -> Vec<NetworkId> {
        let mut networks: Vec<NetworkId> = if self.config.supported_networks.is_empty() {
            self.config.networks.keys().cloned().collect()
        } else {
            self.config.supported_networks.clone()
        };
        networks.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        networks
    }

    fn tree_depth(&self) -> usize {
        self.config.tree_depth
    }

    fn hasher(&self) -> &PairwiseHasher {
        &self.hasher
    }

    fn merkle_root(&self, network: &NetworkId) -> Result<MerkleRoot, ProviderError> {
        if let Some(cached) = self.cache.get(network) {
            return Ok(cached);
        }
        let fresh = self.fetch_root(network)?;
        self.cache.put(fresh.clone());
        Ok(fresh)
    }

    fn merkle_path(
        &self,
        _commitment: &str,
        _network: &NetworkId,
    ) -> Result<MerklePath, ProviderError> {
        Err(ProviderError::NotImplemented(
            "on-chain provider verifies externally supplied paths; it does not synthesize them"
                .into(),
        ))
    }

    fn sync_tree(&self, network: &NetworkId) -> Result<MerkleRoot, ProviderError> {
        // Clear first: if the refetch fails the slot stays empty, and the
        // next read retries instead of serving a known-stale root.
        self.cache.clear(network);
        let fresh = self.fetch_root(network)?;
        self.cache.put(fresh.clone());
        Ok(fresh)
    }
}
