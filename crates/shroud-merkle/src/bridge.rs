//! # Bridge-Delegated Provider
//!
//! Delegates root, path, and verification queries to the external bridge
//! engine, which maintains its own tree per network. `verify_commitment`
//! returns the bridge's *own* verdict instead of recomputing the fold
//! locally: the bridge holds material this process does not, and the
//! delegation is the stated trust boundary, not an omission.

use std::sync::Arc;

use shroud_bridge::{BridgeClient, BridgeError};
use shroud_core::{is_hash32, normalize_hash32, NetworkId, ProviderError, Timestamp};
use shroud_crypto::PairwiseHasher;

use crate::provider::MerkleTreeProvider;
use crate::types::{MerklePath, MerkleRoot};

/// Tree backend that forwards queries to the bridge engine.
pub struct BridgeProvider {
    client: Arc<BridgeClient>,
    hasher: PairwiseHasher,
    networks: Vec<NetworkId>,
    tree_depth: usize,
}

impl BridgeProvider {
    /// A provider serving the bridge's (narrower) network set.
    pub fn new(
        client: Arc<BridgeClient>,
        networks: Vec<NetworkId>,
        tree_depth: usize,
        hasher: PairwiseHasher,
    ) -> Self {
        Self {
            client,
            hasher,
            networks,
            tree_depth,
        }
    }

    fn require_supported(&self, network: &NetworkId) -> Result<(), ProviderError> {
        if self.supports_network(network) {
            Ok(())
        } else {
            Err(ProviderError::UnsupportedNetwork(network.to_string()))
        }
    }
}

/// Collapse bridge failures into the provider taxonomy; remote not-found
/// answers keep their identity so callers see `CommitmentNotFound`.
fn map_bridge_error(err: BridgeError, commitment: &str, network: &NetworkId) -> ProviderError {
    match err {
        BridgeError::NotFound(_) => ProviderError::CommitmentNotFound {
            commitment: commitment.to_string(),
            network: network.to_string(),
        },
        other => ProviderError::Unavailable(other.to_string()),
    }
}

impl MerkleTreeProvider for BridgeProvider {
    fn provider_name(&self) -> &str {
        "bridge-delegated"
    }

    fn supported_networks(&self) -> Vec<NetworkId> {
        self.networks.clone()
    }

    fn tree_depth(&self) -> usize {
        self.tree_depth
    }

    fn hasher(&self) -> &PairwiseHasher {
        &self.hasher
    }

    fn merkle_root(&self, network: &NetworkId) -> Result<MerkleRoot, ProviderError> {
        self.require_supported(network)?;
        let wire = self
            .client
            .merkle_root(network.as_str())
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        let root = normalize_hash32(&wire.root)
            .map_err(|e| ProviderError::Unavailable(format!("malformed bridge root: {e}")))?;
        Ok(MerkleRoot {
            root,
            network: network.clone(),
            leaf_count: wire.leaf_count,
            tree_depth: wire.tree_depth,
            block_number: wire.block_number,
            synced_at: Timestamp::now(),
        })
    }

    fn merkle_path(
        &self,
        commitment: &str,
        network: &NetworkId,
    ) -> Result<MerklePath, ProviderError> {
        self.require_supported(network)?;
        let key = normalize_hash32(commitment).map_err(ProviderError::InvalidFormat)?;
        let wire = self
            .client
            .merkle_path(&key, network.as_str())
            .map_err(|e| map_bridge_error(e, &key, network))?;
        Ok(MerklePath {
            commitment: key,
            root: wire.root,
            network: network.clone(),
            leaf_index: wire.leaf_index,
            siblings: wire.siblings,
            path_indices: wire.path_indices,
        })
    }

    fn sync_tree(&self, network: &NetworkId) -> Result<MerkleRoot, ProviderError> {
        // The bridge owns the tree and its freshness; a sync is a refetch.
        self.merkle_root(network)
    }

    fn verify_commitment(
        &self,
        commitment: &str,
        path: &MerklePath,
    ) -> Result<bool, ProviderError> {
        self.require_supported(&path.network)?;
        // Format problems are cheap local rejections, as everywhere else.
        if !is_hash32(commitment) {
            tracing::debug!(commitment, "rejecting delegated verify: malformed commitment");
            return Ok(false);
        }
        match self.client.verify_commitment(commitment, path.network.as_str()) {
            Ok(answer) => Ok(answer.valid),
            // The bridge not knowing the commitment is a negative verdict,
            // not an outage.
            Err(BridgeError::NotFound(_)) => Ok(false),
            Err(other) => Err(ProviderError::Unavailable(other.to_string())),
        }
    }
}
