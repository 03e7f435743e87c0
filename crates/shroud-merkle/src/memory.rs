//! # In-Memory Demo Provider
//!
//! A deterministic, entirely in-process backend for demos and tests. Each
//! supported network starts from the same seeded leaf set, so two
//! processes constructed identically agree on every root. The only
//! mutator is [`InMemoryDemoProvider::add_demo_commitment`].
//!
//! Commitment keys are normalized (lowercased, `0x`-prefixed) before
//! storage and lookup, so case and prefix variants of the same value
//! resolve to one entry.

use std::collections::HashMap;

use parking_lot::RwLock;
use sha3::{Digest, Sha3_256};

use shroud_core::{bytes_to_hash32, normalize_hash32, NetworkId, ProviderError, Timestamp, ZERO_HASH32};
use shroud_crypto::PairwiseHasher;

use crate::provider::MerkleTreeProvider;
use crate::types::{MerklePath, MerkleRoot};

const SEED_LEAVES_PER_NETWORK: usize = 4;

/// Deterministic in-process tree backend.
pub struct InMemoryDemoProvider {
    hasher: PairwiseHasher,
    tree_depth: usize,
    leaves: RwLock<HashMap<NetworkId, Vec<String>>>,
}

impl InMemoryDemoProvider {
    /// A provider serving the given networks at the given depth, each
    /// seeded with a small deterministic leaf set.
    pub fn new(networks: &[NetworkId], tree_depth: usize, hasher: PairwiseHasher) -> Self {
        let mut leaves = HashMap::new();
        for network in networks {
            let seeded = (0..SEED_LEAVES_PER_NETWORK)
                .map(|i| seed_leaf(network, i))
                .collect();
            leaves.insert(network.clone(), seeded);
        }
        Self {
            hasher,
            tree_depth,
            leaves: RwLock::new(leaves),
        }
    }

    /// A provider with the default demo networks at depth 20.
    pub fn with_default_networks() -> Self {
        let networks = ["ethereum", "polygon"]
            .iter()
            .filter_map(|n| NetworkId::new(*n).ok())
            .collect::<Vec<_>>();
        Self::new(&networks, 20, PairwiseHasher::default())
    }

    /// Insert a commitment into a network's leaf set, returning its leaf
    /// index. Idempotent: re-adding a case or prefix variant of an
    /// existing commitment returns the original index.
    pub fn add_demo_commitment(
        &self,
        commitment: &str,
        network: &NetworkId,
    ) -> Result<u64, ProviderError> {
        if !self.supports_network(network) {
            return Err(ProviderError::UnsupportedNetwork(network.to_string()));
        }
        let key = normalize_hash32(commitment).map_err(ProviderError::InvalidFormat)?;
        let mut leaves = self.leaves.write();
        let entry = leaves
            .get_mut(network)
            .ok_or_else(|| ProviderError::UnsupportedNetwork(network.to_string()))?;
        if let Some(existing) = entry.iter().position(|leaf| *leaf == key) {
            return Ok(existing as u64);
        }
        entry.push(key);
        tracing::debug!(%network, leaf_index = entry.len() - 1, "added demo commitment");
        Ok((entry.len() - 1) as u64)
    }

    fn network_leaves(&self, network: &NetworkId) -> Result<Vec<String>, ProviderError> {
        self.leaves
            .read()
            .get(network)
            .cloned()
            .ok_or_else(|| ProviderError::UnsupportedNetwork(network.to_string()))
    }

    /// Fold the whole leaf set into a root, optionally collecting the
    /// sibling path for one leaf. Levels with an odd node count are
    /// padded with the running zero-subtree hash.
    fn compute(
        &self,
        leaves: &[String],
        target: Option<usize>,
    ) -> Result<(String, Vec<String>, Vec<u8>), ProviderError> {
        let mut level: Vec<String> = leaves.to_vec();
        let mut zero = ZERO_HASH32.to_string();
        let mut index = target.unwrap_or(0);
        let mut siblings = Vec::with_capacity(self.tree_depth);
        let mut positions = Vec::with_capacity(self.tree_depth);

        for _ in 0..self.tree_depth {
            if level.is_empty() {
                level.push(zero.clone());
            }
            if level.len() % 2 == 1 {
                level.push(zero.clone());
            }
            if target.is_some() {
                siblings.push(level[index ^ 1].clone());
                positions.push((index % 2) as u8);
            }
            let mut parents = Vec::with_capacity(level.len() / 2);
            for pair in level.chunks(2) {
                let parent = self
                    .hasher
                    .hash_pair(&pair[0], &pair[1])
                    .map_err(ProviderError::InvalidFormat)?;
                parents.push(parent);
            }
            level = parents;
            index /= 2;
            zero = self
                .hasher
                .hash_pair(&zero, &zero)
                .map_err(ProviderError::InvalidFormat)?;
        }

        let root = level
            .first()
            .cloned()
            .unwrap_or_else(|| ZERO_HASH32.to_string());
        Ok((root, siblings, positions))
    }
}

/// Deterministic seed leaf for a network position.
fn seed_leaf(network: &NetworkId, index: usize) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(b"shroud.demo.leaf.v1");
    hasher.update(network.as_str().as_bytes());
    hasher.update((index as u64).to_be_bytes());
    let out = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&out);
    bytes_to_hash32(&bytes)
}

impl MerkleTreeProvider for InMemoryDemoProvider {
    fn provider_name(&self) -> &str {
        "in-memory-demo"
    }

    fn supported_networks(&self) -> Vec<NetworkId> {
        let mut networks: Vec<NetworkId> = self.leaves.read().keys().cloned().collect();
        networks.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        networks
    }

    fn tree_depth(&self) -> usize {
        self.tree_depth
    }

    fn hasher(&self) -> &PairwiseHasher {
        &self.hasher
    }

    fn merkle_root(&self, network: &NetworkId) -> Result<MerkleRoot, ProviderError> {
        let leaves = self.network_leaves(network)?;
        let (root, _, _) = self.compute(&leaves, None)?;
        Ok(MerkleRoot {
            root,
            network: network.clone(),
            leaf_count: leaves.len() as u64,
            tree_depth: self.tree_depth,
            block_number: 0,
            synced_at: Timestamp::now(),
        })
    }

    fn merkle_path(
        &self,
        commitment: &str,
        network: &NetworkId,
    ) -> Result<MerklePath, ProviderError> {
        let key = normalize_hash32(commitment).map_err(ProviderError::InvalidFormat)?;
        let leaves = self.network_leaves(network)?;
        let leaf_index = leaves
            .iter()
            .position(|leaf| *leaf == key)
            .ok_or_else(|| ProviderError::CommitmentNotFound {
                commitment: key.clone(),
                network: network.to_string(),
            })?;
        let (root, siblings, path_indices) = self.compute(&leaves, Some(leaf_index))?;
        Ok(MerklePath {
            commitment: key,
            root,
            network: network.clone(),
            leaf_index: leaf_index as u64,
            siblings,
            path_indices,
        })
    }

    fn sync_tree(&self, network: &NetworkId) -> Result<MerkleRoot, ProviderError> {
        // Nothing is cached in-process; a sync is just a recompute.
        self.merkle_root(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> InMemoryDemoProvider {
        let networks = vec![NetworkId::new("polygon").unwrap()];
        InMemoryDemoProvider::new(&networks, 4, PairwiseHasher::default())
    }

    fn polygon() -> NetworkId {
        NetworkId::new("polygon").unwrap()
    }

    fn c(fill: char) -> String {
        format!("0x{}", fill.to_string().repeat(64))
    }

    #[test]
    fn test_seeded_roots_are_deterministic() {
        let a = provider().merkle_root(&polygon()).unwrap();
        let b = provider().merkle_root(&polygon()).unwrap();
        assert_eq!(a.root, b.root);
        assert_eq!(a.leaf_count, SEED_LEAVES_PER_NETWORK as u64);
    }

    #[test]
    fn test_add_commitment_round_trip() {
        let p = provider();
        let index = p.add_demo_commitment(&c('a'), &polygon()).unwrap();
        let path = p.merkle_path(&c('a'), &polygon()).unwrap();
        assert_eq!(path.leaf_index, index);
        assert_eq!(path.siblings.len(), 4);
        assert_eq!(path.path_indices.len(), 4);
        assert!(p.verify_commitment(&c('a'), &path).unwrap());
    }

    #[test]
    fn test_case_and_prefix_variants_resolve_to_one_entry() {
        let p = provider();
        let index = p.add_demo_commitment(&c('a'), &polygon()).unwrap();
        let again = p
            .add_demo_commitment(&"A".repeat(64), &polygon())
            .unwrap();
        assert_eq!(index, again);

        let canonical = p.merkle_path(&c('a'), &polygon()).unwrap();
        let variant = p
            .merkle_path(&format!("0x{}", "A".repeat(64)), &polygon())
            .unwrap();
        assert_eq!(canonical, variant);
        assert_eq!(canonical.commitment, c('a'));
    }

    #[test]
    fn test_unknown_commitment_not_found() {
        let err = provider().merkle_path(&c('d'), &polygon()).unwrap_err();
        assert!(matches!(err, ProviderError::CommitmentNotFound { .. }));
    }

    #[test]
    fn test_malformed_commitment_rejected_before_lookup() {
        let err = provider()
            .add_demo_commitment("not-a-hash", &polygon())
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidFormat(_)));
    }

    #[test]
    fn test_unsupported_network_fails_fast() {
        let err = provider()
            .merkle_root(&NetworkId::new("solana").unwrap())
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnsupportedNetwork(_)));
    }

    #[test]
    fn test_adding_a_leaf_changes_the_root() {
        let p = provider();
        let before = p.merkle_root(&polygon()).unwrap();
        p.add_demo_commitment(&c('b'), &polygon()).unwrap();
        let after = p.merkle_root(&polygon()).unwrap();
        assert_ne!(before.root, after.root);
        assert_eq!(after.leaf_count, before.leaf_count + 1);
    }

    #[test]
    fn test_paths_stay_valid_for_all_leaves_after_growth() {
        let p = provider();
        p.add_demo_commitment(&c('a'), &polygon()).unwrap();
        p.add_demo_commitment(&c('b'), &polygon()).unwrap();
        for commitment in [c('a'), c('b')] {
            let path = p.merkle_path(&commitment, &polygon()).unwrap();
            assert!(p.verify_commitment(&commitment, &path).unwrap());
        }
    }

    #[test]
    fn test_tampered_sibling_fails_verification() {
        let p = provider();
        p.add_demo_commitment(&c('a'), &polygon()).unwrap();
        let mut path = p.merkle_path(&c('a'), &polygon()).unwrap();
        path.siblings[0] = c('e');
        assert!(!p.verify_commitment(&c('a'), &path).unwrap());
    }
}
