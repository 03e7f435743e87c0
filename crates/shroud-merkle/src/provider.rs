//! # Merkle Tree Provider Contract
//!
//! The interface every tree backend satisfies. Backends are selected at
//! configuration time and are interchangeable behind this trait — the
//! external contract (operation set, error taxonomy, verification
//! semantics) is byte-identical across the in-memory, on-chain, and
//! bridge-delegated implementations.
//!
//! `verify_commitment` ships as a provided method so the fold algorithm
//! exists exactly once; a backend overrides it only to delegate the whole
//! question elsewhere (the bridge backend does).

use shroud_core::{NetworkId, ProviderError};
use shroud_crypto::PairwiseHasher;

use crate::types::{MerklePath, MerkleRoot};
use crate::verify::{fold_path, path_format_ok};

/// A source of authoritative Merkle roots and proof material.
///
/// All operations are synchronous; implementations must be safe to call
/// from multiple threads.
pub trait MerkleTreeProvider: Send + Sync {
    /// Stable name of this backend for logs and metadata.
    fn provider_name(&self) -> &str;

    /// The networks this provider serves.
    fn supported_networks(&self) -> Vec<NetworkId>;

    /// Whether `network` is served by this provider.
    fn supports_network(&self, network: &NetworkId) -> bool {
        self.supported_networks().contains(network)
    }

    /// Depth of the commitment trees this provider serves.
    fn tree_depth(&self) -> usize;

    /// The pairwise hasher used for folding paths from this provider.
    fn hasher(&self) -> &PairwiseHasher;

    /// The current authoritative root for a network.
    ///
    /// # Errors
    ///
    /// `UnsupportedNetwork` for unknown networks; `Unavailable` when the
    /// backing store cannot be reached.
    fn merkle_root(&self, network: &NetworkId) -> Result<MerkleRoot, ProviderError>;

    /// Proof material for one commitment on a network.
    fn merkle_path(
        &self,
        commitment: &str,
        network: &NetworkId,
    ) -> Result<MerklePath, ProviderError>;

    /// Invalidate any cached snapshot for a network, then refetch.
    ///
    /// The stale value is discarded *before* the refetch: if the refetch
    /// fails, the slot stays empty and the next read retries, rather than
    /// serving a root that is known to be out of date.
    fn sync_tree(&self, network: &NetworkId) -> Result<MerkleRoot, ProviderError>;

    /// Verify that a commitment is a leaf of the network's tree.
    ///
    /// Cryptographic invalidity — malformed fields, truncated paths,
    /// mismatched roots — returns `Ok(false)`, never an error. Only an
    /// unreachable backing store produces `Err`: there is no safe boolean
    /// default for "truth could not be determined."
    fn verify_commitment(
        &self,
        commitment: &str,
        path: &MerklePath,
    ) -> Result<bool, ProviderError> {
        if !path_format_ok(commitment, path, self.tree_depth()) {
            return Ok(false);
        }
        let folded = fold_path(self.hasher(), commitment, &path.siblings, &path.path_indices)
            .map_err(ProviderError::InvalidFormat)?;
        let authoritative = self.merkle_root(&path.network)?;
        let matches = folded == authoritative.root;
        if !matches {
            tracing::debug!(
                network = %path.network,
                folded = %folded,
                root = %authoritative.root,
                "path folds to a different root"
            );
        }
        Ok(matches)
    }
}
