//! # Tree Snapshot and Path Types
//!
//! `MerkleRoot` is the authoritative snapshot of one network's tree,
//! replaced atomically in the cache and never partially mutated.
//! `MerklePath` is externally supplied proof material — its hash fields
//! stay plain strings so that truncated or forged paths remain
//! representable and are rejected by the verifier with `false`, not by a
//! constructor panic.

use serde::{Deserialize, Serialize};

use shroud_core::{NetworkId, Timestamp};

/// Authoritative snapshot of one network's commitment tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleRoot {
    /// Root hash, `0x`-prefixed 64-char lowercase hex.
    pub root: String,
    /// Network the tree belongs to.
    pub network: NetworkId,
    /// Number of leaves at snapshot time.
    pub leaf_count: u64,
    /// Depth of the tree.
    pub tree_depth: usize,
    /// Block height the snapshot was taken at (0 for in-process trees).
    pub block_number: u64,
    /// When the snapshot was taken.
    pub synced_at: Timestamp,
}

/// Proof material for one leaf: sibling hashes plus position bits
/// sufficient to recompute the root from the commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    /// The leaf commitment the path belongs to.
    pub commitment: String,
    /// The root this path folds to.
    pub root: String,
    /// Network the tree belongs to.
    pub network: NetworkId,
    /// Index of the leaf in the tree.
    pub leaf_index: u64,
    /// Sibling hashes, leaf level first. Must have exactly one entry per
    /// tree level.
    pub siblings: Vec<String>,
    /// Position bits, one per level: 0 when the running hash is the left
    /// operand, 1 when the sibling is.
    pub path_indices: Vec<u8>,
}
