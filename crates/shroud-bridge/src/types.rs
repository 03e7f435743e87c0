//! # Bridge Wire Types
//!
//! Every bridge response is an envelope `{success, data|error}`; the
//! payload structs here mirror the remote contract field-for-field. The
//! bridge speaks plain strings on the wire — conversion into validated
//! domain types happens in the crates that consume it.

use serde::{Deserialize, Serialize};

/// The uniform response envelope the bridge wraps every payload in.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Whether the remote operation succeeded.
    pub success: bool,
    /// Payload, present on success.
    pub data: Option<T>,
    /// Remote error message, present on failure.
    pub error: Option<String>,
}

/// A wallet created on the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletInfo {
    /// Bridge-side wallet identifier.
    pub id: String,
    /// The wallet's shielded address.
    pub shielded_address: String,
}

/// Authoritative tree snapshot as reported by the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMerkleRoot {
    /// Root hash, `0x`-prefixed hex.
    pub root: String,
    /// Network the tree belongs to.
    pub network: String,
    /// Number of leaves in the tree.
    pub leaf_count: u64,
    /// Depth of the tree.
    pub tree_depth: usize,
    /// Block height the snapshot was taken at.
    pub block_number: u64,
}

/// Proof material for one leaf, as reported by the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMerklePath {
    /// The leaf commitment, `0x`-prefixed hex.
    pub commitment: String,
    /// Root the path folds to.
    pub root: String,
    /// Network the tree belongs to.
    pub network: String,
    /// Index of the leaf in the tree.
    pub leaf_index: u64,
    /// Sibling hashes, leaf level first.
    pub siblings: Vec<String>,
    /// Position bits, one per level, each 0 or 1.
    pub path_indices: Vec<u8>,
}

/// Remote answer to a delegated commitment verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCommitmentResponse {
    /// The bridge's own verification verdict.
    pub valid: bool,
}

/// Bridge liveness report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Remote status string (`ok` when healthy).
    pub status: String,
}
