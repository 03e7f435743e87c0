//! # Shared Verification Scenarios
//!
//! Cross-backend behavior of `verify_commitment`: the fold and format
//! gate live in the trait, so these tests pin the contract once against a
//! minimal provider with a registered root — the same behavior every real
//! backend inherits.

use shroud_core::{NetworkId, ProviderError, Timestamp};
use shroud_crypto::PairwiseHasher;
use shroud_merkle::{fold_path, MerklePath, MerkleRoot, MerkleTreeProvider};

/// A provider with one registered root and no path synthesis — just
/// enough to drive the provided `verify_commitment`.
struct StaticRootProvider {
    hasher: PairwiseHasher,
    network: NetworkId,
    tree_depth: usize,
    root: Option<String>,
}

impl StaticRootProvider {
    fn with_root(network: &str, tree_depth: usize, root: &str) -> Self {
        Self {
            hasher: PairwiseHasher::sha3(),
            network: NetworkId::new(network).unwrap(),
            tree_depth,
            root: Some(root.to_string()),
        }
    }

    /// A provider whose backing store is unreachable.
    fn unavailable(network: &str, tree_depth: usize) -> Self {
        Self {
            hasher: PairwiseHasher::sha3(),
            network: NetworkId::new(network).unwrap(),
            tree_depth,
            root: None,
        }
    }
}

impl MerkleTreeProvider for StaticRootProvider {
    fn provider_name(&self) -> &str {
        "static-test"
    }

    fn supported_networks(&self) -> Vec<NetworkId> {
        vec![self.network.clone()]
    }

    fn tree_depth(&self) -> usize {
        self.tree_depth
    }

    fn hasher(&self) -> &PairwiseHasher {
        &self.hasher
    }

    fn merkle_root(&self, network: &NetworkId) -> Result<MerkleRoot, ProviderError> {
        let root = self
            .root
            .clone()
            .ok_or_else(|| ProviderError::Unavailable("rpc endpoint down".into()))?;
        Ok(MerkleRoot {
            root,
            network: network.clone(),
            leaf_count: 4,
            tree_depth: self.tree_depth,
            block_number: 1,
            synced_at: Timestamp::now(),
        })
    }

    fn merkle_path(
        &self,
        _commitment: &str,
        _network: &NetworkId,
    ) -> Result<MerklePath, ProviderError> {
        Err(ProviderError::NotImplemented("static test provider".into()))
    }

    fn sync_tree(&self, network: &NetworkId) -> Result<MerkleRoot, ProviderError> {
        self.merkle_root(network)
    }
}

fn h(ch: char) -> String {
    format!("0x{}", ch.to_string().repeat(64))
}

fn polygon_path(siblings: Vec<String>, path_indices: Vec<u8>, root: &str) -> MerklePath {
    MerklePath {
        commitment: h('1'),
        root: root.to_string(),
        network: NetworkId::new("polygon").unwrap(),
        leaf_index: 0,
        siblings,
        path_indices,
    }
}

/// The canonical two-level scenario: commitment 0x11…, siblings 0x22…
/// and 0x33…, both positions left. Folding and registering the result as
/// polygon's root makes verification pass.
#[test]
fn depth_two_scenario_verifies_against_registered_root() {
    let hasher = PairwiseHasher::sha3();
    let siblings = vec![h('2'), h('3')];
    let root = fold_path(&hasher, &h('1'), &siblings, &[0, 0]).unwrap();

    let provider = StaticRootProvider::with_root("polygon", 2, &root);
    let path = polygon_path(siblings, vec![0, 0], &root);
    assert!(provider.verify_commitment(&h('1'), &path).unwrap());
}

#[test]
fn flipped_sibling_fails_verification() {
    let hasher = PairwiseHasher::sha3();
    let siblings = vec![h('2'), h('3')];
    let root = fold_path(&hasher, &h('1'), &siblings, &[0, 0]).unwrap();

    let provider = StaticRootProvider::with_root("polygon", 2, &root);
    let tampered = polygon_path(vec![h('2'), h('4')], vec![0, 0], &root);
    assert!(!provider.verify_commitment(&h('1'), &tampered).unwrap());
}

#[test]
fn mismatched_root_fails_verification() {
    // A correctly folded path against a root that was never registered.
    let siblings = vec![h('2'), h('3')];
    let provider = StaticRootProvider::with_root("polygon", 2, &h('f'));
    let path = polygon_path(siblings, vec![0, 0], &h('f'));
    assert!(!provider.verify_commitment(&h('1'), &path).unwrap());
}

/// Malformed inputs are declined with `false`, never an error: the format
/// gate runs before any root fetch.
#[test]
fn malformed_inputs_return_false_not_error() {
    let provider = StaticRootProvider::with_root("polygon", 2, &h('f'));
    let good = polygon_path(vec![h('2'), h('3')], vec![0, 0], &h('f'));

    // Non-hex commitment.
    assert!(!provider.verify_commitment("0xzz", &good).unwrap());
    // Wrong-length commitment.
    assert!(!provider
        .verify_commitment(&format!("0x{}", "1".repeat(63)), &good)
        .unwrap());
    // Missing prefix.
    assert!(!provider.verify_commitment(&"1".repeat(64), &good).unwrap());

    // Sibling count below the tree depth (truncated path).
    let truncated = polygon_path(vec![h('2')], vec![0], &h('f'));
    assert!(!provider.verify_commitment(&h('1'), &truncated).unwrap());

    // Position bit outside {0,1}.
    let bad_bit = polygon_path(vec![h('2'), h('3')], vec![0, 2], &h('f'));
    assert!(!provider.verify_commitment(&h('1'), &bad_bit).unwrap());
}

/// Format rejection short-circuits before the root fetch — an unreachable
/// backend still answers `false` for garbage input.
#[test]
fn format_rejection_happens_before_root_fetch() {
    let provider = StaticRootProvider::unavailable("polygon", 2);
    let path = polygon_path(vec![h('2')], vec![0], &h('f'));
    assert!(!provider.verify_commitment(&h('1'), &path).unwrap());
}

/// A well-formed path against an unreachable backend is an error, not a
/// boolean: truth could not be determined.
#[test]
fn unreachable_backend_is_an_error_for_well_formed_paths() {
    let provider = StaticRootProvider::unavailable("polygon", 2);
    let path = polygon_path(vec![h('2'), h('3')], vec![0, 0], &h('f'));
    let err = provider.verify_commitment(&h('1'), &path).unwrap_err();
    assert!(matches!(err, ProviderError::Unavailable(_)));
}

/// The pair hash sorts its operands, so the position bits choose operand
/// roles without changing the digest — sibling order and the registered
/// root are the binding material.
#[test]
fn position_bits_select_roles_over_sorted_hashing() {
    let hasher = PairwiseHasher::sha3();
    let siblings = vec![h('2'), h('3')];
    let left = fold_path(&hasher, &h('1'), &siblings, &[0, 0]).unwrap();
    let right = fold_path(&hasher, &h('1'), &siblings, &[1, 0]).unwrap();
    assert_eq!(left, right);
}
