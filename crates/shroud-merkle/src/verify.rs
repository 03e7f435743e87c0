//! # Shared Path Verification
//!
//! One fold algorithm for every backend: format checks fail fast before
//! any I/O, then the path folds level by level through the pairwise
//! hasher, and the result is compared against the provider's
//! authoritative root. Backends never reimplement this.

use shroud_core::{is_hash32, normalize_hash32, FormatError};
use shroud_crypto::PairwiseHasher;

use crate::types::MerklePath;

/// Outcome of the pre-fold format gate.
///
/// A rejected path is an expected, frequent event — the caller turns it
/// into a `false` verification result, never an error.
pub(crate) fn path_format_ok(commitment: &str, path: &MerklePath, expected_depth: usize) -> bool {
    if !is_hash32(commitment) {
        tracing::debug!(commitment, "rejecting path: commitment is not 0x+64 hex");
        return false;
    }
    if let Some(bad) = path.siblings.iter().find(|s| !is_hash32(s)) {
        tracing::debug!(sibling = %bad, "rejecting path: sibling is not 0x+64 hex");
        return false;
    }
    if let Some(bad) = path.path_indices.iter().find(|i| **i > 1) {
        tracing::debug!(index = bad, "rejecting path: position bit outside {{0,1}}");
        return false;
    }
    if path.siblings.len() != expected_depth || path.path_indices.len() != path.siblings.len() {
        tracing::debug!(
            siblings = path.siblings.len(),
            indices = path.path_indices.len(),
            expected_depth,
            "rejecting path: truncated or overlong"
        );
        return false;
    }
    true
}

/// Fold a commitment up the tree: at each level the position bit selects
/// which operand is the running hash and which is the sibling.
///
/// Inputs are expected to have passed [`path_format_ok`]; malformed hex
/// still surfaces as a `FormatError` rather than a panic.
pub fn fold_path(
    hasher: &PairwiseHasher,
    commitment: &str,
    siblings: &[String],
    path_indices: &[u8],
) -> Result<String, FormatError> {
    let mut current = normalize_hash32(commitment)?;
    for (sibling, position) in siblings.iter().zip(path_indices.iter()) {
        current = if *position == 0 {
            hasher.hash_pair(&current, sibling)?
        } else {
            hasher.hash_pair(sibling, &current)?
        };
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_core::NetworkId;

    fn h(ch: char) -> String {
        format!("0x{}", ch.to_string().repeat(64))
    }

    fn sample_path(depth: usize) -> MerklePath {
        MerklePath {
            commitment: h('1'),
            root: h('f'),
            network: NetworkId::new("polygon").unwrap(),
            leaf_index: 0,
            siblings: vec![h('2'); depth],
            path_indices: vec![0; depth],
        }
    }

    #[test]
    fn test_format_ok_for_valid_path() {
        let path = sample_path(2);
        assert!(path_format_ok(&path.commitment, &path, 2));
    }

    #[test]
    fn test_non_hex_commitment_rejected() {
        let path = sample_path(2);
        assert!(!path_format_ok("0xzz", &path, 2));
        assert!(!path_format_ok(&"1".repeat(64), &path, 2));
    }

    #[test]
    fn test_bad_sibling_rejected() {
        let mut path = sample_path(2);
        path.siblings[1] = "0xshort".into();
        assert!(!path_format_ok(&path.commitment.clone(), &path, 2));
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut path = sample_path(2);
        path.path_indices[0] = 2;
        assert!(!path_format_ok(&path.commitment.clone(), &path, 2));
    }

    #[test]
    fn test_truncated_path_rejected() {
        let path = sample_path(1);
        assert!(!path_format_ok(&path.commitment.clone(), &path, 2));
    }

    #[test]
    fn test_mismatched_indices_length_rejected() {
        let mut path = sample_path(2);
        path.path_indices.pop();
        assert!(!path_format_ok(&path.commitment.clone(), &path, 2));
    }

    #[test]
    fn test_fold_is_deterministic_and_level_sensitive() {
        let hasher = PairwiseHasher::sha3();
        let siblings = vec![h('2'), h('3')];
        let a = fold_path(&hasher, &h('1'), &siblings, &[0, 0]).unwrap();
        let b = fold_path(&hasher, &h('1'), &siblings, &[0, 0]).unwrap();
        assert_eq!(a, b);

        // A different sibling at any level changes the fold.
        let tampered = vec![h('2'), h('4')];
        let c = fold_path(&hasher, &h('1'), &tampered, &[0, 0]).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_fold_normalizes_commitment_case() {
        let hasher = PairwiseHasher::sha3();
        let siblings = vec![h('2')];
        let lower = fold_path(&hasher, &h('a'), &siblings, &[0]).unwrap();
        let upper = fold_path(&hasher, &format!("0x{}", "A".repeat(64)), &siblings, &[0]).unwrap();
        assert_eq!(lower, upper);
    }
}
