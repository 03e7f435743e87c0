//! # Pairwise Commitment Hashing
//!
//! The single hash primitive behind Merkle folding: a deterministic,
//! **commutative** pairwise hash over 32-byte values.
//!
//! ## Algorithm
//!
//! 1. Decode both `0x`-prefixed hex inputs to raw bytes.
//! 2. Sort the two values lexicographically (smaller first), so
//!    `hash(a, b) == hash(b, a)` by construction.
//! 3. Prepend the fixed domain tag to the concatenated raw bytes.
//! 4. Digest with the active backend and emit `0x` + 64 lowercase hex.
//!
//! ## Backend Selection
//!
//! SHA3-256 is the default backend and is always available. A
//! SNARK-friendly Poseidon backend can be preferred instead; whether it is
//! usable is probed **once per process** and cached — `hash_pair` falls
//! back to SHA3-256 transparently when the preferred backend is missing or
//! unhealthy. Callers never see a backend-specific output format.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use shroud_core::{bytes_to_hash32, hash32_to_bytes, FormatError};

/// Domain-separation tag prepended to every pairwise hash input.
///
/// Fixed for the lifetime of the tree format: changing it changes every
/// root in existence.
pub const PAIR_DOMAIN_TAG: &[u8] = b"shroud.merkle.pair.v1";

/// The hash algorithm backing the pairwise hasher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    /// SHA3-256 — the default backend, always available.
    #[default]
    Sha3_256,
    /// Poseidon over BN254 — SNARK-friendly alternate backend, compiled in
    /// behind the `poseidon` feature.
    Poseidon,
}

impl HashAlgorithm {
    /// The algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha3_256 => "sha3-256",
            Self::Poseidon => "poseidon",
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

static POSEIDON_PROBE: OnceLock<bool> = OnceLock::new();

/// Whether the given backend can actually hash in this process.
///
/// The Poseidon answer is computed once and cached for the process
/// lifetime; subsequent calls are a plain load.
pub fn backend_available(algorithm: HashAlgorithm) -> bool {
    match algorithm {
        HashAlgorithm::Sha3_256 => true,
        HashAlgorithm::Poseidon => *POSEIDON_PROBE.get_or_init(probe_poseidon),
    }
}

#[cfg(feature = "poseidon")]
fn probe_poseidon() -> bool {
    let healthy = crate::poseidon::self_check();
    if !healthy {
        tracing::warn!("poseidon backend failed self-check, falling back to sha3-256");
    }
    healthy
}

#[cfg(not(feature = "poseidon"))]
fn probe_poseidon() -> bool {
    tracing::debug!("poseidon backend not compiled in, using sha3-256");
    false
}

/// Deterministic, commutative pairwise hasher for Merkle folding.
#[derive(Debug, Clone, Copy)]
pub struct PairwiseHasher {
    preferred: HashAlgorithm,
}

impl PairwiseHasher {
    /// A hasher preferring the given backend, falling back to SHA3-256
    /// when that backend is unavailable.
    pub fn new(preferred: HashAlgorithm) -> Self {
        Self { preferred }
    }

    /// A hasher pinned to the default SHA3-256 backend.
    pub fn sha3() -> Self {
        Self::new(HashAlgorithm::Sha3_256)
    }

    /// The backend `hash_pair` will actually use, after the one-time
    /// availability probe.
    pub fn effective_algorithm(&self) -> HashAlgorithm {
        if backend_available(self.preferred) {
            self.preferred
        } else {
            HashAlgorithm::Sha3_256
        }
    }

    /// Hash two 32-byte hex values into one.
    ///
    /// Commutative: `hash_pair(a, b) == hash_pair(b, a)`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidHash`] if either input is not a
    /// `0x`-prefixed 64-character hex string.
    pub fn hash_pair(&self, left: &str, right: &str) -> Result<String, FormatError> {
        let a = hash32_to_bytes(left)?;
        let b = hash32_to_bytes(right)?;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        let digest = match self.effective_algorithm() {
            HashAlgorithm::Sha3_256 => sha3_pair(&lo, &hi),
            #[cfg(feature = "poseidon")]
            HashAlgorithm::Poseidon => crate::poseidon::hash_pair(&lo, &hi),
            #[cfg(not(feature = "poseidon"))]
            HashAlgorithm::Poseidon => sha3_pair(&lo, &hi),
        };
        Ok(bytes_to_hash32(&digest))
    }
}

impl Default for PairwiseHasher {
    fn default() -> Self {
        Self::sha3()
    }
}

fn sha3_pair(lo: &[u8; 32], hi: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(PAIR_DOMAIN_TAG);
    hasher.update(lo);
    hasher.update(hi);
    let out = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&out);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn h(fill: u8) -> String {
        bytes_to_hash32(&[fill; 32])
    }

    #[test]
    fn test_deterministic() {
        let hasher = PairwiseHasher::sha3();
        let x = hasher.hash_pair(&h(0x11), &h(0x22)).unwrap();
        let y = hasher.hash_pair(&h(0x11), &h(0x22)).unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn test_commutative() {
        let hasher = PairwiseHasher::sha3();
        let ab = hasher.hash_pair(&h(0x11), &h(0x22)).unwrap();
        let ba = hasher.hash_pair(&h(0x22), &h(0x11)).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_output_format_is_canonical() {
        let hasher = PairwiseHasher::sha3();
        let out = hasher.hash_pair(&h(0x00), &h(0xff)).unwrap();
        assert!(shroud_core::is_hash32(&out));
        assert_eq!(out, out.to_lowercase());
    }

    #[test]
    fn test_distinct_pairs_distinct_outputs() {
        let hasher = PairwiseHasher::sha3();
        let x = hasher.hash_pair(&h(0x11), &h(0x22)).unwrap();
        let y = hasher.hash_pair(&h(0x11), &h(0x23)).unwrap();
        assert_ne!(x, y);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let hasher = PairwiseHasher::sha3();
        assert!(hasher.hash_pair("0xabcd", &h(0x11)).is_err());
        assert!(hasher.hash_pair(&h(0x11), "not-hex").is_err());
        assert!(hasher.hash_pair(&"ab".repeat(32), &h(0x11)).is_err());
    }

    #[test]
    fn test_uppercase_inputs_accepted() {
        let hasher = PairwiseHasher::sha3();
        let lower = hasher.hash_pair(&h(0xab), &h(0x11)).unwrap();
        let upper = hasher
            .hash_pair(&format!("0x{}", "AB".repeat(32)), &h(0x11))
            .unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_preferring_unavailable_backend_falls_back() {
        // Without the `poseidon` feature the probe reports unavailable and
        // the hasher must produce SHA3-256 output; with it, the two
        // backends simply differ. Either way hashing must succeed and the
        // probe must be stable across calls.
        let hasher = PairwiseHasher::new(HashAlgorithm::Poseidon);
        let first = hasher.effective_algorithm();
        let out = hasher.hash_pair(&h(0x11), &h(0x22)).unwrap();
        assert!(shroud_core::is_hash32(&out));
        assert_eq!(hasher.effective_algorithm(), first);
        if !backend_available(HashAlgorithm::Poseidon) {
            assert_eq!(first, HashAlgorithm::Sha3_256);
            assert_eq!(out, PairwiseHasher::sha3().hash_pair(&h(0x11), &h(0x22)).unwrap());
        }
    }

    proptest! {
        #[test]
        fn prop_commutative(a in proptest::array::uniform32(any::<u8>()),
                            b in proptest::array::uniform32(any::<u8>())) {
            let hasher = PairwiseHasher::sha3();
            let left = bytes_to_hash32(&a);
            let right = bytes_to_hash32(&b);
            prop_assert_eq!(
                hasher.hash_pair(&left, &right).unwrap(),
                hasher.hash_pair(&right, &left).unwrap()
            );
        }
    }
}
