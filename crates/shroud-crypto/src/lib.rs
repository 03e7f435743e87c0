//! # shroud-crypto — Hash Primitives for the Shroud Compliance Core
//!
//! One exported primitive: the domain-separated, commutative
//! [`PairwiseHasher`] that Merkle folding is built on.
//!
//! ## Architecture
//!
//! - **Pairwise** (`pairwise.rs`): input validation, lexicographic operand
//!   sort, domain tag, backend dispatch, canonical hex output.
//! - **Poseidon** (`poseidon.rs`, feature `poseidon`): the SNARK-friendly
//!   alternate backend. Availability is probed once per process; the hasher
//!   falls back to SHA3-256 when the probe fails.
//!
//! ## Crate Policy
//!
//! - Depends only on `shroud-core` internally.
//! - Pure functions, no I/O, no shared mutable state beyond the cached
//!   capability probe.

pub mod pairwise;

#[cfg(feature = "poseidon")]
pub mod poseidon;

pub use pairwise::{backend_available, HashAlgorithm, PairwiseHasher, PAIR_DOMAIN_TAG};
