//! # shroud-core — Foundational Types for the Shroud Compliance Core
//!
//! This crate is the bedrock of the Shroud workspace. It defines the
//! primitives every other crate shares; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `NetworkId` is a validated
//!    newtype — no bare strings keying caches or endpoint tables.
//!
//! 2. **One hash wire format.** Commitments, roots, and siblings are
//!    `0x`-prefixed 64-character lowercase hex. `hash32` owns validation,
//!    normalization, and byte conversion; no module re-derives the format.
//!
//! 3. **UTC-only timestamps.** `Timestamp` enforces UTC with Z suffix at
//!    seconds precision, so expiry comparisons and audit stamps have one
//!    canonical rendering.
//!
//! 4. **Verification outcomes are booleans, failures are errors.** The
//!    error taxonomy in `error` draws that line once, for every backend.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `shroud-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod hash32;
pub mod network;
pub mod telemetry;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::{FormatError, ProviderError, ProverError};
pub use hash32::{
    bytes_to_hash32, hash32_to_bytes, is_hash32, normalize_hash32, ZERO_ADDRESS, ZERO_HASH32,
};
pub use network::NetworkId;
pub use temporal::Timestamp;
