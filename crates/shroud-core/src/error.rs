//! # Error Types — Shared Error Taxonomy
//!
//! Defines the error types used throughout the Shroud core. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Format, configuration, and unsupported-input errors fail loudly with
//!   full context and are raised straight to the caller.
//! - Cryptographic verification outcomes (bad path, root mismatch, expired
//!   proof) are **not** errors anywhere in this workspace — verification
//!   entry points return `false` for them, because "this is invalid" is an
//!   expected, frequent result.
//! - Downstream I/O failures during root or path retrieval are errors:
//!   there is no safe boolean default for "truth could not be determined."

use thiserror::Error;

/// Format violation in a core primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Value is not a `0x`-prefixed 64-character hex hash.
    #[error("expected 0x-prefixed 64-char hex hash, got {0:?}")]
    InvalidHash(String),

    /// Network identifier is empty or contains invalid characters.
    #[error("invalid network id: {0:?}")]
    InvalidNetwork(String),

    /// Timestamp string is not valid RFC 3339 or is not UTC.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Errors raised by Merkle tree providers.
///
/// Every backend collapses its transport failures into [`Unavailable`]
/// so operators can tell "bad input" from "dependency outage" without
/// knowing which backend is configured.
///
/// [`Unavailable`]: ProviderError::Unavailable
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The requested network is not served by this provider.
    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),

    /// A commitment, root, or path field failed format validation.
    #[error("invalid format: {0}")]
    InvalidFormat(#[from] FormatError),

    /// The commitment is not a leaf of the provider's tree.
    #[error("commitment {commitment} not found on network {network}")]
    CommitmentNotFound {
        /// The normalized commitment that was looked up.
        commitment: String,
        /// The network that was searched.
        network: String,
    },

    /// Required configuration (endpoint, contract address) is absent.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// The operation is deliberately not offered by this backend.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A downstream RPC or bridge call failed; truth could not be determined.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by zero-knowledge proof providers.
#[derive(Error, Debug)]
pub enum ProverError {
    /// No circuit is mapped for the proof type, or its key artifact is
    /// missing on disk.
    #[error("circuit not found: {0}")]
    CircuitNotFound(String),

    /// The external proving process exited non-zero or timed out.
    #[error("prover process failed for circuit {circuit}: {reason}")]
    ProcessFailed {
        /// The circuit that was being proven.
        circuit: String,
        /// The underlying failure.
        reason: String,
    },

    /// The proof type cannot be mapped onto this backend's operations.
    #[error("unsupported proof type: {0}")]
    UnsupportedProofType(String),

    /// Required configuration (toolkit path, circuit table) is absent.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// A downstream bridge call failed.
    #[error("prover unavailable: {0}")]
    Unavailable(String),
}
