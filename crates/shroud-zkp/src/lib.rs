//! # shroud-zkp — Zero-Knowledge Provers
//!
//! Proof generation and checking behind one contract and two
//! interchangeable backends.
//!
//! ## Architecture
//!
//! - **Proof** (`proof.rs`): the closed [`ProofType`] set and the
//!   immutable [`ZkProof`] artifact.
//! - **Prover** (`prover.rs`): the [`ZkProver`] trait — generation errors
//!   are typed, verification outcomes are booleans, expiry is always
//!   checked first.
//! - **Local** (`local.rs`): shells out to the circuit toolkit binary with
//!   a hard deadline and guaranteed child teardown.
//! - **Bridge** (`bridge.rs`): delegates to the external bridge engine;
//!   its transaction payload becomes the proof body and verification is
//!   deliberately shallow (stated trust boundary).
//! - **Config** (`config.rs`): tagged backend selection, mirroring the
//!   tree-provider side.

pub mod bridge;
pub mod config;
pub mod local;
pub mod proof;
pub mod prover;

pub use bridge::BridgeProver;
pub use config::ProverConfig;
pub use local::{LocalCircuitProver, LocalProverConfig};
pub use proof::{InputMap, ProofType, ZkProof};
pub use prover::ZkProver;
