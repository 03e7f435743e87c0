//! # shroud-merkle — Merkle Tree Providers
//!
//! Commitment-tree access behind one contract and three interchangeable
//! backends.
//!
//! ## Architecture
//!
//! - **Provider** (`provider.rs`): the [`MerkleTreeProvider`] trait. The
//!   verification fold is a provided method — the algorithm exists once,
//!   backends supply roots and paths.
//! - **Verify** (`verify.rs`): format gate and positional fold, shared by
//!   every backend and test.
//! - **Cache** (`cache.rs`): per-network TTL slot for authoritative roots,
//!   replaced atomically.
//! - **Memory** (`memory.rs`): seeded deterministic in-process backend for
//!   demos and tests.
//! - **OnChain** (`onchain.rs`): production backend; three JSON-RPC reads
//!   per root fetch, paths deliberately not synthesized.
//! - **Bridge** (`bridge.rs`): delegation to the external bridge engine,
//!   trusting its verification verdict (stated trust boundary).
//! - **Config** (`config.rs`): tagged backend selection — which provider
//!   runs is a deployment decision, made once at configuration time.
//!
//! ## Crate Policy
//!
//! - Unsupported-network and malformed-format failures happen before any
//!   I/O.
//! - Downstream RPC/bridge failures collapse into
//!   `ProviderError::Unavailable`; this crate never retries.

pub mod bridge;
pub mod cache;
pub mod config;
pub mod memory;
pub mod onchain;
pub mod provider;
pub mod types;
pub mod verify;

pub use bridge::BridgeProvider;
pub use cache::RootCache;
pub use config::{MerkleProviderConfig, ProviderConfig};
pub use memory::InMemoryDemoProvider;
pub use onchain::{OnChainConfig, OnChainProvider, PoolContractConfig};
pub use provider::MerkleTreeProvider;
pub use types::{MerklePath, MerkleRoot};
pub use verify::fold_path;
