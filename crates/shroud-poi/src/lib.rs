//! # shroud-poi — Proof-of-Innocence Orchestration
//!
//! The compliance layer over the provers: builds clearance proofs that a
//! party or transaction is absent from a disallowed list, re-checks them
//! against externally mutable list state, and tells holders when to
//! renew. Issuance is published to an injected event sink for audit
//! consumers.
//!
//! ## Crate Policy
//!
//! - The prover is injected behind the `ZkProver` trait; this crate never
//!   knows which backend is proving.
//! - Nonces come from the OS entropy source — commitment unlinkability is
//!   a guarantee, not an accident.

pub mod events;
pub mod service;

pub use events::{EventSink, ProofOfInnocenceGenerated, TracingEventSink};
pub use service::{
    ProofOfInnocenceResult, ProofOfInnocenceService, ILLICIT_ROOT_KEY, SANCTIONS_ROOT_KEY,
};
