//! # Prover Contract
//!
//! The interface every proof backend satisfies. Like the tree providers,
//! backends are chosen at configuration time and present identical
//! external behavior: generation failures are typed errors, verification
//! outcomes are booleans.

use shroud_core::{ProverError, ZERO_ADDRESS};

use crate::proof::{InputMap, ProofType, ZkProof};

/// A producer and checker of zero-knowledge proofs.
///
/// All operations are synchronous; implementations must be safe to call
/// from multiple threads.
pub trait ZkProver: Send + Sync {
    /// Stable name of this backend for logs and proof metadata.
    fn provider_name(&self) -> &str;

    /// Whether this backend can produce proofs of the given type.
    fn supports_proof_type(&self, proof_type: ProofType) -> bool;

    /// The verifying contract address for a proof type.
    ///
    /// Backends without configured verifier contracts answer the
    /// zero-address sentinel.
    fn verifier_address(&self, proof_type: ProofType) -> String {
        let _ = proof_type;
        ZERO_ADDRESS.to_string()
    }

    /// Produce a proof over the given inputs.
    fn generate_proof(
        &self,
        proof_type: ProofType,
        private_inputs: &InputMap,
        public_inputs: &InputMap,
    ) -> Result<ZkProof, ProverError>;

    /// Check a proof.
    ///
    /// Always answers a boolean — an expired proof, a malformed encoding,
    /// or a missing verification key is `false`, never an error.
    /// Implementations check expiry first, before any cryptographic or
    /// delegated work.
    fn verify_proof(&self, proof: &ZkProof) -> bool;
}
