//! # Proof-of-Innocence Service
//!
//! Orchestrates the two clearance flows on top of a [`ZkProver`]:
//! sanctions clearance (a party is absent from a sanctions list) and
//! source clearance (a transaction's sources are absent from an illicit
//! list). The service owns input assembly, unlinkable public commitments,
//! verification ordering, and renewal policy — the prover only proves.
//!
//! Each generation draws a fresh nonce from the OS entropy source, so two
//! proofs over identical inputs never share a public commitment and
//! cannot be linked to one another.

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use shroud_core::{bytes_to_hash32, normalize_hash32, ProverError, Timestamp};
use shroud_merkle::MerklePath;
use shroud_zkp::{InputMap, ProofType, ZkProof, ZkProver};

use crate::events::{EventSink, ProofOfInnocenceGenerated};

/// Public-input key carrying the sanctions list root.
pub const SANCTIONS_ROOT_KEY: &str = "sanctions_list_root";
/// Public-input key carrying the illicit source list root.
pub const ILLICIT_ROOT_KEY: &str = "illicit_list_root";

const SECONDS_PER_DAY: i64 = 86_400;

/// Outcome of a proof-of-innocence verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOfInnocenceResult {
    /// Whether the proof is currently acceptable.
    pub valid: bool,
    /// Why it was declined, when it was.
    pub reason: Option<String>,
    /// Until when an accepted proof stays acceptable.
    pub valid_until: Option<Timestamp>,
}

impl ProofOfInnocenceResult {
    fn declined(reason: &str) -> Self {
        Self {
            valid: false,
            reason: Some(reason.to_string()),
            valid_until: None,
        }
    }

    fn accepted(valid_until: Timestamp) -> Self {
        Self {
            valid: true,
            reason: None,
            valid_until: Some(valid_until),
        }
    }
}

/// Compliance proof orchestration over an injected prover and event sink.
pub struct ProofOfInnocenceService<P: ZkProver> {
    prover: P,
    events: Arc<dyn EventSink>,
    renewal_threshold_days: i64,
}

impl<P: ZkProver> ProofOfInnocenceService<P> {
    /// A service with the default 30-day renewal threshold.
    pub fn new(prover: P, events: Arc<dyn EventSink>) -> Self {
        Self {
            prover,
            events,
            renewal_threshold_days: 30,
        }
    }

    /// Override the default renewal threshold.
    pub fn with_renewal_threshold_days(mut self, days: i64) -> Self {
        self.renewal_threshold_days = days;
        self
    }

    /// Access the underlying prover.
    pub fn prover(&self) -> &P {
        &self.prover
    }

    /// Prove that `user_id` is absent from the sanctions list summarized
    /// by `sanctions_list_root`.
    ///
    /// The user's identity and transaction history stay private; the
    /// public side carries only the list root, a nonce-blinded user
    /// commitment, and the proof timestamp.
    pub fn generate_sanctions_clearance_proof(
        &self,
        user_id: &str,
        transaction_history: &[String],
        sanctions_list_root: &str,
    ) -> Result<ZkProof, ProverError> {
        let mut private_inputs = InputMap::new();
        private_inputs.insert(
            "identity_hash".into(),
            Value::String(sha256_hex(&[user_id.as_bytes()])),
        );
        private_inputs.insert(
            "sanctions_list_hash".into(),
            Value::String(sanctions_list_root.to_string()),
        );
        private_inputs.insert(
            "transaction_hashes".into(),
            Value::Array(
                transaction_history
                    .iter()
                    .map(|h| Value::String(h.clone()))
                    .collect(),
            ),
        );

        let public_inputs =
            self.public_inputs_for(SANCTIONS_ROOT_KEY, sanctions_list_root, user_id);

        let proof = self.prover.generate_proof(
            ProofType::SanctionsClear,
            &private_inputs,
            &public_inputs,
        )?;
        self.emit(user_id, "sanctions_clearance", &proof);
        Ok(proof)
    }

    /// Prove that a transaction's source addresses are absent from the
    /// illicit list summarized by `illicit_list_root`. The raw Merkle
    /// path rides along as private material for the circuit.
    pub fn generate_source_clearance_proof(
        &self,
        transaction_id: &str,
        source_addresses: &[String],
        illicit_list_root: &str,
        merkle_proof: &MerklePath,
    ) -> Result<ZkProof, ProverError> {
        let mut private_inputs = InputMap::new();
        private_inputs.insert(
            "transaction_hash".into(),
            Value::String(sha256_hex(&[transaction_id.as_bytes()])),
        );
        private_inputs.insert(
            "source_addresses".into(),
            Value::Array(
                source_addresses
                    .iter()
                    .map(|a| Value::String(a.clone()))
                    .collect(),
            ),
        );
        private_inputs.insert(
            "merkle_proof".into(),
            serde_json::to_value(merkle_proof)
                .map_err(|e| ProverError::Unavailable(format!("unencodable merkle path: {e}")))?,
        );

        let public_inputs =
            self.public_inputs_for(ILLICIT_ROOT_KEY, illicit_list_root, transaction_id);

        let proof = self.prover.generate_proof(
            ProofType::SanctionsClear,
            &private_inputs,
            &public_inputs,
        )?;
        self.emit(transaction_id, "source_clearance", &proof);
        Ok(proof)
    }

    /// Check a clearance proof against the list root that is current now.
    ///
    /// The checks run in a fixed order:
    ///
    /// 1. List freshness — a proof generated against another root is
    ///    declined without invoking the prover at all.
    /// 2. Cryptographic validity via the prover.
    /// 3. Expiry — after the cryptographic check, so an expired-but-valid
    ///    proof is distinguishable from a forged one.
    pub fn verify_proof_of_innocence(
        &self,
        proof: &ZkProof,
        current_list_root: &str,
    ) -> ProofOfInnocenceResult {
        let recorded_root = proof
            .public_inputs
            .get(SANCTIONS_ROOT_KEY)
            .or_else(|| proof.public_inputs.get(ILLICIT_ROOT_KEY))
            .and_then(Value::as_str);
        let fresh = recorded_root
            .map(|root| roots_match(root, current_list_root))
            .unwrap_or(false);
        if !fresh {
            tracing::debug!(
                recorded_root,
                current_list_root,
                "declining proof against outdated list"
            );
            return ProofOfInnocenceResult::declined(
                "Proof generated against outdated sanctions list",
            );
        }

        if !self.prover.verify_proof(proof) {
            return ProofOfInnocenceResult::declined("Invalid ZK proof");
        }

        if proof.is_expired() {
            return ProofOfInnocenceResult::declined("Proof has expired");
        }

        ProofOfInnocenceResult::accepted(proof.expires_at)
    }

    /// Whether a holder should be issued a fresh proof: the list moved,
    /// the proof already expired, or expiry is closer than the threshold.
    pub fn is_proof_renewal_needed(
        &self,
        proof: &ZkProof,
        current_list_root: &str,
        threshold_days: Option<i64>,
    ) -> bool {
        let threshold = threshold_days.unwrap_or(self.renewal_threshold_days);

        let recorded_root = proof
            .public_inputs
            .get(SANCTIONS_ROOT_KEY)
            .or_else(|| proof.public_inputs.get(ILLICIT_ROOT_KEY))
            .and_then(Value::as_str);
        let root_moved = recorded_root
            .map(|root| !roots_match(root, current_list_root))
            .unwrap_or(true);
        if root_moved {
            return true;
        }

        let now = Timestamp::now();
        if proof.is_expired_at(&now) {
            return true;
        }
        now.seconds_until(&proof.expires_at) < threshold * SECONDS_PER_DAY
    }

    fn public_inputs_for(&self, root_key: &str, list_root: &str, subject: &str) -> InputMap {
        let mut public_inputs = InputMap::new();
        public_inputs.insert(root_key.into(), Value::String(list_root.to_string()));
        public_inputs.insert(
            "user_commitment".into(),
            Value::String(blinded_commitment(subject)),
        );
        public_inputs.insert(
            "proof_timestamp".into(),
            Value::String(Timestamp::now().to_iso8601()),
        );
        public_inputs
    }

    fn emit(&self, subject: &str, flow: &str, proof: &ZkProof) {
        self.events.publish(ProofOfInnocenceGenerated {
            event_id: Uuid::new_v4(),
            user_id: subject.to_string(),
            proof_type: flow.to_string(),
            proof_hash: sha256_hex(&[proof.proof.as_bytes()]),
            emitted_at: Timestamp::now(),
        });
    }
}

/// Compare two list roots, tolerating case/prefix variants when both are
/// well-formed hashes.
fn roots_match(a: &str, b: &str) -> bool {
    match (normalize_hash32(a), normalize_hash32(b)) {
        (Ok(left), Ok(right)) => left == right,
        _ => a == b,
    }
}

/// `SHA256(subject ++ nonce)` with a fresh OS-entropy nonce: identical
/// subjects produce unlinkable commitments on every call.
fn blinded_commitment(subject: &str) -> String {
    let mut nonce = [0u8; 32];
    OsRng.fill_bytes(&mut nonce);
    sha256_hex(&[subject.as_bytes(), &nonce])
}

fn sha256_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let out = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&out);
    bytes_to_hash32(&bytes)
}
