//! # End-to-End Clearance Flow
//!
//! The full path a compliance caller walks: register a commitment with a
//! tree provider, fetch and verify its path, issue a source clearance
//! proof carrying that path, then re-check the proof against moving list
//! state.

use std::sync::{Arc, Mutex};

use anyhow::Result;

use shroud_core::{NetworkId, ProverError, Timestamp, ZERO_ADDRESS};
use shroud_merkle::{InMemoryDemoProvider, MerkleTreeProvider};
use shroud_poi::{EventSink, ProofOfInnocenceGenerated, ProofOfInnocenceService};
use shroud_zkp::{InputMap, ProofType, ZkProof, ZkProver};

/// Always-valid prover double; the flow under test is the orchestration,
/// not the circuit.
struct AcceptingProver;

impl ZkProver for AcceptingProver {
    fn provider_name(&self) -> &str {
        "accepting"
    }

    fn supports_proof_type(&self, _proof_type: ProofType) -> bool {
        true
    }

    fn generate_proof(
        &self,
        proof_type: ProofType,
        _private_inputs: &InputMap,
        public_inputs: &InputMap,
    ) -> Result<ZkProof, ProverError> {
        let created_at = Timestamp::now();
        ZkProof::new(
            proof_type,
            "aW50ZWdyYXRpb24=".into(),
            public_inputs.clone(),
            ZERO_ADDRESS.into(),
            created_at,
            created_at.plus_days(90),
            InputMap::new(),
        )
        .map_err(|e| ProverError::MissingConfiguration(e.to_string()))
    }

    fn verify_proof(&self, _proof: &ZkProof) -> bool {
        true
    }
}

#[derive(Default)]
struct CollectingSink {
    events: Mutex<Vec<ProofOfInnocenceGenerated>>,
}

impl EventSink for CollectingSink {
    fn publish(&self, event: ProofOfInnocenceGenerated) {
        self.events.lock().unwrap().push(event);
    }
}

#[test]
fn commitment_to_clearance_round_trip() -> Result<()> {
    let polygon = NetworkId::new("polygon")?;
    let provider = InMemoryDemoProvider::with_default_networks();

    // A new commitment lands in the pool's tree and proves membership.
    let commitment = format!("0x{}", "c1".repeat(32));
    provider.add_demo_commitment(&commitment, &polygon)?;
    let path = provider.merkle_path(&commitment, &polygon)?;
    assert!(provider.verify_commitment(&commitment, &path)?);

    // The illicit-source list root current at issuance time.
    let list_root = provider.merkle_root(&polygon)?.root;

    let sink = Arc::new(CollectingSink::default());
    let service = ProofOfInnocenceService::new(AcceptingProver, sink.clone());

    let proof = service.generate_source_clearance_proof(
        "tx-4711",
        &["0xdeadbeef".into()],
        &list_root,
        &path,
    )?;

    // Fresh list, valid proof.
    let result = service.verify_proof_of_innocence(&proof, &list_root);
    assert!(result.valid);
    assert_eq!(result.valid_until, Some(proof.expires_at));
    assert!(!service.is_proof_renewal_needed(&proof, &list_root, None));

    // The list moves (a new entry lands in the tree): the old proof is
    // declined without a new proving run and flagged for renewal.
    provider.add_demo_commitment(&format!("0x{}", "d2".repeat(32)), &polygon)?;
    let moved_root = provider.merkle_root(&polygon)?.root;
    assert_ne!(list_root, moved_root);

    let stale = service.verify_proof_of_innocence(&proof, &moved_root);
    assert!(!stale.valid);
    assert_eq!(
        stale.reason.as_deref(),
        Some("Proof generated against outdated sanctions list")
    );
    assert!(service.is_proof_renewal_needed(&proof, &moved_root, None));

    // Renewal is a brand-new proof with its own unlinkable commitment.
    let renewed = service.generate_source_clearance_proof(
        "tx-4711",
        &["0xdeadbeef".into()],
        &moved_root,
        &path,
    )?;
    assert!(service.verify_proof_of_innocence(&renewed, &moved_root).valid);
    assert_ne!(
        proof.public_inputs.get("user_commitment"),
        renewed.public_inputs.get("user_commitment")
    );

    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.proof_type == "source_clearance"));
    Ok(())
}
