//! # Bridge-Delegated Prover
//!
//! Hands proof generation to the external bridge engine. The engine
//! exposes three operations — shield, unshield, transfer — and the input
//! keys decide which one a request maps onto; the transaction payload it
//! returns *is* the proof body.
//!
//! Verification here is intentionally shallow: the engine already proved
//! the transaction server-side, so this backend only confirms the
//! artifact is ours, decodable, and unexpired. That is the stated trust
//! boundary of the delegated design, not an omission.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;

use shroud_bridge::{BridgeClient, BridgeError};
use shroud_core::{ProverError, Timestamp};

use crate::proof::{InputMap, ProofType, ZkProof};
use crate::prover::ZkProver;

/// Input key that marks a private transfer inside the pool.
const TRANSFER_KEY: &str = "recipient_shielded_address";
/// Input key that marks an exit to a public address.
const UNSHIELD_KEY: &str = "recipient_public_address";
/// Input key that marks value entering the pool.
const SHIELD_KEY: &str = "token_address";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BridgeOperation {
    Shield,
    Unshield,
    Transfer,
}

impl BridgeOperation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Shield => "shield",
            Self::Unshield => "unshield",
            Self::Transfer => "transfer",
        }
    }
}

/// Pick the engine operation from the input keys. Transfer wins over
/// unshield wins over shield, matching the specificity of the keys.
fn select_operation(private_inputs: &InputMap, public_inputs: &InputMap) -> Option<BridgeOperation> {
    let has = |key: &str| private_inputs.contains_key(key) || public_inputs.contains_key(key);
    if has(TRANSFER_KEY) {
        Some(BridgeOperation::Transfer)
    } else if has(UNSHIELD_KEY) {
        Some(BridgeOperation::Unshield)
    } else if has(SHIELD_KEY) {
        Some(BridgeOperation::Shield)
    } else {
        None
    }
}

/// Prover backend delegating to the bridge engine.
pub struct BridgeProver {
    client: Arc<BridgeClient>,
    proof_validity_days: i64,
}

impl BridgeProver {
    /// Stable provider name recorded into (and expected back from) proof
    /// metadata.
    pub const PROVIDER_NAME: &'static str = "bridge-delegated";

    /// A prover over an already-configured bridge client.
    pub fn new(client: Arc<BridgeClient>, proof_validity_days: i64) -> Self {
        Self {
            client,
            proof_validity_days,
        }
    }
}

impl ZkProver for BridgeProver {
    fn provider_name(&self) -> &str {
        Self::PROVIDER_NAME
    }

    fn supports_proof_type(&self, _proof_type: ProofType) -> bool {
        // Any statement can ride a bridge transaction; the inputs, not
        // the type, decide whether a request is mappable.
        true
    }

    fn generate_proof(
        &self,
        proof_type: ProofType,
        private_inputs: &InputMap,
        public_inputs: &InputMap,
    ) -> Result<ZkProof, ProverError> {
        let operation = select_operation(private_inputs, public_inputs).ok_or_else(|| {
            ProverError::UnsupportedProofType(format!(
                "{proof_type}: inputs name no shield, unshield, or transfer recipient"
            ))
        })?;

        let mut merged = private_inputs.clone();
        merged.extend(public_inputs.clone());
        let request = Value::Object(merged.into_iter().collect());

        let payload = match operation {
            BridgeOperation::Shield => self.client.shield(&request),
            BridgeOperation::Unshield => self.client.unshield(&request),
            BridgeOperation::Transfer => self.client.transfer(&request),
        }
        .map_err(|e: BridgeError| ProverError::Unavailable(e.to_string()))?;

        if payload.get("transaction").is_none() {
            return Err(ProverError::Unavailable(
                "bridge response carried no transaction payload".into(),
            ));
        }
        tracing::debug!(%proof_type, operation = operation.as_str(), "bridge built transaction");

        let body = serde_json::to_vec(&payload)
            .map_err(|e| ProverError::Unavailable(format!("unencodable bridge payload: {e}")))?;

        let created_at = Timestamp::now();
        let expires_at = created_at.plus_days(self.proof_validity_days);
        let mut metadata = InputMap::new();
        metadata.insert(
            "provider".into(),
            Value::String(Self::PROVIDER_NAME.into()),
        );
        metadata.insert(
            "endpoint".into(),
            Value::String(self.client.base_url().to_string()),
        );
        metadata.insert(
            "operation".into(),
            Value::String(operation.as_str().into()),
        );

        ZkProof::new(
            proof_type,
            BASE64.encode(&body),
            public_inputs.clone(),
            self.verifier_address(proof_type),
            created_at,
            expires_at,
            metadata,
        )
        .map_err(|e| ProverError::MissingConfiguration(e.to_string()))
    }

    fn verify_proof(&self, proof: &ZkProof) -> bool {
        if proof.is_expired() {
            tracing::debug!(proof_type = %proof.proof_type, "rejecting expired proof");
            return false;
        }
        let provider_matches = proof
            .metadata
            .get("provider")
            .and_then(Value::as_str)
            .map(|p| p == Self::PROVIDER_NAME)
            .unwrap_or(false);
        if !provider_matches {
            return false;
        }
        let Ok(body) = BASE64.decode(&proof.proof) else {
            return false;
        };
        let Ok(payload) = serde_json::from_slice::<Value>(&body) else {
            return false;
        };
        payload.get("transaction").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_core::ZERO_ADDRESS;

    fn map_with(key: &str) -> InputMap {
        let mut map = InputMap::new();
        map.insert(key.into(), Value::String("0xabc".into()));
        map
    }

    #[test]
    fn test_operation_selection_by_input_keys() {
        let empty = InputMap::new();
        assert_eq!(
            select_operation(&map_with(TRANSFER_KEY), &empty),
            Some(BridgeOperation::Transfer)
        );
        assert_eq!(
            select_operation(&empty, &map_with(UNSHIELD_KEY)),
            Some(BridgeOperation::Unshield)
        );
        assert_eq!(
            select_operation(&map_with(SHIELD_KEY), &empty),
            Some(BridgeOperation::Shield)
        );
        assert_eq!(select_operation(&empty, &empty), None);
    }

    #[test]
    fn test_transfer_takes_precedence() {
        let mut private = map_with(TRANSFER_KEY);
        private.extend(map_with(SHIELD_KEY));
        assert_eq!(
            select_operation(&private, &InputMap::new()),
            Some(BridgeOperation::Transfer)
        );
    }

    fn proof_with(metadata: InputMap, body: &[u8], valid_for_days: i64) -> ZkProof {
        let created_at = Timestamp::now().plus_days(-2);
        ZkProof::new(
            ProofType::Custom,
            BASE64.encode(body),
            InputMap::new(),
            ZERO_ADDRESS.into(),
            created_at,
            created_at.plus_days(valid_for_days),
            metadata,
        )
        .unwrap()
    }

    fn bridge_metadata() -> InputMap {
        let mut metadata = InputMap::new();
        metadata.insert(
            "provider".into(),
            Value::String(BridgeProver::PROVIDER_NAME.into()),
        );
        metadata
    }

    fn prover() -> BridgeProver {
        let client = BridgeClient::new(shroud_bridge::BridgeConfig {
            base_url: "http://localhost:0".into(),
            api_secret: "secret".into(),
            timeout_secs: 1,
        })
        .unwrap();
        BridgeProver::new(Arc::new(client), 30)
    }

    #[test]
    fn test_shallow_verify_accepts_own_fresh_transaction_payload() {
        let proof = proof_with(bridge_metadata(), br#"{"transaction":{"to":"0x1"}}"#, 30);
        assert!(prover().verify_proof(&proof));
    }

    #[test]
    fn test_shallow_verify_rejects_expired_first() {
        // Expired but otherwise pristine.
        let proof = proof_with(bridge_metadata(), br#"{"transaction":{}}"#, 1);
        assert!(!prover().verify_proof(&proof));
    }

    #[test]
    fn test_shallow_verify_rejects_foreign_provider() {
        let mut metadata = InputMap::new();
        metadata.insert("provider".into(), Value::String("someone-else".into()));
        let proof = proof_with(metadata, br#"{"transaction":{}}"#, 30);
        assert!(!prover().verify_proof(&proof));
    }

    #[test]
    fn test_shallow_verify_rejects_missing_transaction_key() {
        let proof = proof_with(bridge_metadata(), br#"{"note":"no tx"}"#, 30);
        assert!(!prover().verify_proof(&proof));
    }

    #[test]
    fn test_unmappable_inputs_are_unsupported_proof_type() {
        let err = prover()
            .generate_proof(ProofType::Custom, &InputMap::new(), &InputMap::new())
            .unwrap_err();
        assert!(matches!(err, ProverError::UnsupportedProofType(_)));
    }
}
