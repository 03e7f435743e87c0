//! # Prover Selection
//!
//! Mirror of the tree-provider selection: a tagged config enum names the
//! proof backend, [`ProverConfig::build`] turns it into a boxed
//! [`ZkProver`]. The backend set is closed at compile time.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use shroud_bridge::{BridgeClient, BridgeConfig};
use shroud_core::ProverError;

use crate::bridge::BridgeProver;
use crate::local::{LocalCircuitProver, LocalProverConfig};
use crate::prover::ZkProver;

fn default_proof_validity_days() -> i64 {
    90
}

/// Proof backend selection plus its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "kebab-case")]
pub enum ProverConfig {
    /// Local circuit toolkit subprocess.
    LocalCircuit {
        /// The local prover settings.
        #[serde(flatten)]
        local: LocalProverConfig,
    },
    /// Delegation to the external bridge engine.
    BridgeDelegated {
        /// Bridge endpoint settings.
        bridge: BridgeConfig,
        /// Validity window stamped onto issued proofs.
        #[serde(default = "default_proof_validity_days")]
        proof_validity_days: i64,
    },
}

impl ProverConfig {
    /// Load a selection from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProverError> {
        serde_yaml::from_str(yaml).map_err(|e| ProverError::MissingConfiguration(e.to_string()))
    }

    /// Build the configured prover.
    pub fn build(self) -> Result<Box<dyn ZkProver>, ProverError> {
        match self {
            Self::LocalCircuit { local } => Ok(Box::new(LocalCircuitProver::new(local))),
            Self::BridgeDelegated {
                bridge,
                proof_validity_days,
            } => {
                let client = BridgeClient::new(bridge)
                    .map_err(|e| ProverError::Unavailable(e.to_string()))?;
                Ok(Box::new(BridgeProver::new(
                    Arc::new(client),
                    proof_validity_days,
                )))
            }
        }
    }
}
