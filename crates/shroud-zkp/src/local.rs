//! # Local Circuit Prover
//!
//! Drives an external proving-toolkit binary, one invocation per proof.
//! Each configured proof type maps to a circuit directory holding the
//! proving key (`<circuit>.zkey`) and verification key
//! (`verification_key.json`); inputs travel as a temp JSON file and the
//! proof artifact comes back on stdout.
//!
//! The subprocess is a blocking external boundary with a hard deadline:
//! on timeout the child is killed, and a drop guard kills it on every
//! other early exit path too — a failed proof never leaks a prover
//! process.

use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shroud_core::{ProverError, Timestamp, ZERO_ADDRESS};

use crate::proof::{InputMap, ProofType, ZkProof};
use crate::prover::ZkProver;

fn default_toolkit_bin() -> String {
    "snarkjs".into()
}

fn default_proving_timeout_secs() -> u64 {
    30
}

fn default_proof_validity_days() -> i64 {
    90
}

/// Configuration for the local circuit prover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalProverConfig {
    /// The proving-toolkit binary to invoke.
    #[serde(default = "default_toolkit_bin")]
    pub toolkit_bin: String,
    /// Directory holding one subdirectory per circuit.
    pub circuits_dir: PathBuf,
    /// Which circuit proves which statement.
    pub circuits: HashMap<ProofType, String>,
    /// Verifying contract per proof type; unlisted types answer the
    /// zero-address sentinel.
    #[serde(default)]
    pub verifier_addresses: HashMap<ProofType, String>,
    /// Hard deadline for one proving run.
    #[serde(default = "default_proving_timeout_secs")]
    pub proving_timeout_secs: u64,
    /// Validity window stamped onto issued proofs.
    #[serde(default = "default_proof_validity_days")]
    pub proof_validity_days: i64,
}

impl LocalProverConfig {
    /// Load a config from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProverError> {
        serde_yaml::from_str(yaml).map_err(|e| ProverError::MissingConfiguration(e.to_string()))
    }
}

/// Prover backend shelling out to the circuit toolkit.
pub struct LocalCircuitProver {
    config: LocalProverConfig,
}

impl LocalCircuitProver {
    /// Build a prover over the given circuit table.
    pub fn new(config: LocalProverConfig) -> Self {
        Self { config }
    }

    fn circuit_for(&self, proof_type: ProofType) -> Result<&str, ProverError> {
        self.config
            .circuits
            .get(&proof_type)
            .map(String::as_str)
            .ok_or_else(|| {
                ProverError::CircuitNotFound(format!(
                    "no circuit mapped for proof type {proof_type}"
                ))
            })
    }

    fn circuit_dir(&self, circuit: &str) -> PathBuf {
        self.config.circuits_dir.join(circuit)
    }

    fn proving_key_path(&self, circuit: &str) -> PathBuf {
        self.circuit_dir(circuit).join(format!("{circuit}.zkey"))
    }

    fn verification_key_path(&self, circuit: &str) -> PathBuf {
        self.circuit_dir(circuit).join("verification_key.json")
    }
}

impl ZkProver for LocalCircuitProver {
    fn provider_name(&self) -> &str {
        "local-circuit"
    }

    fn supports_proof_type(&self, proof_type: ProofType) -> bool {
        self.config.circuits.contains_key(&proof_type)
    }

    fn verifier_address(&self, proof_type: ProofType) -> String {
        self.config
            .verifier_addresses
            .get(&proof_type)
            .cloned()
            .unwrap_or_else(|| ZERO_ADDRESS.to_string())
    }

    fn generate_proof(
        &self,
        proof_type: ProofType,
        private_inputs: &InputMap,
        public_inputs: &InputMap,
    ) -> Result<ZkProof, ProverError> {
        let circuit = self.circuit_for(proof_type)?.to_string();
        let zkey = self.proving_key_path(&circuit);
        if !zkey.is_file() {
            return Err(ProverError::CircuitNotFound(format!(
                "proving key artifact missing: {}",
                zkey.display()
            )));
        }

        // The toolkit sees one flat signal map; public entries win on
        // key collision so the committed values are the ones proven.
        let mut signals = private_inputs.clone();
        signals.extend(public_inputs.clone());
        let input_file = write_temp_json(&Value::Object(signals.into_iter().collect()))
            .map_err(|reason| ProverError::ProcessFailed {
                circuit: circuit.clone(),
                reason,
            })?;

        let mut command = Command::new(&self.config.toolkit_bin);
        command
            .arg("prove")
            .arg("--zkey")
            .arg(&zkey)
            .arg("--input")
            .arg(input_file.path());

        let timeout = Duration::from_secs(self.config.proving_timeout_secs);
        let started = Instant::now();
        let output = run_with_timeout(command, timeout).map_err(|reason| {
            ProverError::ProcessFailed {
                circuit: circuit.clone(),
                reason,
            }
        })?;
        tracing::debug!(
            circuit = %circuit,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "proving run finished"
        );

        // The artifact must at least be JSON before we wrap it up.
        if serde_json::from_slice::<Value>(&output).is_err() {
            return Err(ProverError::ProcessFailed {
                circuit,
                reason: "toolkit emitted an invalid proof artifact".into(),
            });
        }

        let created_at = Timestamp::now();
        let expires_at = created_at.plus_days(self.config.proof_validity_days);
        let mut metadata = InputMap::new();
        metadata.insert("provider".into(), Value::String(self.provider_name().into()));
        metadata.insert("circuit".into(), Value::String(circuit));
        metadata.insert(
            "toolkit".into(),
            Value::String(self.config.toolkit_bin.clone()),
        );

        ZkProof::new(
            proof_type,
            BASE64.encode(&output),
            public_inputs.clone(),
            self.verifier_address(proof_type),
            created_at,
            expires_at,
            metadata,
        )
        .map_err(|e| ProverError::MissingConfiguration(e.to_string()))
    }

    fn verify_proof(&self, proof: &ZkProof) -> bool {
        // Expiry comes first, before any artifact or key work.
        if proof.is_expired() {
            tracing::debug!(proof_type = %proof.proof_type, "rejecting expired proof");
            return false;
        }
        let Ok(circuit) = self.circuit_for(proof.proof_type) else {
            return false;
        };
        let vkey = self.verification_key_path(circuit);
        if !vkey.is_file() {
            tracing::debug!(vkey = %vkey.display(), "verification key artifact missing");
            return false;
        }
        let Ok(artifact_bytes) = BASE64.decode(&proof.proof) else {
            return false;
        };
        let Ok(artifact) = serde_json::from_slice::<Value>(&artifact_bytes) else {
            return false;
        };
        let Ok(proof_file) = write_temp_json(&artifact) else {
            return false;
        };

        let mut command = Command::new(&self.config.toolkit_bin);
        command
            .arg("verify")
            .arg("--vkey")
            .arg(&vkey)
            .arg("--proof")
            .arg(proof_file.path());

        let timeout = Duration::from_secs(self.config.proving_timeout_secs);
        match run_exit_status(command, timeout) {
            Ok(success) => success,
            Err(reason) => {
                tracing::warn!(circuit = %circuit, reason = %reason, "verification run failed");
                false
            }
        }
    }
}

/// Serialize a JSON value into a named temp file.
fn write_temp_json(value: &Value) -> Result<tempfile::NamedTempFile, String> {
    let file = tempfile::NamedTempFile::new().map_err(|e| e.to_string())?;
    serde_json::to_writer(&file, value).map_err(|e| e.to_string())?;
    Ok(file)
}

/// Kill-on-drop wrapper: whatever path leaves the proving function, the
/// child does not outlive it.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Run a command to completion within `timeout`, returning its stdout.
///
/// On timeout the child is hard-killed and an error naming the deadline
/// is returned. A non-zero exit reports the child's stderr.
fn run_with_timeout(command: Command, timeout: Duration) -> Result<Vec<u8>, String> {
    let (status_ok, stdout, stderr) = run_collect(command, timeout)?;
    if !status_ok {
        let detail = String::from_utf8_lossy(&stderr);
        return Err(format!("toolkit exited non-zero: {}", detail.trim()));
    }
    Ok(stdout)
}

/// Run a command within `timeout`, reporting only whether it exited zero.
fn run_exit_status(command: Command, timeout: Duration) -> Result<bool, String> {
    let (status_ok, _, _) = run_collect(command, timeout)?;
    Ok(status_ok)
}

fn run_collect(mut command: Command, timeout: Duration) -> Result<(bool, Vec<u8>, Vec<u8>), String> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command
        .spawn()
        .map_err(|e| format!("failed to launch toolkit: {e}"))?;

    // Drain the pipes on threads so a chatty child cannot deadlock
    // against a full pipe buffer while we poll for exit.
    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);
    let mut guard = ChildGuard {
        child,
        reaped: false,
    };

    let deadline = Instant::now() + timeout;
    loop {
        match guard.child.try_wait() {
            Ok(Some(status)) => {
                guard.reaped = true;
                let stdout = join_reader(stdout_reader);
                let stderr = join_reader(stderr_reader);
                return Ok((status.success(), stdout, stderr));
            }
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = guard.child.kill();
                    let _ = guard.child.wait();
                    guard.reaped = true;
                    return Err(format!("timed out after {}s", timeout.as_secs()));
                }
                std::thread::sleep(Duration::from_millis(25));
            }
            Err(e) => return Err(format!("failed to poll toolkit: {e}")),
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> std::thread::JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        buffer
    })
}

fn join_reader(handle: Option<std::thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
