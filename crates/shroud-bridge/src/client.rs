//! # Bridge Client
//!
//! Blocking HTTP client for the external wallet/proving engine. Every call
//! is synchronous with a bounded timeout; a timed-out or failed call
//! surfaces as an explicit error, never an indefinite block, and no call
//! is retried here.
//!
//! The remote's cryptography and wallet internals are out of scope — this
//! client only speaks the envelope contract and authenticates with a
//! bearer secret.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::types::{
    Envelope, HealthResponse, VerifyCommitmentResponse, WalletInfo, WireMerklePath, WireMerkleRoot,
};

/// Failure at the bridge boundary, carrying the remote message.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The wallet, commitment, or proof does not exist remotely.
    #[error("bridge: not found: {0}")]
    NotFound(String),

    /// The remote reported failure or answered with a non-2xx status.
    #[error("bridge: {0}")]
    Remote(String),

    /// The request could not be sent or the response could not be decoded.
    #[error("bridge transport: {0}")]
    Transport(String),
}

fn default_timeout_secs() -> u64 {
    30
}

/// Bridge endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Base URL of the bridge service, no trailing slash.
    pub base_url: String,
    /// Bearer secret presented on every request.
    pub api_secret: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BridgeConfig {
    /// Load a config from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, BridgeError> {
        serde_yaml::from_str(yaml).map_err(|e| BridgeError::Transport(e.to_string()))
    }
}

/// Blocking client for the bridge envelope API.
#[derive(Debug)]
pub struct BridgeClient {
    http: reqwest::blocking::Client,
    config: BridgeConfig,
}

impl BridgeClient {
    /// Build a client with the configured bounded timeout.
    pub fn new(config: BridgeConfig) -> Result<Self, BridgeError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BridgeError::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// The configured bridge base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Create a wallet on the bridge.
    pub fn create_wallet(&self, label: Option<&str>) -> Result<WalletInfo, BridgeError> {
        self.post("/wallet", &serde_json::json!({ "label": label }))
    }

    /// Shielded and public balances for a wallet.
    pub fn balances(&self, wallet_id: &str) -> Result<Value, BridgeError> {
        self.get(&format!("/wallet/{wallet_id}/balances"), &[])
    }

    /// Trigger a UTXO rescan for a wallet.
    pub fn scan(&self, wallet_id: &str) -> Result<Value, BridgeError> {
        self.post(&format!("/wallet/{wallet_id}/scan"), &serde_json::json!({}))
    }

    /// Build a shield transaction from the given inputs.
    pub fn shield(&self, inputs: &Value) -> Result<Value, BridgeError> {
        self.post("/proof/shield", inputs)
    }

    /// Build an unshield transaction from the given inputs.
    pub fn unshield(&self, inputs: &Value) -> Result<Value, BridgeError> {
        self.post("/proof/unshield", inputs)
    }

    /// Build a private transfer transaction from the given inputs.
    pub fn transfer(&self, inputs: &Value) -> Result<Value, BridgeError> {
        self.post("/proof/transfer", inputs)
    }

    /// Fetch a previously built proof by identifier.
    pub fn proof(&self, proof_id: &str) -> Result<Value, BridgeError> {
        self.get(&format!("/proof/{proof_id}"), &[])
    }

    /// The bridge's current tree snapshot for a network.
    pub fn merkle_root(&self, network: &str) -> Result<WireMerkleRoot, BridgeError> {
        self.get("/merkle/root", &[("network", network)])
    }

    /// Proof material for one commitment on a network.
    pub fn merkle_path(
        &self,
        commitment: &str,
        network: &str,
    ) -> Result<WireMerklePath, BridgeError> {
        self.get(
            "/merkle/path",
            &[("commitment", commitment), ("network", network)],
        )
    }

    /// Ask the bridge to verify a commitment against its own tree.
    pub fn verify_commitment(
        &self,
        commitment: &str,
        network: &str,
    ) -> Result<VerifyCommitmentResponse, BridgeError> {
        self.post(
            "/merkle/verify",
            &serde_json::json!({ "commitment": commitment, "network": network }),
        )
    }

    /// Bridge liveness probe.
    pub fn health(&self) -> Result<HealthResponse, BridgeError> {
        self.get("/health", &[])
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BridgeError> {
        let url = format!("{}{path}", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_secret)
            .query(query)
            .send()
            .map_err(|e| BridgeError::Transport(e.to_string()))?;
        Self::unwrap_envelope(path, response)
    }

    fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, BridgeError> {
        let url = format!("{}{path}", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_secret)
            .json(body)
            .send()
            .map_err(|e| BridgeError::Transport(e.to_string()))?;
        Self::unwrap_envelope(path, response)
    }

    fn unwrap_envelope<T: DeserializeOwned>(
        path: &str,
        response: reqwest::blocking::Response,
    ) -> Result<T, BridgeError> {
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| BridgeError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Envelope<Value>>(&body)
                .ok()
                .and_then(|env| env.error)
                .unwrap_or_else(|| format!("HTTP {status}"));
            tracing::debug!(path, %status, "bridge call failed");
            return Err(classify_remote_error(
                status == reqwest::StatusCode::NOT_FOUND,
                message,
            ));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| BridgeError::Transport(format!("invalid envelope from {path}: {e}")))?;
        if !envelope.success {
            let message = envelope
                .error
                .unwrap_or_else(|| "remote reported failure without message".into());
            return Err(classify_remote_error(false, message));
        }
        envelope
            .data
            .ok_or_else(|| BridgeError::Transport(format!("success envelope from {path} missing data")))
    }
}

/// Distinguish remote not-found answers from other remote failures so
/// callers can map them onto their own taxonomy.
fn classify_remote_error(http_not_found: bool, message: String) -> BridgeError {
    if http_not_found || message.to_lowercase().contains("not found") {
        BridgeError::NotFound(message)
    } else {
        BridgeError::Remote(message)
    }
}
