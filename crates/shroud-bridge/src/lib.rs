//! # shroud-bridge — External Wallet/Proving Bridge Client
//!
//! The boundary to the delegated external engine: a bearer-authenticated
//! HTTP service exposing wallet and proof operations behind a uniform
//! `{success, data|error}` envelope. Everything behind that envelope —
//! wallet custody, circuit execution, transaction assembly — is the
//! remote's business.
//!
//! One error type crosses this boundary: [`BridgeError`], carrying the
//! remote message, with remote "not found" answers kept distinguishable
//! so consumers can map them onto their own taxonomies.

pub mod client;
pub mod types;

pub use client::{BridgeClient, BridgeConfig, BridgeError};
pub use types::{
    Envelope, HealthResponse, VerifyCommitmentResponse, WalletInfo, WireMerklePath, WireMerkleRoot,
};
