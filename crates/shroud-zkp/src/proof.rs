//! # Proof Types
//!
//! `ProofType` is the closed set of compliance statements this system can
//! prove; `ZkProof` is the immutable artifact a prover hands back. A proof
//! is created once and only read afterwards — renewal means issuing a
//! brand-new proof, never editing an existing one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use shroud_core::{FormatError, Timestamp};

/// Named input maps for proof generation. `BTreeMap` keeps key order
/// deterministic across serializations.
pub type InputMap = BTreeMap<String, serde_json::Value>;

/// The compliance statements a prover can attest to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofType {
    /// Holder is above a required age threshold.
    AgeVerification,
    /// Holder resides in a permitted jurisdiction.
    Residency,
    /// Holder has completed a given KYC tier.
    KycTier,
    /// Holder qualifies as an accredited investor.
    AccreditedInvestor,
    /// Holder (or transaction) is absent from a sanctions list.
    SanctionsClear,
    /// Holder's income falls inside a declared range.
    IncomeRange,
    /// Deployment-defined circuit.
    Custom,
}

impl ProofType {
    /// Every proof type, for iteration in config validation and tests.
    pub const ALL: [ProofType; 7] = [
        ProofType::AgeVerification,
        ProofType::Residency,
        ProofType::KycTier,
        ProofType::AccreditedInvestor,
        ProofType::SanctionsClear,
        ProofType::IncomeRange,
        ProofType::Custom,
    ];

    /// The proof type identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AgeVerification => "age_verification",
            Self::Residency => "residency",
            Self::KycTier => "kyc_tier",
            Self::AccreditedInvestor => "accredited_investor",
            Self::SanctionsClear => "sanctions_clear",
            Self::IncomeRange => "income_range",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable zero-knowledge proof artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZkProof {
    /// The statement this proof attests to.
    pub proof_type: ProofType,
    /// Opaque proof body, base64.
    pub proof: String,
    /// Public inputs the proof commits to.
    pub public_inputs: InputMap,
    /// Address of the verifying contract, or the zero-address sentinel.
    pub verifier_address: String,
    /// When the proof was issued.
    pub created_at: Timestamp,
    /// When the proof stops being acceptable.
    pub expires_at: Timestamp,
    /// Backend-specific annotations (provider, endpoint, circuit).
    pub metadata: InputMap,
}

impl ZkProof {
    /// Assemble a proof, enforcing `expires_at > created_at`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        proof_type: ProofType,
        proof: String,
        public_inputs: InputMap,
        verifier_address: String,
        created_at: Timestamp,
        expires_at: Timestamp,
        metadata: InputMap,
    ) -> Result<Self, FormatError> {
        if expires_at <= created_at {
            return Err(FormatError::InvalidTimestamp {
                value: expires_at.to_iso8601(),
                reason: "proof must expire after its creation time".into(),
            });
        }
        Ok(Self {
            proof_type,
            proof,
            public_inputs,
            verifier_address,
            created_at,
            expires_at,
            metadata,
        })
    }

    /// Whether the proof is expired at the given instant.
    pub fn is_expired_at(&self, now: &Timestamp) -> bool {
        self.expires_at <= *now
    }

    /// Whether the proof is expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(&Timestamp::now())
    }
}
