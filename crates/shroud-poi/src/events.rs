//! # Audit Events
//!
//! Proof issuance is published outward for compliance consumption.
//! Emission goes through an injected sink so flows stay testable and the
//! transport (log shipper, bus, webhook) is a deployment decision.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shroud_core::Timestamp;

/// Published whenever a proof of innocence is issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofOfInnocenceGenerated {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// The subject the proof covers: a user id for sanctions clearance,
    /// a transaction id for source clearance.
    pub user_id: String,
    /// Which clearance flow issued the proof.
    pub proof_type: String,
    /// SHA-256 over the proof body, `0x`-prefixed hex.
    pub proof_hash: String,
    /// When the event was emitted.
    pub emitted_at: Timestamp,
}

/// Outbound channel for audit events.
pub trait EventSink: Send + Sync {
    /// Deliver one event. Delivery failures are the sink's concern;
    /// issuance never rolls back because an event could not be shipped.
    fn publish(&self, event: ProofOfInnocenceGenerated);
}

/// Default sink: a structured log record for audit pipelines to collect.
#[derive(Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: ProofOfInnocenceGenerated) {
        tracing::info!(
            event_id = %event.event_id,
            user_id = %event.user_id,
            proof_type = %event.proof_type,
            proof_hash = %event.proof_hash,
            emitted_at = %event.emitted_at,
            "proof of innocence generated"
        );
    }
}
