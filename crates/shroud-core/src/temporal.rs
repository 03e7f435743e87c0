//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds
//! precision. Proof lifecycles (issuance, expiration, renewal windows) and
//! cache bookkeeping all compare instants; a single normalized
//! representation keeps those comparisons unambiguous across processes.
//!
//! Non-UTC inputs are **rejected at parse time** — there is no silent
//! conversion that could make the same instant render two different ways
//! in audit events.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// From a Unix epoch timestamp in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidTimestamp`] if `secs` is outside the
    /// representable range.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, FormatError> {
        let dt = DateTime::from_timestamp(secs, 0).ok_or_else(|| FormatError::InvalidTimestamp {
            value: secs.to_string(),
            reason: "epoch seconds out of range".into(),
        })?;
        Ok(Self(dt))
    }

    /// Parse an RFC 3339 string, rejecting non-UTC offsets.
    ///
    /// Only the `Z` suffix is accepted; explicit offsets — even `+00:00` —
    /// are rejected so that stored timestamps have one canonical rendering.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidTimestamp`] for malformed or non-UTC
    /// inputs.
    pub fn parse(s: &str) -> Result<Self, FormatError> {
        if !s.ends_with('Z') {
            return Err(FormatError::InvalidTimestamp {
                value: s.to_string(),
                reason: "must use Z suffix (UTC only)".into(),
            });
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| FormatError::InvalidTimestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// This instant shifted forward by whole seconds.
    pub fn plus_seconds(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// This instant shifted forward by whole days.
    pub fn plus_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Signed whole seconds from `self` until `other` (negative if `other`
    /// is in the past relative to `self`).
    pub fn seconds_until(&self, other: &Timestamp) -> i64 {
        (other.0 - self.0).num_seconds()
    }

    /// Whether this instant is at or before the current time.
    pub fn is_past(&self) -> bool {
        self.0 <= Utc::now()
    }

    /// Render as ISO 8601 with Z suffix (e.g. `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
