//! # 32-Byte Hex Hash Helpers
//!
//! Commitments, roots, and siblings travel through this system as
//! `0x`-prefixed 64-character lowercase hex strings. This module owns the
//! format: predicates for fail-fast validation, normalization for storage
//! keys, and conversion to and from raw bytes.
//!
//! Validation accepts mixed-case hex (external callers send both), but
//! every value this workspace *produces* is lowercase.

use crate::error::FormatError;

/// The all-zero hash, used as the empty-leaf filler in fixed-depth trees.
pub const ZERO_HASH32: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Zero-address sentinel for unconfigured verifier contracts.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Whether `s` is a `0x`-prefixed 64-character hex string (any case).
pub fn is_hash32(s: &str) -> bool {
    let Some(body) = s.strip_prefix("0x") else {
        return false;
    };
    body.len() == 64 && body.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Normalize a hash for storage and lookup: trim, lowercase, ensure the
/// `0x` prefix. Case and prefix variants of the same value normalize to
/// one canonical key.
///
/// # Errors
///
/// Returns [`FormatError::InvalidHash`] if the remainder is not exactly
/// 64 hex characters.
pub fn normalize_hash32(s: &str) -> Result<String, FormatError> {
    let trimmed = s.trim().to_lowercase();
    let body = trimmed.strip_prefix("0x").unwrap_or(&trimmed);
    if body.len() != 64 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FormatError::InvalidHash(s.to_string()));
    }
    Ok(format!("0x{body}"))
}

/// Decode a `0x`-prefixed 64-character hex string into 32 raw bytes.
pub fn hash32_to_bytes(s: &str) -> Result<[u8; 32], FormatError> {
    if !is_hash32(s) {
        return Err(FormatError::InvalidHash(s.to_string()));
    }
    let mut out = [0u8; 32];
    hex::decode_to_slice(&s[2..], &mut out)
        .map_err(|_| FormatError::InvalidHash(s.to_string()))?;
    Ok(out)
}

/// Encode 32 raw bytes as a canonical `0x`-prefixed lowercase hex string.
pub fn bytes_to_hash32(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}
