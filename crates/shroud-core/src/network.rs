//! # Network Identifiers
//!
//! Newtype wrapper for blockchain network identifiers. Providers key their
//! trees, caches, and endpoint configuration by `NetworkId` — a bare string
//! cannot cross that seam.

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Identifier for a blockchain network served by a provider
/// (e.g. `ethereum`, `polygon`, `arbitrum`).
///
/// Stored lowercase so lookups are case-insensitive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkId(String);

impl NetworkId {
    /// Create a network identifier, validating shape and normalizing case.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidNetwork`] if the string is empty,
    /// whitespace-only, or contains characters outside `[a-z0-9-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, FormatError> {
        let s = value.into().trim().to_lowercase();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-') {
            return Err(FormatError::InvalidNetwork(s));
        }
        Ok(Self(s))
    }

    /// Access the network identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_case() {
        let id = NetworkId::new("Polygon").unwrap();
        assert_eq!(id.as_str(), "polygon");
    }

    #[test]
    fn test_new_trims_whitespace() {
        let id = NetworkId::new("  ethereum  ").unwrap();
        assert_eq!(id.as_str(), "ethereum");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(NetworkId::new("").is_err());
        assert!(NetworkId::new("   ").is_err());
    }

    #[test]
    fn test_invalid_characters_rejected() {
        assert!(NetworkId::new("eth_mainnet").is_err());
        assert!(NetworkId::new("eth mainnet").is_err());
    }

    #[test]
    fn test_hyphen_and_digits_accepted() {
        assert!(NetworkId::new("arbitrum-one").is_ok());
        assert!(NetworkId::new("bsc56").is_ok());
    }
}
