//! Ledger references
//!
//! A reference identifies one logical financial event and is the idempotency
//! key: at most one ledger entry with a given reference exists system-wide.
//! Format: human-diagnosable prefix + ULID (sortable, coordination-free).

use std::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Globally unique reference string for one ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
    /// Wrap a caller-supplied reference (e.g. from a webhook payload)
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Generate a fresh reference for an inbound funding payment
    pub fn funding() -> Self {
        Self(format!("FUND-{}", Ulid::new()))
    }

    /// Generate the sender-side reference of an internal transfer
    pub fn transfer_sender() -> Self {
        Self(format!("TRANSFER-SENDER-{}", Ulid::new()))
    }

    /// Generate the recipient-side reference of an internal transfer
    pub fn transfer_recipient() -> Self {
        Self(format!("TRANSFER-RECIPIENT-{}", Ulid::new()))
    }

    /// Generate a reference for an external payout debit
    pub fn external_transfer() -> Self {
        Self(format!("EXT-TRANSFER-{}", Ulid::new()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Reference {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Correlation id shared by the two sides of one transfer attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferId(Ulid);

impl TransferId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert!(Reference::funding().as_str().starts_with("FUND-"));
        assert!(
            Reference::transfer_sender()
                .as_str()
                .starts_with("TRANSFER-SENDER-")
        );
        assert!(
            Reference::transfer_recipient()
                .as_str()
                .starts_with("TRANSFER-RECIPIENT-")
        );
        assert!(
            Reference::external_transfer()
                .as_str()
                .starts_with("EXT-TRANSFER-")
        );
    }

    #[test]
    fn test_uniqueness() {
        let a = Reference::funding();
        let b = Reference::funding();
        assert_ne!(a, b);
    }

    #[test]
    fn test_transfer_id_display_roundtrip() {
        let id = TransferId::new();
        assert_eq!(id.to_string().len(), 26); // ULID canonical length
    }
}
