//! Wallet domain: enforced balances, immutable ledger entries, and the
//! atomic store that ties them together.

pub mod balance;
pub mod entry;
pub mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use balance::Balance;
pub use entry::{EntryDirection, EntryMetadata, EntrySource, EntryStatus, LedgerEntry};
pub use store::{WalletSnapshot, WalletStore};

/// Owning-account identifier. Issued by the external identity collaborator;
/// opaque to the wallet core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
