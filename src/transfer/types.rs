//! Transfer types and per-attempt state machine

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use crate::money::Kobo;
use crate::wallet::{AccountId, LedgerEntry};

/// Progress of one transfer attempt.
///
/// `Initiated → VerifyingRecipient → Debiting → Completed`, or `Failed` at
/// any step. No partial balance change is ever observable outside
/// `Completed`: the debit/credit pair commits in one atomic unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TransferState {
    Initiated,
    VerifyingRecipient,
    Debiting,
    Completed,
    Failed,
}

impl TransferState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferState::Completed | TransferState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferState::Initiated => "initiated",
            TransferState::VerifyingRecipient => "verifying-recipient",
            TransferState::Debiting => "debiting",
            TransferState::Completed => "completed",
            TransferState::Failed => "failed",
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Peer-to-peer movement between two wallets in this system
#[derive(Debug, Clone)]
pub struct InternalTransferRequest {
    pub sender: AccountId,
    pub recipient_account_number: String,
    pub amount: Kobo,
    pub description: Option<String>,
}

/// Movement from a wallet to an external bank account via the rail
#[derive(Debug, Clone)]
pub struct ExternalTransferRequest {
    pub sender: AccountId,
    pub account_number: String,
    pub bank_code: String,
    pub amount: Kobo,
    pub description: Option<String>,
}

/// Result of a completed transfer attempt
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransferOutcome {
    /// Correlation id shared by both sides' ledger entries
    pub transfer_id: String,
    pub state: TransferState,
    /// Sender's new balance in kobo
    pub new_balance: Kobo,
    pub debit_entry: LedgerEntry,
    /// Present for internal transfers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_entry: Option<LedgerEntry>,
    /// Fee charged, external transfers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Kobo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(TransferState::Completed.is_terminal());
        assert!(TransferState::Failed.is_terminal());
        assert!(!TransferState::Initiated.is_terminal());
        assert!(!TransferState::VerifyingRecipient.is_terminal());
        assert!(!TransferState::Debiting.is_terminal());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(TransferState::VerifyingRecipient.to_string(), "verifying-recipient");
    }
}
