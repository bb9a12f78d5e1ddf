//! Ledger entries
//!
//! One immutable record per credit/debit applied to a wallet. Entries are
//! append-only: corrections are new offsetting entries, never edits. The
//! reference is globally unique across the whole ledger and serves as the
//! idempotency key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::money::Kobo;
use crate::reference::Reference;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    Credit,
    Debit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EntrySource {
    PaymentGateway,
    PeerTransfer,
    ExternalPayout,
}

impl EntrySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntrySource::PaymentGateway => "payment-gateway",
            EntrySource::PeerTransfer => "peer-transfer",
            EntrySource::ExternalPayout => "external-payout",
        }
    }
}

/// Caller-supplied context recorded alongside a mutation
#[derive(Debug, Clone, Default)]
pub struct EntryMetadata {
    /// Counterparty account number or external bank identifier
    pub counterparty: Option<String>,
    /// Free-text description
    pub description: Option<String>,
    /// Gateway's own transaction identifier, for reconciliation
    pub gateway_txn_id: Option<String>,
    /// Fixed fee charged on top of the amount (external payouts)
    pub fee: Option<Kobo>,
    /// Correlation id linking the two sides of one transfer attempt
    pub transfer_id: Option<String>,
}

impl EntryMetadata {
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Default::default()
        }
    }
}

/// One immutable ledger record. Never mutated or removed once written.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LedgerEntry {
    pub direction: EntryDirection,
    /// Principal amount in kobo (fee, if any, recorded separately)
    pub amount: Kobo,
    #[schema(value_type = String)]
    pub reference: Reference,
    pub status: EntryStatus,
    pub source: EntrySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_txn_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Kobo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_id: Option<String>,
    /// Wallet balance immediately after this entry was applied
    pub balance_after: Kobo,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub(crate) fn completed(
        direction: EntryDirection,
        amount: Kobo,
        reference: Reference,
        source: EntrySource,
        meta: EntryMetadata,
        balance_after: Kobo,
    ) -> Self {
        Self {
            direction,
            amount,
            reference,
            status: EntryStatus::Completed,
            source,
            counterparty: meta.counterparty,
            description: meta.description,
            gateway_txn_id: meta.gateway_txn_id,
            fee: meta.fee,
            transfer_id: meta.transfer_id,
            balance_after,
            created_at: Utc::now(),
        }
    }

    /// Total the entry moved out of (or into) the wallet, fee included
    pub fn total(&self) -> Kobo {
        self.amount.saturating_add(self.fee.unwrap_or(0))
    }
}
