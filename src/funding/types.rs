//! Funding pipeline DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::money::Kobo;

/// Result of starting a hosted funding payment
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FundingInitiated {
    pub payment_url: String,
    pub reference: String,
    pub gateway_txn_id: String,
}

/// Result of reconciling a funding payment
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FundingSettled {
    /// Wallet balance after settlement, in kobo
    pub balance: Kobo,
    pub gateway_txn_id: String,
    pub reference: String,
    /// True when the ledger already held this reference and no new credit
    /// was applied (duplicate webhook delivery or re-verification)
    pub already_processed: bool,
}

/// Gateway webhook envelope.
///
/// Only `data.id` is trusted as a lookup key; amount and status claims are
/// re-checked against the rail's verification endpoint before any credit.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WebhookEvent {
    /// e.g. "charge.success"
    pub event: String,
    pub data: WebhookPaymentData,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WebhookPaymentData {
    /// The gateway's own transaction identifier
    pub id: String,
    pub reference: String,
    /// Amount the payload claims, in kobo
    pub amount: Kobo,
    #[serde(default)]
    pub status: String,
    /// Paying account's routable number, carried in payment metadata
    pub account_number: String,
}

impl WebhookEvent {
    /// Whether this event type reports a settled charge
    pub fn is_charge_success(&self) -> bool {
        self.event == "charge.success"
    }
}
