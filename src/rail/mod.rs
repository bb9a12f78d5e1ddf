//! Payment-rail gateway seam
//!
//! The core never trusts caller-asserted payment data: funding credits only
//! happen after the rail's authoritative verification endpoint confirms the
//! event, and payout debits only after the rail accepts the payout request.
//! `RailError::Timeout` is an indeterminate outcome, never a failure.

pub mod client;
pub mod mock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Kobo;
use crate::reference::Reference;

pub use client::HttpRail;
pub use mock::MockRail;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RailError {
    #[error("Rail network error: {0}")]
    Network(String),

    /// The call did not return in time. The true outcome is unknown; the
    /// caller must not assume success or failure.
    #[error("Rail call timed out")]
    Timeout,

    #[error("Rail rejected the request: {0}")]
    Rejected(String),

    #[error("Account could not be resolved: {0}")]
    Unresolved(String),
}

/// Result of initiating a hosted payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatedPayment {
    /// URL the client is redirected to for checkout
    pub payment_url: String,
    /// The rail's own transaction identifier
    pub gateway_txn_id: String,
}

/// The rail's authoritative record of a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedPayment {
    pub gateway_txn_id: String,
    pub reference: String,
    /// Amount the rail actually settled, in kobo
    pub amount: Kobo,
    pub succeeded: bool,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Destination of an external payout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankDestination {
    pub account_number: String,
    pub bank_code: String,
    pub account_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutReceipt {
    pub payout_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedAccount {
    pub account_name: String,
    pub bank_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Bank {
    pub name: String,
    pub code: String,
}

/// External payment-rail gateway contract.
///
/// One live HTTP implementation and one scriptable mock ship with the crate;
/// everything else in the core depends only on this trait.
#[async_trait]
pub trait PaymentRail: Send + Sync {
    /// Start a hosted checkout for an inbound funding payment
    async fn initiate_payment(
        &self,
        reference: &Reference,
        amount: Kobo,
        account_email: &str,
    ) -> Result<InitiatedPayment, RailError>;

    /// Fetch the rail's authoritative record by ITS transaction id
    async fn verify_payment(&self, gateway_txn_id: &str) -> Result<VerifiedPayment, RailError>;

    /// Submit an external payout; `Ok` means the rail accepted the request
    async fn submit_payout(
        &self,
        destination: &BankDestination,
        amount: Kobo,
        reference: &Reference,
    ) -> Result<PayoutReceipt, RailError>;

    /// Resolve a bank account number + bank code to the holder's name
    async fn resolve_account(
        &self,
        account_number: &str,
        bank_code: &str,
    ) -> Result<ResolvedAccount, RailError>;

    /// Bank directory for client-side destination pickers
    async fn list_banks(&self) -> Result<Vec<Bank>, RailError>;
}
