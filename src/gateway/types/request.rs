//! API request types
//!
//! Amounts arrive as decimal strings in major units and are converted to
//! kobo exactly once, here at the boundary. Handlers and services only ever
//! see `Kobo`.

use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use super::response::ApiError;
use crate::error::WalletError;
use crate::money::{Kobo, parse_decimal};
use crate::transfer::{ExternalTransferRequest, InternalTransferRequest};
use crate::wallet::AccountId;

fn validate_amount(amount: Decimal) -> Result<Kobo, ApiError> {
    parse_decimal(amount).map_err(|_| WalletError::InvalidAmount.into())
}

fn validate_account_number(s: &str) -> Result<(), ApiError> {
    if s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ApiError::bad_request("account number must be 10 digits"))
    }
}

/// Start a hosted funding payment
#[derive(Debug, Deserialize, ToSchema)]
pub struct FundRequest {
    /// Amount in major units, e.g. "150.25"
    #[schema(value_type = String, example = "150.25")]
    pub amount: Decimal,
    /// Caller's own 10-digit account number
    #[schema(example = "1234567890")]
    pub account_number: String,
}

impl FundRequest {
    pub fn validated(&self) -> Result<Kobo, ApiError> {
        validate_account_number(&self.account_number)?;
        validate_amount(self.amount)
    }
}

/// Verify a funding payment against the gateway and settle it
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPaymentRequest {
    /// Gateway's transaction identifier
    pub transaction_id: String,
    /// Reference generated at initiation
    pub reference: String,
    /// Optional client-asserted amount, checked against the verified one
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
}

impl VerifyPaymentRequest {
    pub fn claimed_kobo(&self) -> Result<Option<Kobo>, ApiError> {
        self.amount.map(validate_amount).transpose()
    }
}

/// Move money out of the caller's wallet.
///
/// `bank_code` present selects an external payout; absent, the recipient
/// account number is resolved against local wallets.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferRequest {
    #[schema(value_type = String, example = "40.00")]
    pub amount: Decimal,
    #[schema(example = "0987654321")]
    pub recipient_account_number: String,
    pub bank_code: Option<String>,
    pub description: Option<String>,
}

/// A transfer request with all boundary validation already applied
pub enum ValidatedTransfer {
    Internal(InternalTransferRequest),
    External(ExternalTransferRequest),
}

impl TransferRequest {
    pub fn validated(self, sender: AccountId) -> Result<ValidatedTransfer, ApiError> {
        validate_account_number(&self.recipient_account_number)?;
        let amount = validate_amount(self.amount)?;
        Ok(match self.bank_code {
            Some(bank_code) => ValidatedTransfer::External(ExternalTransferRequest {
                sender,
                account_number: self.recipient_account_number,
                bank_code,
                amount,
                description: self.description,
            }),
            None => ValidatedTransfer::Internal(InternalTransferRequest {
                sender,
                recipient_account_number: self.recipient_account_number,
                amount,
                description: self.description,
            }),
        })
    }
}

/// Resolve a destination bank account before transferring to it
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyBankRequest {
    #[schema(example = "0987654321")]
    pub account_number: String,
    #[schema(example = "058")]
    pub bank_code: String,
}

/// Pagination for the transaction listing
#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub limit: Option<usize>,
}
