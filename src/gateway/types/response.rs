//! API response types and error codes
//!
//! - `ApiResponse<T>`: unified response wrapper
//! - `ApiError`: typed error carrying HTTP status + stable code
//! - `error_codes`: standard error code constants

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::WalletError;
use crate::money::format_kobo;
use crate::wallet::LedgerEntry;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = 0)]
    pub code: i32,
    #[schema(example = "ok")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Handler result alias: success envelope or typed error
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Wrap success data
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

// ============================================================================
// Typed API error
// ============================================================================

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED, msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.code, self.msg))).into_response()
    }
}

impl From<WalletError> for ApiError {
    fn from(e: WalletError) -> Self {
        let status =
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = match &e {
            WalletError::WalletNotFound(_) | WalletError::AccountNumberUnknown(_) => {
                error_codes::WALLET_NOT_FOUND
            }
            WalletError::DuplicateReference(_) => error_codes::DUPLICATE_REFERENCE,
            WalletError::ForeignReference(_) => error_codes::REFERENCE_FORBIDDEN,
            WalletError::InvalidAmount | WalletError::Overflow => error_codes::INVALID_PARAMETER,
            WalletError::AmountAboveCeiling { .. } => error_codes::AMOUNT_ABOVE_CEILING,
            WalletError::SelfTransfer => error_codes::SELF_TRANSFER,
            WalletError::InsufficientFunds { .. } => error_codes::INSUFFICIENT_FUNDS,
            WalletError::RecipientUnresolved(_) => error_codes::RECIPIENT_UNRESOLVED,
            WalletError::GatewayVerificationFailed(_) => error_codes::GATEWAY_VERIFY_FAILED,
            WalletError::GatewayTimeout => error_codes::GATEWAY_TIMEOUT,
            WalletError::AmountMismatch { .. } => error_codes::AMOUNT_MISMATCH,
            WalletError::RailUnavailable(_) | WalletError::StoreUnavailable(_) => {
                error_codes::SERVICE_UNAVAILABLE
            }
            WalletError::Internal(_) => error_codes::INTERNAL_ERROR,
        };
        ApiError::new(status, code, e.to_string())
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Wallet balance response
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceData {
    /// Balance in major units, e.g. "150.25"
    #[schema(example = "150.25")]
    pub balance: String,
    #[schema(example = "1234567890")]
    pub account_number: String,
}

/// Payment verification response
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyPaymentData {
    pub balance: String,
    pub transaction_id: String,
    pub reference: String,
    pub already_processed: bool,
}

/// Webhook acknowledgment (always returned, even on internal failure)
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    #[schema(example = "received")]
    pub status: &'static str,
}

/// One side of a completed transfer, presentation form
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionSummary {
    pub reference: String,
    pub direction: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
    pub status: String,
}

/// Transfer response: sender/recipient summaries plus the new balance
#[derive(Debug, Serialize, ToSchema)]
pub struct TransferData {
    pub transfer_id: String,
    pub state: String,
    pub new_balance: String,
    pub sender: TransactionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<TransactionSummary>,
}

/// Ledger entry, presentation form (amounts in major units)
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryView {
    pub reference: String,
    pub direction: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    pub status: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
    pub balance_after: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&LedgerEntry> for EntryView {
    fn from(e: &LedgerEntry) -> Self {
        Self {
            reference: e.reference.to_string(),
            direction: direction_str(e).to_string(),
            amount: format_kobo(e.amount),
            fee: e.fee.map(format_kobo),
            status: format!("{:?}", e.status).to_lowercase(),
            source: e.source.as_str().to_string(),
            description: e.description.clone(),
            counterparty: e.counterparty.clone(),
            balance_after: format_kobo(e.balance_after),
            created_at: e.created_at,
        }
    }
}

impl TransactionSummary {
    pub fn from_entry(e: &LedgerEntry) -> Self {
        Self {
            reference: e.reference.to_string(),
            direction: direction_str(e).to_string(),
            amount: format_kobo(e.amount),
            fee: e.fee.map(format_kobo),
            counterparty: e.counterparty.clone(),
            status: format!("{:?}", e.status).to_lowercase(),
        }
    }
}

fn direction_str(e: &LedgerEntry) -> &'static str {
    match e.direction {
        crate::wallet::EntryDirection::Credit => "credit",
        crate::wallet::EntryDirection::Debit => "debit",
    }
}

/// Account-number resolution response
#[derive(Debug, Serialize, ToSchema)]
pub struct ResolvedWalletData {
    pub account_number: String,
    pub account_id: String,
}

/// Destination bank account resolution response
#[derive(Debug, Serialize, ToSchema)]
pub struct ResolvedBankData {
    pub account_name: String,
    pub bank_name: String,
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthData {
    pub service: &'static str,
    pub version: &'static str,
    pub git_hash: &'static str,
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_FUNDS: i32 = 1002;
    pub const SELF_TRANSFER: i32 = 1003;
    pub const AMOUNT_MISMATCH: i32 = 1004;
    pub const AMOUNT_ABOVE_CEILING: i32 = 1005;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;

    // Resource errors (4xxx)
    pub const WALLET_NOT_FOUND: i32 = 4001;
    pub const RECIPIENT_UNRESOLVED: i32 = 4002;
    pub const DUPLICATE_REFERENCE: i32 = 4091;
    pub const REFERENCE_FORBIDDEN: i32 = 4031;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
    pub const GATEWAY_VERIFY_FAILED: i32 = 5021;
    pub const GATEWAY_TIMEOUT: i32 = 5040;
}
