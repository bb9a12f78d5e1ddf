//! Wallet error taxonomy
//!
//! Every mutation-path failure maps onto one of these variants. `code()` and
//! `http_status()` keep API responses consistent across handlers, and
//! `is_retryable()` drives the bounded-retry helper: only indeterminate or
//! transient conditions may be re-attempted, terminal rejections never are.

use thiserror::Error;

use crate::rail::RailError;

/// Wallet domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    // === Lookup Errors ===
    #[error("Wallet not found for account: {0}")]
    WalletNotFound(String),

    #[error("No wallet with account number: {0}")]
    AccountNumberUnknown(String),

    // === Idempotency ===
    /// A ledger entry with this reference already exists. This is the
    /// idempotency guard firing: callers on the funding/webhook paths treat
    /// it as "already processed", not as a failure.
    #[error("Duplicate reference: {0}")]
    DuplicateReference(String),

    /// The reference is bound to a different wallet. Unlike
    /// `DuplicateReference` this is never success-shaped: the caller is
    /// trying to claim or inspect someone else's payment.
    #[error("Reference {0} belongs to another wallet")]
    ForeignReference(String),

    // === Validation Errors ===
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Amount {amount} exceeds per-transaction ceiling {ceiling}")]
    AmountAboveCeiling { amount: u64, ceiling: u64 },

    #[error("Sender and recipient wallet cannot be the same")]
    SelfTransfer,

    #[error("Amount would overflow")]
    Overflow,

    // === Balance Errors ===
    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: u64, required: u64 },

    // === External Rail Errors ===
    #[error("Recipient could not be resolved: {0}")]
    RecipientUnresolved(String),

    #[error("Gateway verification failed: {0}")]
    GatewayVerificationFailed(String),

    /// The rail call did not return a definitive accept/reject. The outcome
    /// is indeterminate: nothing was mutated, and the caller retries later
    /// with the same reference.
    #[error("Gateway call timed out (outcome indeterminate)")]
    GatewayTimeout,

    #[error("Payment rail unavailable: {0}")]
    RailUnavailable(String),

    #[error("Claimed amount {claimed} does not match verified amount {verified}")]
    AmountMismatch { claimed: u64, verified: u64 },

    // === System Errors ===
    #[error("Transient store error: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WalletError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::WalletNotFound(_) => "WALLET_NOT_FOUND",
            WalletError::AccountNumberUnknown(_) => "ACCOUNT_NUMBER_UNKNOWN",
            WalletError::DuplicateReference(_) => "DUPLICATE_REFERENCE",
            WalletError::ForeignReference(_) => "FOREIGN_REFERENCE",
            WalletError::InvalidAmount => "INVALID_AMOUNT",
            WalletError::AmountAboveCeiling { .. } => "AMOUNT_ABOVE_CEILING",
            WalletError::SelfTransfer => "SELF_TRANSFER",
            WalletError::Overflow => "OVERFLOW",
            WalletError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            WalletError::RecipientUnresolved(_) => "RECIPIENT_UNRESOLVED",
            WalletError::GatewayVerificationFailed(_) => "GATEWAY_VERIFICATION_FAILED",
            WalletError::GatewayTimeout => "GATEWAY_TIMEOUT",
            WalletError::RailUnavailable(_) => "RAIL_UNAVAILABLE",
            WalletError::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            WalletError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            WalletError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            WalletError::WalletNotFound(_) | WalletError::AccountNumberUnknown(_) => 404,
            WalletError::InvalidAmount
            | WalletError::AmountAboveCeiling { .. }
            | WalletError::SelfTransfer
            | WalletError::Overflow
            | WalletError::AmountMismatch { .. } => 400,
            WalletError::DuplicateReference(_) => 409,
            WalletError::ForeignReference(_) => 403,
            WalletError::InsufficientFunds { .. } | WalletError::RecipientUnresolved(_) => 422,
            WalletError::GatewayVerificationFailed(_) => 502,
            WalletError::GatewayTimeout
            | WalletError::RailUnavailable(_)
            | WalletError::StoreUnavailable(_) => 503,
            WalletError::Internal(_) => 500,
        }
    }

    /// Whether the caller may safely re-attempt with the SAME reference.
    ///
    /// Terminal rejections (insufficient funds, invalid recipient, mismatch)
    /// are never retried; indeterminate/transient conditions are.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WalletError::GatewayTimeout
                | WalletError::RailUnavailable(_)
                | WalletError::StoreUnavailable(_)
        )
    }
}

impl From<RailError> for WalletError {
    fn from(e: RailError) -> Self {
        match e {
            RailError::Timeout => WalletError::GatewayTimeout,
            RailError::Network(msg) => WalletError::RailUnavailable(msg),
            RailError::Rejected(msg) => WalletError::GatewayVerificationFailed(msg),
            RailError::Unresolved(msg) => WalletError::RecipientUnresolved(msg),
        }
    }
}
