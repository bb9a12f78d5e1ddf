pub mod request;
pub mod response;

pub use request::{
    FundRequest, TransactionsQuery, TransferRequest, ValidatedTransfer, VerifyBankRequest,
    VerifyPaymentRequest,
};
pub use response::{
    ApiError, ApiResponse, ApiResult, BalanceData, EntryView, HealthData, ResolvedBankData,
    ResolvedWalletData, TransactionSummary, TransferData, VerifyPaymentData, WebhookAck,
    error_codes, ok,
};
