//! Transfer handlers: peer transfers, external payouts, bank lookups

use axum::extract::{Extension, State};
use axum::Json;

use super::super::state::AppState;
use super::super::types::{
    ApiResult, ResolvedBankData, TransactionSummary, TransferData, TransferRequest,
    ValidatedTransfer, VerifyBankRequest, ok,
};
use crate::money::format_kobo;
use crate::rail::Bank;
use crate::transfer::TransferOutcome;
use crate::wallet::AccountId;

/// POST /wallet/transfer
///
/// One endpoint for both movement kinds: a bank code in the request selects
/// an external payout over the rail, otherwise the recipient account number
/// must belong to a wallet in this system.
#[utoipa::path(
    post,
    path = "/wallet/transfer",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer completed", body = TransferData),
        (status = 400, description = "Invalid amount or self-transfer"),
        (status = 422, description = "Insufficient funds or unresolvable recipient"),
        (status = 503, description = "Payout outcome indeterminate, retry later")
    ),
    security(("bearer_auth" = [])),
    tag = "Transfer"
)]
pub async fn transfer(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Json(req): Json<TransferRequest>,
) -> ApiResult<TransferData> {
    let outcome = match req.validated(account)? {
        ValidatedTransfer::Internal(internal) => state.transfers.internal(internal)?,
        ValidatedTransfer::External(external) => state.transfers.external(external).await?,
    };
    ok(transfer_data(outcome))
}

fn transfer_data(outcome: TransferOutcome) -> TransferData {
    TransferData {
        transfer_id: outcome.transfer_id.clone(),
        state: outcome.state.as_str().to_string(),
        new_balance: format_kobo(outcome.new_balance),
        sender: TransactionSummary::from_entry(&outcome.debit_entry),
        recipient: outcome
            .credit_entry
            .as_ref()
            .map(TransactionSummary::from_entry),
    }
}

/// POST /wallet/verify-bank
///
/// Resolves an external destination to its holder's name so the client can
/// show it before the user commits to a payout.
#[utoipa::path(
    post,
    path = "/wallet/verify-bank",
    request_body = VerifyBankRequest,
    responses(
        (status = 200, description = "Destination resolved", body = ResolvedBankData),
        (status = 422, description = "Account/bank combination does not resolve"),
        (status = 503, description = "Payment gateway unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Transfer"
)]
pub async fn verify_bank(
    State(state): State<AppState>,
    Json(req): Json<VerifyBankRequest>,
) -> ApiResult<ResolvedBankData> {
    let resolved = state
        .rail
        .resolve_account(&req.account_number, &req.bank_code)
        .await
        .map_err(crate::error::WalletError::from)?;
    ok(ResolvedBankData {
        account_name: resolved.account_name,
        bank_name: resolved.bank_name,
    })
}

/// GET /wallet/banks
#[utoipa::path(
    get,
    path = "/wallet/banks",
    responses(
        (status = 200, description = "Supported destination banks", body = [Bank]),
        (status = 503, description = "Payment gateway unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Transfer"
)]
pub async fn list_banks(State(state): State<AppState>) -> ApiResult<Vec<Bank>> {
    let banks = state
        .rail
        .list_banks()
        .await
        .map_err(crate::error::WalletError::from)?;
    ok(banks)
}
