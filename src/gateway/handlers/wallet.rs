//! Wallet handlers: balance, funding, verification, webhook, history

use axum::body::Bytes;
use axum::extract::{Extension, Path, Query, State};
use axum::{Json, http::StatusCode};
use tracing::warn;

use super::super::state::AppState;
use super::super::types::{
    ApiResponse, ApiResult, BalanceData, EntryView, FundRequest, ResolvedWalletData,
    TransactionsQuery, VerifyPaymentData, VerifyPaymentRequest, WebhookAck, ok,
};
use crate::funding::{FundingInitiated, WebhookEvent};
use crate::money::format_kobo;
use crate::reference::Reference;
use crate::wallet::AccountId;

const DEFAULT_HISTORY_LIMIT: usize = 50;

/// GET /wallet/balance
#[utoipa::path(
    get,
    path = "/wallet/balance",
    responses(
        (status = 200, description = "Current balance", body = BalanceData),
        (status = 404, description = "Wallet not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallet"
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
) -> ApiResult<BalanceData> {
    let snapshot = state.store.snapshot(&account)?;
    ok(BalanceData {
        balance: format_kobo(snapshot.balance),
        account_number: snapshot.account_number,
    })
}

/// POST /wallet/fund
///
/// Starts a hosted checkout with the payment gateway. No balance changes
/// here; the credit lands later through verification or the webhook.
#[utoipa::path(
    post,
    path = "/wallet/fund",
    request_body = FundRequest,
    responses(
        (status = 200, description = "Checkout created", body = FundingInitiated),
        (status = 400, description = "Invalid amount or account number"),
        (status = 503, description = "Payment gateway unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallet"
)]
pub async fn fund(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Json(req): Json<FundRequest>,
) -> ApiResult<FundingInitiated> {
    let amount = req.validated()?;
    let initiated = state
        .funding
        .initiate(&account, amount, &req.account_number)
        .await?;
    ok(initiated)
}

/// POST /wallet/verify-payment
///
/// Confirms a funding payment against the gateway's own record and credits
/// the wallet at most once. Safe to call repeatedly with the same inputs.
#[utoipa::path(
    post,
    path = "/wallet/verify-payment",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment settled (or already settled)", body = VerifyPaymentData),
        (status = 400, description = "Claimed amount does not match the verified one"),
        (status = 403, description = "Reference belongs to another wallet"),
        (status = 502, description = "Gateway reports the payment unsettled"),
        (status = 503, description = "Verification timed out, retry later")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallet"
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Json(req): Json<VerifyPaymentRequest>,
) -> ApiResult<VerifyPaymentData> {
    let claimed = req.claimed_kobo()?;
    let reference = Reference::from(req.reference.as_str());
    let settled = state
        .funding
        .reconcile(&account, &req.transaction_id, &reference, claimed)
        .await?;
    ok(VerifyPaymentData {
        balance: format_kobo(settled.balance),
        transaction_id: settled.gateway_txn_id,
        reference: settled.reference,
        already_processed: settled.already_processed,
    })
}

/// POST /wallet/webhook
///
/// Gateway-initiated settlement notifications. Always acknowledged with
/// 200, whatever happens inside: the gateway would otherwise retry
/// forever, and redeliveries are already harmless (the reference guard
/// makes settlement idempotent). Malformed payloads are logged and dropped.
#[utoipa::path(
    post,
    path = "/wallet/webhook",
    request_body = WebhookEvent,
    responses(
        (status = 200, description = "Acknowledged", body = WebhookAck)
    ),
    tag = "Wallet"
)]
pub async fn webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse<WebhookAck>>) {
    match serde_json::from_slice::<WebhookEvent>(&body) {
        Ok(event) => state.funding.handle_webhook(event).await,
        Err(e) => warn!(error = %e, "webhook payload did not parse; dropping"),
    }
    (
        StatusCode::OK,
        Json(ApiResponse::success(WebhookAck { status: "received" })),
    )
}

/// GET /wallet/transactions
#[utoipa::path(
    get,
    path = "/wallet/transactions",
    params(("limit" = Option<usize>, Query, description = "Max entries, newest first")),
    responses(
        (status = 200, description = "Ledger entries, newest first", body = [EntryView]),
        (status = 404, description = "Wallet not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallet"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Query(query): Query<TransactionsQuery>,
) -> ApiResult<Vec<EntryView>> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let entries = state.store.entries(&account, limit)?;
    ok(entries.iter().map(EntryView::from).collect())
}

/// GET /wallet/resolve/{account_number}
///
/// Lets a sender confirm a recipient's wallet exists before transferring.
#[utoipa::path(
    get,
    path = "/wallet/resolve/{account_number}",
    params(("account_number" = String, Path, description = "10-digit wallet account number")),
    responses(
        (status = 200, description = "Wallet found", body = ResolvedWalletData),
        (status = 404, description = "No wallet with this account number")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallet"
)]
pub async fn resolve_wallet(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> ApiResult<ResolvedWalletData> {
    let account_id = state
        .store
        .resolve_account_number(&account_number)
        .ok_or(crate::error::WalletError::AccountNumberUnknown(
            account_number.clone(),
        ))?;
    ok(ResolvedWalletData {
        account_number,
        account_id: account_id.to_string(),
    })
}
