//! OpenAPI documentation
//!
//! Auto-generated OpenAPI 3.0 document, served at `/api-docs/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::types::{
    ApiResponse, BalanceData, EntryView, FundRequest, HealthData, ResolvedBankData,
    ResolvedWalletData, TransactionSummary, TransferData, TransferRequest, VerifyBankRequest,
    VerifyPaymentData, VerifyPaymentRequest, WebhookAck,
};
use crate::funding::{FundingInitiated, WebhookEvent};
use crate::rail::Bank;

/// Bearer token authentication security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Opaque bearer token mapped to a wallet account"))
                        .build(),
                ),
            );
        }
    }
}

/// Main API documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kobo Vault Wallet API",
        version = "1.0.0",
        description = "Custodial wallet service: funding via a hosted payment gateway, \
                       peer transfers between wallets, and external bank payouts."
    ),
    paths(
        super::handlers::health::health_check,
        super::handlers::wallet::get_balance,
        super::handlers::wallet::fund,
        super::handlers::wallet::verify_payment,
        super::handlers::wallet::webhook,
        super::handlers::wallet::list_transactions,
        super::handlers::wallet::resolve_wallet,
        super::handlers::transfer::transfer,
        super::handlers::transfer::verify_bank,
        super::handlers::transfer::list_banks,
    ),
    components(schemas(
        ApiResponse<BalanceData>,
        BalanceData,
        FundRequest,
        FundingInitiated,
        VerifyPaymentRequest,
        VerifyPaymentData,
        WebhookEvent,
        WebhookAck,
        TransferRequest,
        TransferData,
        TransactionSummary,
        EntryView,
        VerifyBankRequest,
        ResolvedBankData,
        ResolvedWalletData,
        Bank,
        HealthData,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Wallet", description = "Balance, funding, settlement, history"),
        (name = "Transfer", description = "Peer transfers and external payouts"),
        (name = "System", description = "Health and build info")
    )
)]
pub struct ApiDoc;
