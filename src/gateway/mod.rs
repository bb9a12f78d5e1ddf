//! HTTP gateway
//!
//! Thin axum layer over the wallet core: handlers validate at the boundary,
//! call into the services, and wrap results in the `ApiResponse` envelope.
//! Bearer-token auth resolves the caller to an `AccountId` before any
//! wallet-scoped handler runs.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{Next, from_fn_with_state},
    response::Response,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing::info;
use utoipa::OpenApi;

pub use state::AppState;
use types::{ApiError, error_codes};

/// Axum middleware resolving the bearer token to a wallet account.
///
/// The resolved `AccountId` is injected as a request extension; handlers
/// never see the raw token.
async fn wallet_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            ApiError::new(
                axum::http::StatusCode::UNAUTHORIZED,
                error_codes::MISSING_AUTH,
                "Missing bearer token",
            )
        })?;

    let account = state
        .identity
        .resolve(token)
        .await
        .ok_or_else(|| ApiError::unauthorized("Unrecognized bearer token"))?;

    request.extensions_mut().insert(account);
    Ok(next.run(request).await)
}

/// Build the full application router.
///
/// Split out of `run_server` so tests can drive it with `tower::Service`
/// calls instead of a live listener.
pub fn app_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/wallet/balance", get(handlers::get_balance))
        .route("/wallet/fund", post(handlers::fund))
        .route("/wallet/verify-payment", post(handlers::verify_payment))
        .route("/wallet/transfer", post(handlers::transfer))
        .route("/wallet/verify-bank", post(handlers::verify_bank))
        .route("/wallet/banks", get(handlers::list_banks))
        .route("/wallet/transactions", get(handlers::list_transactions))
        .route(
            "/wallet/resolve/{account_number}",
            get(handlers::resolve_wallet),
        )
        .route_layer(from_fn_with_state(state.clone(), wallet_auth_middleware));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/wallet/webhook", post(handlers::webhook))
        .route(
            "/api-docs/openapi.json",
            get(|| async { axum::Json(openapi::ApiDoc::openapi()) }),
        )
        .merge(protected)
        .with_state(state)
}

/// Start the HTTP gateway and serve until the process exits
pub async fn run_server(host: &str, port: u16, state: AppState) -> std::io::Result<()> {
    let app = app_router(state);
    let listener = TcpListener::bind((host, port)).await?;
    info!(%host, port, "gateway listening");
    axum::serve(listener, app).await
}
