//! Health check handler

use axum::Json;

use super::super::types::{ApiResponse, HealthData};

/// Health check endpoint
///
/// Liveness only: reports the running build. The wallet store is
/// in-process, so a responding gateway implies a working core.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthData, content_type = "application/json")
    ),
    tag = "System"
)]
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    Json(ApiResponse::success(HealthData {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        git_hash: env!("GIT_HASH"),
    }))
}
