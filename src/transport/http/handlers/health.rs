use crate::transport::http::handlers::common::{fail_with, ok};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (store reachable)", body = ApiResponse),
        (status = 503, description = "Service is unhealthy (store unreachable)", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.claim_service.ping().await {
        Ok(()) => ok(StatusCode::OK, &serde_json::json!({ "status": "ok" })),
        Err(e) => fail_with(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("DB ping failed: {}", e),
            serde_json::json!({ "status": "unhealthy" }),
        ),
    }
}
