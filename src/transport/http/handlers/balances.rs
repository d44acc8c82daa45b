use crate::transport::http::handlers::common::{fail, ok};
use crate::transport::http::types::{json_422, ApiResponse, AppState, BalancesRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/balances",
    request_body = BalancesRequest,
    responses(
        (status = 200, description = "Balances for every known asset (failed sources report zero)", body = ApiResponse),
        (status = 400, description = "Empty wallet address", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    )
)]
pub async fn fetch_balances_handler(
    State(state): State<AppState>,
    body: Result<Json<BalancesRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match body {
        Ok(b) => b,
        Err(e) => return json_422(e, "{ wallet_address: string }").into_response(),
    };

    let address = request.wallet_address.trim();
    if address.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "wallet_address cannot be empty");
    }

    let balances = state.claim_service.aggregator().fetch_balances(address).await;
    ok(
        StatusCode::OK,
        &serde_json::json!({ "wallet_address": address, "balances": balances }),
    )
}
