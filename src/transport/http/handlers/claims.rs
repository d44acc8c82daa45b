use crate::app::ClaimRegistration;
use crate::transport::http::handlers::common::{fail, internal, ok};
use crate::transport::http::types::{json_422, ApiResponse, AppState, ClaimRequest, DeleteClaimsRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/claims",
    request_body = ClaimRequest,
    responses(
        (status = 201, description = "Claim created", body = ApiResponse),
        (status = 200, description = "Existing claim updated", body = ApiResponse),
        (status = 400, description = "Bad request", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn upsert_claim_handler(
    State(state): State<AppState>,
    body: Result<Json<ClaimRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match body {
        Ok(b) => b,
        Err(e) => {
            return json_422(e, "{ wallet_address: string, balances?: object, wallet_type?: string }")
                .into_response()
        }
    };

    let registration = ClaimRegistration {
        wallet_address: request.wallet_address,
        balances: request.balances,
        wallet_type: request.wallet_type,
        providers: request.provider_capabilities,
    };

    match state.claim_service.register(registration).await {
        Ok(outcome) => {
            let status = if outcome.created() {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            ok(status, outcome.claim())
        }
        Err(e) => internal(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/claims",
    responses(
        (status = 200, description = "All claims, oldest first", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_claims_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.claim_service.list().await {
        Ok(claims) => ok(StatusCode::OK, &claims),
        Err(e) => internal(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/claims/{wallet_address}",
    params(("wallet_address" = String, Path, description = "Wallet address the claim is keyed by")),
    responses(
        (status = 200, description = "Claim found", body = ApiResponse),
        (status = 404, description = "Claim not found", body = ApiResponse)
    )
)]
pub async fn get_claim_handler(
    State(state): State<AppState>,
    Path(wallet_address): Path<String>,
) -> impl IntoResponse {
    match state.claim_service.get(&wallet_address).await {
        Ok(Some(claim)) => ok(StatusCode::OK, &claim),
        Ok(None) => fail(StatusCode::NOT_FOUND, "Claim not found"),
        Err(e) => internal(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/claims",
    request_body = DeleteClaimsRequest,
    responses(
        (status = 200, description = "All claims deleted", body = ApiResponse),
        (status = 400, description = "confirm flag missing", body = ApiResponse)
    )
)]
pub async fn delete_claims_handler(
    State(state): State<AppState>,
    body: Result<Json<DeleteClaimsRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match body {
        Ok(b) => b,
        Err(e) => return json_422(e, "{ confirm: true }").into_response(),
    };
    if !request.confirm {
        return fail(StatusCode::BAD_REQUEST, "Refusing to delete claims without confirm=true");
    }

    match state.claim_service.delete_all().await {
        Ok(deleted) => ok(StatusCode::OK, &serde_json::json!({ "deleted": deleted })),
        Err(e) => internal(e),
    }
}
