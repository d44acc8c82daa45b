use crate::app::{PaymentSubmission, VerifyError};
use crate::domain::payment::Rejection;
use crate::transport::http::handlers::common::{fail, fail_with, internal, ok};
use crate::transport::http::types::{json_422, ApiResponse, AppState, VerifyPaymentRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/payments/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment verified", body = ApiResponse),
        (status = 400, description = "Payment rejected (`data.reason` says why)", body = ApiResponse),
        (status = 409, description = "Transaction hash already used", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse),
        (status = 502, description = "Indexer unavailable", body = ApiResponse)
    )
)]
pub async fn verify_payment_handler(
    State(state): State<AppState>,
    body: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match body {
        Ok(b) => b,
        Err(e) => {
            return json_422(
                e,
                "{ transaction_hash: string, tier: string, email: string, sender_address: string }",
            )
            .into_response()
        }
    };

    let missing: Vec<&str> = [
        ("transaction_hash", &request.transaction_hash),
        ("tier", &request.tier),
        ("email", &request.email),
        ("sender_address", &request.sender_address),
    ]
    .iter()
    .filter(|(_, v)| v.trim().is_empty())
    .map(|(k, _)| *k)
    .collect();
    if !missing.is_empty() {
        return fail(
            StatusCode::BAD_REQUEST,
            format!("Missing required fields: {}", missing.join(", ")),
        );
    }

    let submission = PaymentSubmission {
        transaction_hash: request.transaction_hash,
        tier: request.tier,
        email: request.email,
        sender_address: request.sender_address,
    };

    match state.payment_service.verify(submission).await {
        Ok(record) => ok(StatusCode::OK, &record),
        Err(VerifyError::Rejected(rejection)) => {
            let status = if rejection == Rejection::AlreadyUsed {
                StatusCode::CONFLICT
            } else {
                StatusCode::BAD_REQUEST
            };
            fail_with(
                status,
                rejection.to_string(),
                serde_json::json!({ "reason": rejection.reason() }),
            )
        }
        Err(VerifyError::Internal(e)) => {
            tracing::error!(error = %e, "payment verification failed");
            fail(StatusCode::BAD_GATEWAY, format!("Failed to verify payment: {}", e))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/payments",
    responses(
        (status = 200, description = "All verification records, oldest first", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_payments_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.payment_service.list().await {
        Ok(records) => ok(StatusCode::OK, &records),
        Err(e) => internal(e),
    }
}
