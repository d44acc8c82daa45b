use crate::domain::wallet::{EthereumFlags, InjectedProviders};
use crate::transport::http::handlers::{balances, claims, health, payments};
use crate::transport::http::types::{
    ApiResponse, BalancesRequest, ClaimRequest, DeleteClaimsRequest, VerifyPaymentRequest,
};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        balances::fetch_balances_handler,
        claims::upsert_claim_handler,
        claims::list_claims_handler,
        claims::get_claim_handler,
        claims::delete_claims_handler,
        payments::verify_payment_handler,
        payments::list_payments_handler
    ),
    components(schemas(
        ApiResponse,
        BalancesRequest,
        ClaimRequest,
        DeleteClaimsRequest,
        VerifyPaymentRequest,
        InjectedProviders,
        EthereumFlags
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/balances", post(balances::fetch_balances_handler))
        .route(
            "/api/claims",
            post(claims::upsert_claim_handler)
                .get(claims::list_claims_handler)
                .delete(claims::delete_claims_handler),
        )
        .route("/api/claims/:wallet_address", get(claims::get_claim_handler))
        .route("/api/payments/verify", post(payments::verify_payment_handler))
        .route("/api/payments", get(payments::list_payments_handler))
        .with_state(app_state)
}
