use crate::app::{ClaimService, PaymentService};
use crate::domain::wallet::InjectedProviders;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub claim_service: Arc<ClaimService>,
    pub payment_service: Arc<PaymentService>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct BalancesRequest {
    pub wallet_address: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ClaimRequest {
    pub wallet_address: String,
    /// Pre-fetched balances (`symbol -> decimal string`). When omitted the server runs the
    /// aggregator itself. Unknown symbols are stored as-is.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub balances: Option<BTreeMap<String, String>>,
    /// Wallet software name. When omitted it is derived from `provider_capabilities`.
    #[serde(default)]
    pub wallet_type: Option<String>,
    #[serde(default)]
    pub provider_capabilities: Option<InjectedProviders>,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct DeleteClaimsRequest {
    /// Safety switch to prevent accidental wipes.
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct VerifyPaymentRequest {
    pub transaction_hash: String,
    /// Payment tier, also accepted as `wallet_type`.
    #[serde(alias = "wallet_type")]
    pub tier: String,
    pub email: String,
    /// Address the payment must have been sent from.
    pub sender_address: String,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(format!("Invalid JSON body: {} (expected: {})", err, expected)),
        }),
    )
}
