use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value as JsonValue;

pub fn ok<T: Serialize>(status: StatusCode, data: &T) -> Response {
    match serde_json::to_value(data) {
        Ok(value) => (
            status,
            Json(ApiResponse {
                success: true,
                data: Some(value),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => fail(StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to encode response: {}", e)),
    }
}

pub fn fail(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(error.into()),
        }),
    )
        .into_response()
}

pub fn fail_with(status: StatusCode, error: impl Into<String>, data: JsonValue) -> Response {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: Some(data),
            error: Some(error.into()),
        }),
    )
        .into_response()
}

/// Service errors whose message starts with `Validation error` are the caller's fault.
pub fn internal(e: anyhow::Error) -> Response {
    let msg = e.to_string();
    if msg.starts_with("Validation error") {
        fail(StatusCode::BAD_REQUEST, msg)
    } else {
        tracing::error!(error = %msg, "request failed");
        fail(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }
}
