//! Error types for the OTP relay.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use whatsapp_client::WhatsAppError;

/// Relay error types.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("WhatsApp API error: {0}")]
    Provider(#[from] WhatsAppError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("OTP store error: {0}")]
    Store(String),
}

/// Failure body shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            // Provider bodies are passed through untouched
            RelayError::Provider(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.provider_body().cloned())
            }
            RelayError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, Some(Value::String(msg))),
            e @ RelayError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(Value::String(e.to_string())),
            ),
        };

        let body = ErrorResponse {
            success: false,
            error,
        };

        (status, Json(body)).into_response()
    }
}
