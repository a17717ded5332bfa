//! HTTP request handlers.

use super::types::{
    HealthResponse, PassThroughResponse, RegisterRequest, SendOtpRequest, SendOtpResponse,
    VerifyOtpRequest, VerifyOtpResponse, WebhookVerifyQuery,
};
use super::AppState;
use crate::error::RelayError;
use crate::otp::{self, generate_code};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{error, info, warn};
use whatsapp_client::TemplateMessage;

/// Mode the provider sends when subscribing a webhook.
const SUBSCRIBE_MODE: &str = "subscribe";

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Issue a code for a phone number and deliver it as a template message.
///
/// The code is stored before the provider call and stays stored if the
/// call fails.
pub async fn send_otp(
    State(state): State<AppState>,
    Json(request): Json<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>, RelayError> {
    let phone = request.phone;
    if phone.trim().is_empty() {
        return Err(RelayError::InvalidRequest("phone is required".into()));
    }

    let code = generate_code();
    state.otp_store.put(&phone, &code, state.otp.ttl).await?;

    let message = TemplateMessage::otp(&phone, code)
        .with_template(&state.otp.template_name, &state.otp.language)
        .with_button_param(state.otp.button_param.resolve(&phone));

    match state.whatsapp.send_template(&message).await {
        Ok(id) => {
            info!(phone = %phone, id = ?id, "OTP sent");
            Ok(Json(SendOtpResponse { success: true, id }))
        }
        Err(e) => {
            error!(phone = %phone, error = %e, "Failed to send OTP");
            Err(e.into())
        }
    }
}

/// Check a submitted code.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, RelayError> {
    let outcome =
        otp::verify(state.otp_store.as_ref(), &request.phone, request.code()).await?;

    if outcome.is_valid() {
        info!(phone = %request.phone, "OTP verified");
    } else {
        info!(phone = %request.phone, outcome = ?outcome, "OTP rejected");
    }

    Ok(Json(outcome.into()))
}

/// Register the sender phone number with the provider.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<PassThroughResponse>, RelayError> {
    let data = state
        .whatsapp
        .register(&request.pin, request.data_localization_region.as_deref())
        .await
        .inspect_err(|e| error!(error = %e, "Sender registration failed"))?;

    info!("Sender phone number registered");
    Ok(Json(PassThroughResponse {
        success: true,
        data,
    }))
}

/// Deregister the sender phone number.
pub async fn deregister(
    State(state): State<AppState>,
) -> Result<Json<PassThroughResponse>, RelayError> {
    let data = state
        .whatsapp
        .deregister()
        .await
        .inspect_err(|e| error!(error = %e, "Sender deregistration failed"))?;

    info!("Sender phone number deregistered");
    Ok(Json(PassThroughResponse {
        success: true,
        data,
    }))
}

/// Answer the provider's webhook subscribe handshake.
pub async fn verify_webhook(
    State(state): State<AppState>,
    Query(query): Query<WebhookVerifyQuery>,
) -> Response {
    let subscribing = query.mode.as_deref() == Some(SUBSCRIBE_MODE);
    let token_matches =
        query.verify_token.as_deref() == Some(state.verify_token.expose_secret().as_str());

    if subscribing && token_matches {
        info!("Webhook subscription verified");
        return (StatusCode::OK, query.challenge.unwrap_or_default()).into_response();
    }

    warn!(mode = ?query.mode, "Webhook verification rejected");
    StatusCode::FORBIDDEN.into_response()
}

/// Log an inbound webhook event and acknowledge it.
pub async fn receive_webhook(body: Bytes) -> StatusCode {
    match serde_json::from_slice::<Value>(&body) {
        Ok(event) => {
            let pretty = serde_json::to_string_pretty(&event).unwrap_or_else(|_| event.to_string());
            info!("Webhook event received: {}", pretty);
        }
        Err(_) => {
            info!("Webhook event received (not JSON): {}", String::from_utf8_lossy(&body));
        }
    }

    StatusCode::OK
}
