//! HTTP API for the OTP relay.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::logging_middleware;
pub use types::*;

use crate::config::OtpConfig;
use crate::otp::OtpStore;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use secrecy::SecretString;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use whatsapp_client::WhatsAppClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Issued codes keyed by phone number
    pub otp_store: Arc<dyn OtpStore>,
    /// Cloud API client
    pub whatsapp: Arc<WhatsAppClient>,
    /// Code lifetime and template settings
    pub otp: OtpConfig,
    /// Webhook handshake secret
    pub verify_token: SecretString,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        otp_store: Arc<dyn OtpStore>,
        whatsapp: WhatsAppClient,
        otp: OtpConfig,
        verify_token: SecretString,
    ) -> Self {
        Self {
            otp_store,
            whatsapp: Arc::new(whatsapp),
            otp,
            verify_token,
        }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // OTP lifecycle
        .route("/send-otp", post(handlers::send_otp))
        .route("/verify-otp", post(handlers::verify_otp))
        // Sender number management, passed straight through
        .route("/register", post(handlers::register))
        .route("/deregister", post(handlers::deregister))
        // Provider callbacks
        .route(
            "/webhook",
            get(handlers::verify_webhook).post(handlers::receive_webhook),
        )
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
