//! OTP Relay - Entry point.

use anyhow::{Context, Result};
use otp_relay::{
    api::{create_router, AppState},
    config::Config,
    MemoryOtpStore,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use whatsapp_client::WhatsAppClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.log.level);

    info!("Starting OTP Relay");

    let whatsapp = WhatsAppClient::new(
        &config.whatsapp.api_base,
        &config.whatsapp.api_version,
        &config.whatsapp.phone_number_id,
        config.whatsapp.access_token.clone(),
    )
    .context("Failed to create WhatsApp client")?;

    info!("Cloud API endpoint: {}", whatsapp.base_url());

    // Codes live only as long as the process
    let store = Arc::new(MemoryOtpStore::new());
    info!(
        "In-memory OTP store ready (ttl={:?}, template={})",
        config.otp.ttl, config.otp.template_name
    );

    let state = AppState::new(
        store,
        whatsapp,
        config.otp.clone(),
        config.webhook.verify_token.clone(),
    );
    let app = create_router(state);

    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down...");
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
