//! Moderation gateway binary
//!
//! Bootstraps telemetry, snapshots the environment configuration, spawns
//! the keep-alive loop when enabled, and serves the router.

use modgate::config::GatewayConfig;
use modgate::routes::AppState;
use modgate::{keepalive, routes};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modgate=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = GatewayConfig::from_env();
    tracing::info!(?config, "starting moderation gateway");

    let state = AppState::from_config(&config)?;

    if keepalive::spawn(&config).is_none() {
        tracing::info!("keep-alive loop disabled; no external URL configured");
    }

    let app = routes::router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
