// =============================================================================
// Indicator Snapshot Service — Main Entry Point
// =============================================================================
//
// Serves the latest RSI / Stochastic RSI / EMA trend / Bollinger Band readings
// for a symbol, computed on demand from Bybit klines.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod bybit;
mod config;
mod error;
mod indicators;
mod market_data;
mod snapshot;
mod types;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::bybit::BybitClient;
use crate::config::ServiceConfig;

const CONFIG_PATH: &str = "service_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = ServiceConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ServiceConfig::default()
    });
    config.apply_env_overrides();

    info!(
        base_url = %config.bybit_base_url,
        category = %config.category,
        default_symbol = %config.default_symbol,
        default_interval = %config.default_interval,
        default_limit = config.default_limit,
        "Indicator snapshot service starting"
    );

    // ── 2. Candle source ─────────────────────────────────────────────────
    let client = BybitClient::new(
        config.bybit_base_url.clone(),
        config.category.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;

    // ── 3. API server ────────────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, Arc::new(client)));
    let app = api::rest::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Indicator snapshot service shut down complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received, stopping gracefully");
}
