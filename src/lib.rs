//! Stock Radar BR - B3 penny stock dashboard backend
//!
//! Ingests the stock feed (live JSON snapshot or the embedded CSV fallback),
//! derives the dashboard views, and runs the external update script on
//! demand and on a trading-hours schedule.

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod refresh;
pub mod scheduler;
pub mod state;
pub mod store;

use api::ApiServer;
use config::ServerConfig;
use scheduler::AutoUpdateScheduler;
use state::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stock_radar=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the server until Ctrl-C
pub async fn run() -> anyhow::Result<()> {
    // Config first so RUST_LOG from .env reaches the subscriber
    let config = ServerConfig::from_env()?;
    init_tracing();
    tracing::info!("Starting Stock Radar...");

    let state = Arc::new(AppState::new(config)?);

    if let Some(interval) = state.config.auto_update_interval {
        AutoUpdateScheduler::new(state.refresh.clone(), interval).start();
    } else {
        tracing::info!("Auto-update scheduler disabled");
    }

    let mut server = ApiServer::new(state);
    let mut handle = server.start().await?;

    let interrupted = tokio::select! {
        _ = tokio::signal::ctrl_c() => true,
        _ = &mut handle => false,
    };

    if interrupted {
        tracing::info!("Shutdown requested");
        server.stop();
        let _ = handle.await;
    } else {
        tracing::warn!("API server exited");
    }

    Ok(())
}
