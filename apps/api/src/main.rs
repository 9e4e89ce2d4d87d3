mod auth;
mod config;
mod errors;
mod export;
mod models;
mod preview;
mod resume;
mod routes;
mod state;
mod storage;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::FileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; malformed values stop startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume builder API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the local key-value store
    let store = FileStore::open(&config.data_dir)
        .await
        .with_context(|| format!("Cannot open data directory {}", config.data_dir.display()))?;
    info!("Key-value store at {}", store.root().display());

    info!(
        "Exports go to {} (scale {}x, settle {:?})",
        config.export_dir.display(),
        config.export_raster_scale,
        config.export_settle_delay
    );

    // Build app state
    let state = AppState::new(config.clone(), Arc::new(store));

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
