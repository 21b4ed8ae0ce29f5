mod auth;
mod config;
mod error;
mod middleware;
mod routes;
mod state;
mod ticker;

use std::sync::Arc;
use std::time::Duration;

use gazette_sync::engine::{SyncEngine, SyncEngineOptions};
use gazette_sync::store::file_cache::FileCache;
use gazette_sync::store::rest::{RestRemoteStore, RestStoreConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    let _ = dotenvy::dotenv();

    // Load configuration
    let config = config::PortalConfig::from_env().map_err(|e| {
        anyhow::anyhow!(
            "Failed to load config: {e}. Are REMOTE_URL, REMOTE_API_KEY and ADMIN_PASSWORD_HASH set?"
        )
    })?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    tracing::info!("Starting gazette portal");

    // Wire the stores consumed by the sync engine
    let remote = Arc::new(RestRemoteStore::new(RestStoreConfig {
        table: config.remote_table.clone(),
        document_id: config.document_id.clone(),
        poll_interval: Duration::from_secs(config.poll_interval_secs),
        ..RestStoreConfig::new(config.remote_url.clone(), config.remote_api_key.clone())
    }));
    let cache = Arc::new(FileCache::new(&config.cache_dir));

    // Seed from the cache immediately, then sync in the background
    let engine = SyncEngine::new(remote, cache, SyncEngineOptions::default());
    engine.start();
    tracing::info!("Sync engine started");

    // Build application state
    let state = state::AppState::new(engine, config.clone());

    // Roll widget cards in and out of their time windows
    let widget_tick =
        ticker::spawn_widget_ticker(state.clone(), Duration::from_secs(config.widget_tick_secs));

    // Build router with middleware
    let app = routes::build_router(state)
        .layer(middleware::request_tracing::trace_layer())
        .layer(middleware::cors::cors_layer());

    // Start server
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    widget_tick.abort();
    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received Ctrl+C, shutting down..."); }
        _ = terminate => { tracing::info!("Received SIGTERM, shutting down..."); }
    }
}
