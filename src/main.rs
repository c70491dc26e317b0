//! Warden Server: authentication and role-based authorization service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use warden_api::{AppState, build_app};
use warden_auth::bootstrap;
use warden_cache::UserCache;
use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_store::MemoryDocumentStore;
use warden_store::traits::DocumentStore;

#[tokio::main]
async fn main() {
    let env = std::env::var("WARDEN_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Warden v{}", env!("CARGO_PKG_VERSION"));

    if config.auth.uses_default_secret() {
        tracing::warn!("Token secret is the built-in placeholder; set WARDEN__AUTH__TOKEN_SECRET");
    }

    // ── Step 1: Document store + user cache ──────────────────────
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let cache = Arc::new(UserCache::new(Arc::clone(&store)));

    // ── Step 2: Auth components ──────────────────────────────────
    let bind_address = config.server.bind_address();
    let bootstrap_config = config.bootstrap.clone();
    let state = AppState::new(config, Arc::clone(&store), cache.clone())?;

    // ── Step 3: Seed Administrator role and account ──────────────
    bootstrap::run(&bootstrap_config, store.as_ref(), &state.password_hasher).await?;

    // ── Step 4: Load users and follow the change feed ────────────
    let count = cache.refresh().await?;
    tracing::info!(count, "User cache loaded");
    let _refresh = cache.spawn_refresh();

    // ── Step 5: Serve ────────────────────────────────────────────
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {bind_address}: {e}")))?;
    tracing::info!(address = %bind_address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server failed: {e}")))?;

    tracing::info!("Warden stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
