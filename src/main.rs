//! Wallet API - Main Application Entry Point
//!
//! REST backend for a mobile wallet: account onboarding after an identity
//! provider login, MPIN setup/verify/change, and admin views over accounts,
//! transfers and linked bank accounts.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Record Store**: PostgreSQL with sqlx, or an in-memory store
//! - **Format**: JSON requests/responses, `{ "error": ... }` on failure
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Open the record store (pool + migrations for Postgres)
//! 3. Optionally seed sample data
//! 4. Build services and the HTTP router
//! 5. Serve until Ctrl-C / SIGTERM, then close the store

mod app;
mod config;
mod db;
mod error;
mod extract;
mod handlers;
mod middleware;
mod models;
mod seed;
mod services;
mod state;
mod store;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!(backend = ?config.store_backend, "Configuration loaded");

    let store = db::open_store(&config).await?;

    if config.seed_sample_data {
        seed::seed_sample_data(store.as_ref()).await?;
    }

    let addr = format!("0.0.0.0:{}", config.server_port);
    let state = state::AppState::new(store.clone(), config);
    let app = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("Record store closed");

    Ok(())
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
