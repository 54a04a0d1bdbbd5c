//! Database connection pool, migrations and store construction.
//!
//! This module provides utilities for:
//! - Creating a PostgreSQL connection pool
//! - Running database migrations automatically
//! - Building the record store selected by configuration

use std::{sync::Arc, time::Duration};

use sqlx::{Pool, Postgres};

use crate::{
    config::{Config, StoreBackend},
    store::{SharedStore, memory::MemoryStore, postgres::PgStore},
};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// The pool is created once at startup and shared by every request. It
/// replaces connections that the server has dropped, so a stale connection
/// is retried on the next acquire rather than surfaced to the caller.
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the server cannot
/// be reached within the acquire timeout.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations are tracked in the `_sqlx_migrations` table, so each runs once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro reads migrations at compile time from ./migrations directory
    sqlx::migrate!("./migrations").run(pool).await
}

/// Build the record store selected by `STORE_BACKEND`.
///
/// For Postgres this connects, migrates and wraps the pool.
pub async fn open_store(config: &Config) -> anyhow::Result<SharedStore> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres backend"))?;

            let pool = create_pool(
                database_url,
                config.db_max_connections,
                Duration::from_secs(config.db_acquire_timeout_secs),
            )
            .await?;
            tracing::info!(
                max_connections = config.db_max_connections,
                "Database pool created"
            );

            run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
