//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Which record store backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `STORE_BACKEND` (optional): `postgres` or `memory`, defaults to `postgres`
/// - `DATABASE_URL` (required for `postgres`): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `DB_MAX_CONNECTIONS` (optional): pool size, defaults to 10
/// - `DB_ACQUIRE_TIMEOUT_SECS` (optional): pool acquire timeout, defaults to 5
/// - `MPIN_REQUIRE_EXISTING_ACCOUNT` (optional): whether MPIN setup on an
///   unknown identity fails with 404 (`true`, default) or succeeds without
///   storing anything (`false`)
/// - `ADMIN_API_KEY_HASH` (optional): hex SHA-256 of the admin bearer key;
///   when unset the admin routes are open
/// - `SEED_SAMPLE_DATA` (optional): seed empty collections with sample records
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store_backend: StoreBackend,

    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    #[serde(default = "default_true")]
    pub mpin_require_existing_account: bool,

    #[serde(default)]
    pub admin_api_key_hash: Option<String>,

    #[serde(default)]
    pub seed_sample_data: bool,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::default(),
            database_url: None,
            server_port: default_port(),
            db_max_connections: default_max_connections(),
            db_acquire_timeout_secs: default_acquire_timeout_secs(),
            mpin_require_existing_account: true,
            admin_api_key_hash: None,
            seed_sample_data: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into
    /// the expected types.
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are converted automatically: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }

    /// Parse configuration from an explicit list of variables.
    #[cfg(test)]
    pub fn from_iter<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_iter(vars(&[])).unwrap();

        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.db_max_connections, 10);
        assert!(config.mpin_require_existing_account);
        assert!(config.admin_api_key_hash.is_none());
        assert!(!config.seed_sample_data);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_iter(vars(&[
            ("STORE_BACKEND", "memory"),
            ("SERVER_PORT", "8080"),
            ("MPIN_REQUIRE_EXISTING_ACCOUNT", "false"),
            ("SEED_SAMPLE_DATA", "true"),
        ]))
        .unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.server_port, 8080);
        assert!(!config.mpin_require_existing_account);
        assert!(config.seed_sample_data);
    }
}
