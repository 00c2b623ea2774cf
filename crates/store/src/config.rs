//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BACKSTOCK_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `BACKSTOCK_DB_MAX_CONNECTIONS` - Pool size ceiling (default: 10)
//! - `BACKSTOCK_DB_MIN_CONNECTIONS` - Idle connections kept open (default: 2)
//! - `BACKSTOCK_DB_ACQUIRE_TIMEOUT_SECS` - Pool acquire timeout (default: 10)
//! - `BACKSTOCK_HASH_MEMORY_KIB` - Argon2 memory cost in KiB (default: 19456)
//! - `BACKSTOCK_HASH_ITERATIONS` - Argon2 time cost (default: 2)
//! - `BACKSTOCK_HASH_PARALLELISM` - Argon2 lanes (default: 1)

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::services::vault::HashingConfig;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL (contains password)
    pub url: SecretString,
    /// Maximum pool size
    pub max_connections: u32,
    /// Minimum idle connections
    pub min_connections: u32,
    /// How long to wait for a pooled connection
    pub acquire_timeout: Duration,
}

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Password hashing work factor
    pub hashing: HashingConfig,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database URL is missing or a numeric
    /// setting does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`StoreConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup("BACKSTOCK_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("BACKSTOCK_DATABASE_URL".to_string()))?;

        let database = DatabaseConfig {
            url,
            max_connections: parse_or_default(&lookup, "BACKSTOCK_DB_MAX_CONNECTIONS", 10)?,
            min_connections: parse_or_default(&lookup, "BACKSTOCK_DB_MIN_CONNECTIONS", 2)?,
            acquire_timeout: Duration::from_secs(parse_or_default(
                &lookup,
                "BACKSTOCK_DB_ACQUIRE_TIMEOUT_SECS",
                10,
            )?),
        };

        if database.min_connections > database.max_connections {
            return Err(ConfigError::InvalidEnvVar(
                "BACKSTOCK_DB_MIN_CONNECTIONS".to_string(),
                format!(
                    "must not exceed BACKSTOCK_DB_MAX_CONNECTIONS ({})",
                    database.max_connections
                ),
            ));
        }

        let defaults = HashingConfig::default();
        let hashing = HashingConfig {
            memory_kib: parse_or_default(&lookup, "BACKSTOCK_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or_default(&lookup, "BACKSTOCK_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or_default(
                &lookup,
                "BACKSTOCK_HASH_PARALLELISM",
                defaults.parallelism,
            )?,
        };
        hashing
            .params()
            .map_err(|e| ConfigError::InvalidEnvVar("BACKSTOCK_HASH_*".to_string(), e.to_string()))?;

        Ok(Self { database, hashing })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, falling back to a default when unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
