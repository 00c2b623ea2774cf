//! CLI command implementations.

pub mod catalog;
pub mod customer;
pub mod migrate;

use std::io::BufRead;

use secrecy::SecretString;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use backstock_store::config::{ConfigError, StoreConfig};
use backstock_store::db::{self, RepositoryError};
use backstock_store::services::session::SessionError;
use backstock_store::services::vault::VaultError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Could not connect to the database.
    #[error("database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    /// A migration failed.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Account operation failed. Only the coarse message is shown.
    #[error("{}", .0.public_message())]
    Session(#[from] SessionError),

    /// Catalog lookup failed.
    #[error("lookup failed: {0}")]
    Repository(#[from] RepositoryError),

    /// Credential vault could not be built from the configured costs.
    #[error("hashing setup failed: {0}")]
    Vault(#[from] VaultError),

    /// Reading the password from stdin failed.
    #[error("could not read password: {0}")]
    Input(#[from] std::io::Error),

    /// Writing JSON output failed.
    #[error("could not encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Load configuration and open a connection pool.
async fn connect() -> Result<(StoreConfig, PgPool), CliError> {
    let config = StoreConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database).await?;

    Ok((config, pool))
}

/// Read one line from stdin as a password, without its line terminator.
fn read_password() -> Result<SecretString, CliError> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed_len);

    Ok(SecretString::from(line))
}

/// Write a value to stdout as pretty JSON.
fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }

    Ok(())
}
