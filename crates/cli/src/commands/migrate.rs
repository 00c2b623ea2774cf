//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! backstock migrate
//! ```
//!
//! # Environment Variables
//!
//! - `BACKSTOCK_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Migration files live in `crates/store/migrations/` and are embedded at
//! build time.

use backstock_store::db::MIGRATOR;

use super::{CliError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let (_config, pool) = connect().await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
