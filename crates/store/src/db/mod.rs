//! Record store for customers, products, and orders.
//!
//! # Database
//!
//! ## Tables
//!
//! - `customers` - Accounts: profile, unique email, Argon2id hash, login flag
//! - `products` - Catalog with optional promotional price
//! - `orders` - One row per purchase, referencing a customer and a product
//!
//! # Migrations
//!
//! Migrations are stored in `crates/store/migrations/`, embedded in
//! [`MIGRATOR`], and run via:
//! ```bash
//! cargo run -p backstock-cli -- migrate
//! ```
//!
//! # Account store
//!
//! The session coordinator never touches SQL. It is handed an
//! [`AccountStore`]: [`PgAccountStore`] in production, [`InMemoryAccountStore`]
//! in tests and local runs. Both enforce the unique email constraint and
//! change the login flag in a single atomic step.

pub mod accounts;
pub mod catalog;
pub mod memory;

use std::future::Future;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use backstock_core::{CustomerId, Email};

use crate::config::DatabaseConfig;
use crate::models::customer::{Customer, CustomerRecord, NewCustomer};

pub use accounts::PgAccountStore;
pub use catalog::CatalogRepository;
pub use memory::InMemoryAccountStore;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(config.url.expose_secret())
        .await
}

/// Account persistence consumed by the session coordinator.
///
/// Implementations own durable storage. Email uniqueness is their job;
/// `create` reports a duplicate as [`RepositoryError::Conflict`].
pub trait AccountStore: Send + Sync {
    /// Look up an account by its normalized email.
    fn find_by_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<CustomerRecord>, RepositoryError>> + Send;

    /// Look up an account by ID.
    fn find_by_id(
        &self,
        id: CustomerId,
    ) -> impl Future<Output = Result<Option<CustomerRecord>, RepositoryError>> + Send;

    /// Insert a new account and return the stored row.
    fn create(
        &self,
        customer: NewCustomer,
    ) -> impl Future<Output = Result<CustomerRecord, RepositoryError>> + Send;

    /// Set the login flag in one atomic update.
    ///
    /// Returns the updated account, or `None` when no row has this ID.
    fn set_logged_in(
        &self,
        id: CustomerId,
        logged_in: bool,
    ) -> impl Future<Output = Result<Option<Customer>, RepositoryError>> + Send;
}
