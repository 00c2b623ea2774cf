//! Backstock Store - storefront data-access library.
//!
//! Customers, products, and orders live in `PostgreSQL`. On top of the record
//! store this crate provides the credential and session subsystem:
//!
//! - [`services::vault::CredentialVault`] - Argon2id hashing and constant-time
//!   verification of customer passwords
//! - [`services::session::SessionCoordinator`] - registration, sign-in, and
//!   sign-out against an injected [`db::AccountStore`]
//!
//! # Example
//!
//! ```rust,no_run
//! use backstock_store::db::InMemoryAccountStore;
//! use backstock_store::models::customer::Registration;
//! use backstock_store::services::session::SessionCoordinator;
//! use backstock_store::services::vault::{CredentialVault, HashingConfig};
//! use secrecy::SecretString;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let vault = CredentialVault::new(HashingConfig::default())?;
//! let sessions = SessionCoordinator::new(InMemoryAccountStore::new(), vault);
//!
//! let alice = sessions
//!     .register(Registration {
//!         first_name: "Alice".to_owned(),
//!         last_name: "Liddell".to_owned(),
//!         email: "alice@example.com".to_owned(),
//!         password: SecretString::from("secret123"),
//!     })
//!     .await?;
//!
//! sessions.sign_out(alice.id).await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
pub mod services;
