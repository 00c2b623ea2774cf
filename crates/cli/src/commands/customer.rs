//! Customer account commands.
//!
//! Passwords are read from stdin so they never show up in shell history or
//! the process list.

use backstock_core::CustomerId;
use backstock_store::db::PgAccountStore;
use backstock_store::models::customer::Registration;
use backstock_store::services::session::SessionCoordinator;
use backstock_store::services::vault::CredentialVault;

use super::{CliError, connect, print_json, read_password};

async fn sessions() -> Result<SessionCoordinator<PgAccountStore>, CliError> {
    let (config, pool) = connect().await?;
    let vault = CredentialVault::new(config.hashing)?;
    Ok(SessionCoordinator::new(PgAccountStore::new(pool), vault))
}

/// Register a customer and print the new account.
///
/// # Errors
///
/// Returns an error if the email is invalid or taken, or the store fails.
pub async fn register(email: String, first_name: String, last_name: String) -> Result<(), CliError> {
    let password = read_password()?;
    let sessions = sessions().await?;

    let customer = sessions
        .register(Registration {
            first_name,
            last_name,
            email,
            password,
        })
        .await
        .inspect_err(|e| tracing::debug!(error = %e, "Registration failed"))?;

    print_json(&customer)
}

/// Sign a customer in and print the account.
///
/// # Errors
///
/// Returns an error if the credentials are invalid or the store fails.
pub async fn sign_in(email: &str) -> Result<(), CliError> {
    let password = read_password()?;
    let sessions = sessions().await?;

    let customer = sessions
        .sign_in(email, password)
        .await
        .inspect_err(|e| tracing::debug!(error = %e, "Sign-in failed"))?;

    print_json(&customer)
}

/// Sign a customer out.
///
/// # Errors
///
/// Returns an error if the store fails.
pub async fn sign_out(id: i32) -> Result<(), CliError> {
    let sessions = sessions().await?;
    sessions.sign_out(CustomerId::new(id)).await?;
    tracing::info!(id, "Signed out");
    Ok(())
}

/// Print a customer by ID.
///
/// # Errors
///
/// Returns an error if the customer does not exist or the store fails.
pub async fn show(id: i32) -> Result<(), CliError> {
    let sessions = sessions().await?;
    let customer = sessions.customer(CustomerId::new(id)).await?;
    print_json(&customer)
}
