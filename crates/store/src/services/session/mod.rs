//! Session coordinator.
//!
//! Each account is either signed out (initial) or signed in. Registration and
//! a successful sign-in set the stored login flag; sign-out clears it. The
//! flag is only ever written through [`AccountStore::set_logged_in`], a single
//! atomic update, so concurrent sign-ins for one account cannot leave it in a
//! mixed state.
//!
//! Sign-in failures are uniform: an unknown email, a malformed
//! email, and a wrong password all return [`SessionError::InvalidCredentials`]
//! after the same amount of Argon2 work.

mod error;

pub use error::SessionError;

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, info, instrument, warn};

use backstock_core::{CustomerId, Email, StoredHash};

use crate::db::AccountStore;
use crate::models::customer::{Customer, CustomerRecord, NewCustomer, Registration};
use crate::services::vault::{CredentialVault, VaultError};

/// Registration, sign-in, and sign-out over an injected account store.
pub struct SessionCoordinator<S> {
    store: S,
    vault: Arc<CredentialVault>,
}

impl<S: AccountStore> SessionCoordinator<S> {
    /// Create a coordinator over `store`, hashing with `vault`.
    #[must_use]
    pub fn new(store: S, vault: CredentialVault) -> Self {
        Self {
            store,
            vault: Arc::new(vault),
        }
    }

    /// The account store this coordinator writes to.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Register a new account.
    ///
    /// The password is consumed by the vault. The account starts signed in.
    /// Email uniqueness is left to the store.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEmail` if the email is malformed.
    /// Returns `SessionError::Conflict` if the email is already registered.
    /// Returns `SessionError::Hashing` if the password cannot be hashed.
    /// Returns `SessionError::Persistence` if the store write fails.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration) -> Result<Customer, SessionError> {
        let Registration {
            first_name,
            last_name,
            email,
            password,
        } = registration;

        let email = Email::parse(&email)?;
        let password_hash = self.hash(password).await?;

        let record = self
            .store
            .create(NewCustomer {
                first_name,
                last_name,
                email,
                password_hash,
                logged_in: true,
            })
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to persist new customer"))?;

        info!(id = %record.customer.id, "Registered customer");
        Ok(record.into_customer())
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidCredentials` for an unknown email or a
    /// wrong password; stored state is unchanged in both cases.
    /// Returns `SessionError::Hashing` if verification could not run.
    /// Returns `SessionError::Persistence` if the store fails.
    #[instrument(skip(self, password))]
    pub async fn sign_in(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<Customer, SessionError> {
        let customer = self.authenticate(email, password).await.map_err(|e| match e {
            SessionError::NotFound => {
                debug!(reason = "unknown_email", "Sign-in rejected");
                SessionError::InvalidCredentials
            }
            other => other,
        })?;

        info!(id = %customer.id, "Customer signed in");
        Ok(customer)
    }

    /// Verify the credentials and flip the login flag.
    ///
    /// Reports a missing account as `NotFound`; [`Self::sign_in`] masks it.
    async fn authenticate(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<Customer, SessionError> {
        let record = match Email::parse(email) {
            Ok(email) => self.store.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(CustomerRecord {
            customer,
            password_hash,
        }) = record
        else {
            self.verify_decoy(password).await?;
            return Err(SessionError::NotFound);
        };

        if self.vault.needs_rehash(&password_hash) {
            debug!(id = %customer.id, "Stored hash uses outdated parameters");
        }

        if !self.verify(password_hash, password).await? {
            debug!(id = %customer.id, reason = "wrong_password", "Sign-in rejected");
            return Err(SessionError::InvalidCredentials);
        }

        // The row can vanish between lookup and update.
        self.store
            .set_logged_in(customer.id, true)
            .await?
            .ok_or(SessionError::NotFound)
    }

    /// Sign out. Idempotent; an unknown ID is not an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Persistence` if the store write fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn sign_out(&self, id: CustomerId) -> Result<(), SessionError> {
        match self.store.set_logged_in(id, false).await? {
            Some(_) => info!("Customer signed out"),
            None => debug!("Sign-out for unknown customer ignored"),
        }
        Ok(())
    }

    /// Get an account by ID, without its hash.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` if no account has this ID.
    /// Returns `SessionError::Persistence` if the store read fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn customer(&self, id: CustomerId) -> Result<Customer, SessionError> {
        self.store
            .find_by_id(id)
            .await?
            .map(CustomerRecord::into_customer)
            .ok_or(SessionError::NotFound)
    }

    // =========================================================================
    // Blocking pool helpers
    // =========================================================================

    async fn hash(&self, password: SecretString) -> Result<StoredHash, SessionError> {
        let vault = Arc::clone(&self.vault);
        let hash = tokio::task::spawn_blocking(move || vault.hash(password))
            .await
            .map_err(|e| VaultError::Hashing(format!("hashing task failed: {e}")))??;
        Ok(hash)
    }

    async fn verify(
        &self,
        password_hash: StoredHash,
        password: SecretString,
    ) -> Result<bool, SessionError> {
        let vault = Arc::clone(&self.vault);
        let matched = tokio::task::spawn_blocking(move || vault.verify(&password_hash, password))
            .await
            .map_err(|e| VaultError::Hashing(format!("verification task failed: {e}")))?;
        Ok(matched)
    }

    async fn verify_decoy(&self, password: SecretString) -> Result<(), SessionError> {
        let vault = Arc::clone(&self.vault);
        tokio::task::spawn_blocking(move || vault.verify_decoy(password))
            .await
            .map_err(|e| VaultError::Hashing(format!("verification task failed: {e}")))?;
        Ok(())
    }
}
