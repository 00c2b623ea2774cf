//! Customer account types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;

use backstock_core::{CustomerId, Email, LoginState, StoredHash};

/// A customer account as returned to callers.
///
/// There is no password hash on this type, so nothing serialized from it can
/// carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Sign-in email (unique).
    pub email: Email,
    /// Whether the customer currently has an active session.
    pub logged_in: bool,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// The account's session state.
    #[must_use]
    pub const fn login_state(&self) -> LoginState {
        if self.logged_in {
            LoginState::SignedIn
        } else {
            LoginState::SignedOut
        }
    }
}

/// A stored account row including its password hash.
///
/// Only the record store and the session coordinator see this type.
#[derive(Debug, Clone)]
pub struct CustomerRecord {
    /// The public part of the account.
    pub customer: Customer,
    /// Argon2id PHC string.
    pub password_hash: StoredHash,
}

impl CustomerRecord {
    /// Drop the hash and keep the account.
    #[must_use]
    pub fn into_customer(self) -> Customer {
        self.customer
    }
}

/// An account ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password_hash: StoredHash,
    pub logged_in: bool,
}

/// Registration input.
///
/// The password is moved into the credential vault and zeroized there.
#[derive(Debug)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
}
