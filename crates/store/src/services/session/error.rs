//! Session error types.

use thiserror::Error;

use backstock_core::EmailError;

use crate::db::RepositoryError;
use crate::services::vault::VaultError;

/// Shown to users for any failure they cannot act on.
const GENERIC_FAILURE: &str = "something went wrong, please try again";

/// Errors that can occur during registration, sign-in, and sign-out.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Registration email is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Wrong password or unknown email. The two are never told apart.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account with the requested identity.
    ///
    /// Never returned from sign-in; it becomes `InvalidCredentials` there.
    #[error("customer not found")]
    NotFound,

    /// An account with this email already exists.
    #[error("customer already exists: {0}")]
    Conflict(String),

    /// Password hashing failed.
    #[error("password hashing error: {0}")]
    Hashing(#[from] VaultError),

    /// Storage failure, passed through unchanged and not retried.
    #[error("persistence error: {0}")]
    Persistence(#[source] RepositoryError),
}

impl From<RepositoryError> for SessionError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Persistence(other),
        }
    }
}

impl SessionError {
    /// Coarse message safe to show to the person at the keyboard.
    ///
    /// Internal distinctions stay in the logs.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidEmail(_) => "please enter a valid email address",
            Self::InvalidCredentials => "invalid email or password",
            Self::NotFound => "account not found",
            Self::Conflict(_) => "an account with this email already exists",
            Self::Hashing(_) | Self::Persistence(_) => GENERIC_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_conflict_maps_to_conflict() {
        let err = SessionError::from(RepositoryError::Conflict("email already exists".to_owned()));
        assert!(matches!(err, SessionError::Conflict(_)));
    }

    #[test]
    fn test_repository_failures_map_to_persistence() {
        let err = SessionError::from(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        assert!(matches!(
            err,
            SessionError::Persistence(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        ));

        let err = SessionError::from(RepositoryError::DataCorruption("bad row".to_owned()));
        assert!(matches!(err, SessionError::Persistence(_)));
    }

    #[test]
    fn test_internal_failures_share_a_public_message() {
        let hashing = SessionError::Hashing(VaultError::Hashing("rng".to_owned()));
        let storage = SessionError::Persistence(RepositoryError::NotFound);
        assert_eq!(hashing.public_message(), storage.public_message());
        assert!(!hashing.public_message().contains("rng"));
    }
}
