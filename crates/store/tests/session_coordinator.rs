//! Integration tests for registration, sign-in, and sign-out.
//!
//! These run against the in-memory account store and a store that fails every
//! write, so no database is required.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use secrecy::SecretString;

use backstock_core::{CustomerId, Email, LoginState};
use backstock_store::db::{AccountStore, InMemoryAccountStore, RepositoryError};
use backstock_store::models::customer::{Customer, CustomerRecord, NewCustomer, Registration};
use backstock_store::services::session::{SessionCoordinator, SessionError};
use backstock_store::services::vault::{CredentialVault, HashingConfig};

// =============================================================================
// Helpers
// =============================================================================

fn vault() -> CredentialVault {
    CredentialVault::new(HashingConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

fn coordinator() -> (SessionCoordinator<InMemoryAccountStore>, InMemoryAccountStore) {
    let store = InMemoryAccountStore::new();
    (SessionCoordinator::new(store.clone(), vault()), store)
}

fn registration(email: &str, password: &str) -> Registration {
    Registration {
        first_name: "Alice".to_owned(),
        last_name: "Liddell".to_owned(),
        email: email.to_owned(),
        password: SecretString::from(password),
    }
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s)
}

async fn stored_flag(store: &InMemoryAccountStore, id: CustomerId) -> bool {
    store
        .find_by_id(id)
        .await
        .unwrap()
        .unwrap()
        .customer
        .logged_in
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_signs_in_and_scrubs_hash() {
    let (sessions, store) = coordinator();

    let alice = sessions
        .register(registration("alice@example.com", "secret123"))
        .await
        .unwrap();

    assert!(alice.logged_in);
    assert_eq!(alice.login_state(), LoginState::SignedIn);
    assert_eq!(alice.email.as_str(), "alice@example.com");

    let json = serde_json::to_string(&alice).unwrap();
    assert!(!json.contains("argon2"));
    assert!(!json.contains("secret123"));
    assert!(!json.contains("hash"));

    let record = store.find_by_id(alice.id).await.unwrap().unwrap();
    assert!(record.password_hash.as_str().starts_with("$argon2id$"));
    assert!(!record.password_hash.as_str().contains("secret123"));
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let (sessions, store) = coordinator();
    sessions
        .register(registration("alice@example.com", "secret123"))
        .await
        .unwrap();

    let err = sessions
        .register(registration("ALICE@example.com", "other-pass"))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Conflict(_)));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_register_rejects_malformed_email() {
    let (sessions, store) = coordinator();

    let err = sessions
        .register(registration("not-an-email", "secret123"))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::InvalidEmail(_)));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_register_accepts_empty_password() {
    let (sessions, _store) = coordinator();
    sessions
        .register(registration("empty@example.com", ""))
        .await
        .unwrap();

    let customer = sessions.sign_in("empty@example.com", secret("")).await.unwrap();
    assert!(customer.logged_in);
}

// =============================================================================
// Sign-in
// =============================================================================

#[tokio::test]
async fn test_sign_in_with_correct_password() {
    let (sessions, store) = coordinator();
    let alice = sessions
        .register(registration("alice@example.com", "secret123"))
        .await
        .unwrap();
    sessions.sign_out(alice.id).await.unwrap();

    let signed_in = sessions
        .sign_in("alice@example.com", secret("secret123"))
        .await
        .unwrap();

    assert_eq!(signed_in.id, alice.id);
    assert!(signed_in.logged_in);
    assert!(stored_flag(&store, alice.id).await);
    assert!(!serde_json::to_string(&signed_in).unwrap().contains("argon2"));
}

#[tokio::test]
async fn test_sign_in_email_is_case_insensitive() {
    let (sessions, _store) = coordinator();
    sessions
        .register(registration("alice@example.com", "secret123"))
        .await
        .unwrap();

    let customer = sessions
        .sign_in("  Alice@Example.com ", secret("secret123"))
        .await
        .unwrap();
    assert_eq!(customer.email, Email::parse("alice@example.com").unwrap());
}

#[tokio::test]
async fn test_wrong_password_leaves_state_unchanged() {
    let (sessions, store) = coordinator();
    let alice = sessions
        .register(registration("alice@example.com", "secret123"))
        .await
        .unwrap();
    sessions.sign_out(alice.id).await.unwrap();

    let err = sessions
        .sign_in("alice@example.com", secret("wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::InvalidCredentials));
    assert!(!stored_flag(&store, alice.id).await);
}

#[tokio::test]
async fn test_unknown_email_matches_wrong_password() {
    let (sessions, _store) = coordinator();
    sessions
        .register(registration("alice@example.com", "secret123"))
        .await
        .unwrap();

    let wrong_password = sessions
        .sign_in("alice@example.com", secret("wrong"))
        .await
        .unwrap_err();
    let unknown_email = sessions
        .sign_in("nobody@example.com", secret("x"))
        .await
        .unwrap_err();
    let malformed_email = sessions
        .sign_in("nobody", secret("x"))
        .await
        .unwrap_err();

    for err in [&wrong_password, &unknown_email, &malformed_email] {
        assert!(matches!(err, SessionError::InvalidCredentials));
        assert_eq!(err.public_message(), wrong_password.public_message());
        assert_eq!(err.to_string(), wrong_password.to_string());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sign_ins_end_signed_in() {
    let (sessions, store) = coordinator();
    let alice = sessions
        .register(registration("alice@example.com", "secret123"))
        .await
        .unwrap();
    sessions.sign_out(alice.id).await.unwrap();

    let sessions = Arc::new(sessions);
    let mut handles = Vec::new();
    for attempt in 0..8 {
        let sessions = Arc::clone(&sessions);
        handles.push(tokio::spawn(async move {
            let password = if attempt % 2 == 0 { "secret123" } else { "wrong" };
            sessions.sign_in("alice@example.com", secret(password)).await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(customer) => {
                assert!(customer.logged_in);
                succeeded += 1;
            }
            Err(err) => assert!(matches!(err, SessionError::InvalidCredentials)),
        }
    }

    assert_eq!(succeeded, 4);
    assert!(stored_flag(&store, alice.id).await);
}

// =============================================================================
// Sign-out
// =============================================================================

#[tokio::test]
async fn test_sign_out_clears_flag_and_is_idempotent() {
    let (sessions, store) = coordinator();
    let alice = sessions
        .register(registration("alice@example.com", "secret123"))
        .await
        .unwrap();

    sessions.sign_out(alice.id).await.unwrap();
    assert!(!stored_flag(&store, alice.id).await);

    sessions.sign_out(alice.id).await.unwrap();
    assert!(!stored_flag(&store, alice.id).await);
}

#[tokio::test]
async fn test_sign_out_unknown_id_succeeds() {
    let (sessions, _store) = coordinator();
    sessions.sign_out(CustomerId::new(404)).await.unwrap();
}

#[tokio::test]
async fn test_customer_lookup() {
    let (sessions, _store) = coordinator();
    let alice = sessions
        .register(registration("alice@example.com", "secret123"))
        .await
        .unwrap();

    let found = sessions.customer(alice.id).await.unwrap();
    assert_eq!(found, alice);

    let missing = sessions.customer(CustomerId::new(404)).await.unwrap_err();
    assert!(matches!(missing, SessionError::NotFound));
}

// =============================================================================
// Storage failures
// =============================================================================

/// Reads succeed from an inner store; every write fails.
struct ReadOnlyStore {
    inner: InMemoryAccountStore,
    writes: AtomicUsize,
}

impl AccountStore for ReadOnlyStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<CustomerRecord>, RepositoryError> {
        self.inner.find_by_email(email).await
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<CustomerRecord>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn create(&self, _customer: NewCustomer) -> Result<CustomerRecord, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn set_logged_in(
        &self,
        _id: CustomerId,
        _logged_in: bool,
    ) -> Result<Option<Customer>, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }
}

async fn read_only_with_alice() -> (SessionCoordinator<ReadOnlyStore>, CustomerId) {
    let (sessions, inner) = coordinator();
    let alice = sessions
        .register(registration("alice@example.com", "secret123"))
        .await
        .unwrap();

    let store = ReadOnlyStore {
        inner,
        writes: AtomicUsize::new(0),
    };
    (SessionCoordinator::new(store, vault()), alice.id)
}

#[tokio::test]
async fn test_register_storage_failure_is_persistence() {
    let (sessions, _) = read_only_with_alice().await;

    let err = sessions
        .register(registration("bob@example.com", "hunter22"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SessionError::Persistence(RepositoryError::Database(_))
    ));
    assert_eq!(sessions.store().writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sign_in_storage_failure_is_persistence_and_not_retried() {
    let (sessions, _) = read_only_with_alice().await;

    let err = sessions
        .sign_in("alice@example.com", secret("secret123"))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Persistence(_)));
    assert_eq!(sessions.store().writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_verification_never_writes() {
    let (sessions, _) = read_only_with_alice().await;

    let err = sessions
        .sign_in("alice@example.com", secret("wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::InvalidCredentials));
    assert_eq!(sessions.store().writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_sign_out_storage_failure_is_persistence() {
    let (sessions, alice) = read_only_with_alice().await;

    let err = sessions.sign_out(alice).await.unwrap_err();
    assert!(matches!(err, SessionError::Persistence(_)));
}
