//! In-memory account store.
//!
//! Used by tests and local runs without a database. Enforces the same
//! unique-email constraint as the `customers` table, and every mutation
//! happens under one write lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use backstock_core::{CustomerId, Email};

use super::{AccountStore, RepositoryError};
use crate::models::customer::{Customer, CustomerRecord, NewCustomer};

#[derive(Debug, Default)]
struct State {
    last_id: i32,
    rows: BTreeMap<CustomerId, CustomerRecord>,
}

/// Account store held in process memory.
///
/// Clones share the same rows, so a test can keep a handle for direct reads
/// after moving a clone into the session coordinator.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryAccountStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    /// Whether the store holds no accounts.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.rows.is_empty()
    }
}

impl AccountStore for InMemoryAccountStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<CustomerRecord>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .find(|r| r.customer.email == *email)
            .cloned())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<CustomerRecord>, RepositoryError> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, customer: NewCustomer) -> Result<CustomerRecord, RepositoryError> {
        let mut state = self.state.write().await;

        if state
            .rows
            .values()
            .any(|r| r.customer.email == customer.email)
        {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        state.last_id += 1;
        let id = CustomerId::new(state.last_id);
        let record = CustomerRecord {
            customer: Customer {
                id,
                first_name: customer.first_name,
                last_name: customer.last_name,
                email: customer.email,
                logged_in: customer.logged_in,
                created_at: Utc::now(),
            },
            password_hash: customer.password_hash,
        };
        state.rows.insert(id, record.clone());

        Ok(record)
    }

    async fn set_logged_in(
        &self,
        id: CustomerId,
        logged_in: bool,
    ) -> Result<Option<Customer>, RepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.rows.get_mut(&id).map(|record| {
            record.customer.logged_in = logged_in;
            record.customer.clone()
        }))
    }
}
