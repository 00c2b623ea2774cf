//! `PostgreSQL` account store.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use backstock_core::{CustomerId, Email, StoredHash};

use super::{AccountStore, RepositoryError};
use crate::models::customer::{Customer, CustomerRecord, NewCustomer};

/// Columns selected for every customer query.
pub(super) const CUSTOMER_COLUMNS: &str =
    "id, first_name, last_name, email, password_hash, logged_in, created_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` customer queries.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct CustomerRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    logged_in: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for CustomerRecord {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        if row.password_hash.is_empty() {
            return Err(RepositoryError::DataCorruption(format!(
                "customer {} has an empty password hash",
                row.id
            )));
        }

        Ok(Self {
            customer: Customer {
                id: CustomerId::new(row.id),
                first_name: row.first_name,
                last_name: row.last_name,
                email,
                logged_in: row.logged_in,
                created_at: row.created_at,
            },
            password_hash: StoredHash::new(row.password_hash),
        })
    }
}

/// Map a unique-index violation to `Conflict`.
fn map_insert_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("email already exists".to_owned());
    }
    RepositoryError::Database(e)
}

// =============================================================================
// Repository
// =============================================================================

/// Account store backed by the `customers` table.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Create a new account store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl AccountStore for PgAccountStore {
    #[instrument(skip(self), fields(email = %email))]
    async fn find_by_email(&self, email: &Email) -> Result<Option<CustomerRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<CustomerRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    #[instrument(skip(self, customer), fields(email = %customer.email))]
    async fn create(&self, customer: NewCustomer) -> Result<CustomerRecord, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r"
            INSERT INTO customers (first_name, last_name, email, password_hash, logged_in)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(customer.password_hash.as_str())
        .bind(customer.logged_in)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        let record = CustomerRecord::try_from(row)?;
        debug!(id = %record.customer.id, "Inserted customer");
        Ok(record)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn set_logged_in(
        &self,
        id: CustomerId,
        logged_in: bool,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r"
            UPDATE customers
            SET logged_in = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(logged_in)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| CustomerRecord::try_from(r).map(CustomerRecord::into_customer))
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(email: &str, hash: &str) -> CustomerRow {
        CustomerRow {
            id: 5,
            first_name: "Alice".to_owned(),
            last_name: "Liddell".to_owned(),
            email: email.to_owned(),
            password_hash: hash.to_owned(),
            logged_in: false,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_row_converts_to_record() {
        let record = CustomerRecord::try_from(row("alice@example.com", "$argon2id$x")).unwrap();
        assert_eq!(record.customer.id, CustomerId::new(5));
        assert_eq!(record.customer.email.as_str(), "alice@example.com");
        assert!(!record.customer.logged_in);
        assert_eq!(record.password_hash.as_str(), "$argon2id$x");
    }

    #[test]
    fn test_row_with_bad_email_is_corruption() {
        let result = CustomerRecord::try_from(row("not-an-email", "$argon2id$x"));
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }

    #[test]
    fn test_row_with_empty_hash_is_corruption() {
        let result = CustomerRecord::try_from(row("alice@example.com", ""));
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }

    #[test]
    fn test_non_database_insert_error_passes_through() {
        let mapped = map_insert_error(sqlx::Error::RowNotFound);
        assert!(matches!(
            mapped,
            RepositoryError::Database(sqlx::Error::RowNotFound)
        ));
    }
}
