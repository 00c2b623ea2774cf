//! Catalog and order lookups.
//!
//! Plain reads with no invariants beyond the foreign keys. Customer rows
//! returned from here go through [`CustomerRecord::into_customer`], so the
//! hash is dropped before anything leaves the repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use backstock_core::{CustomerId, OrderId, Price, ProductId};

use super::RepositoryError;
use super::accounts::{CUSTOMER_COLUMNS, CustomerRow};
use crate::models::customer::{Customer, CustomerRecord};
use crate::models::order::Order;
use crate::models::product::Product;

const PRODUCT_COLUMNS: &str =
    "id, name, description, image, small_image, image_alt, price, promotion";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    image: String,
    small_image: String,
    image_alt: String,
    price: Decimal,
    promotion: Option<Decimal>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            image: row.image,
            small_image: row.small_image,
            image_alt: row.image_alt,
            price: Price::new(row.price),
            promotion: row.promotion.map(Price::new),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_id: i32,
    product_id: i32,
    product_name: String,
    sell_price: Decimal,
    purchase_date: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            sell_price: Price::new(row.sell_price),
            purchase_date: row.purchase_date,
        }
    }
}

/// Read-only repository for products, customers by name, and orders.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List products that carry a promotional price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn promotions(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE promotion IS NOT NULL ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(Product::from)
        .ok_or(RepositoryError::NotFound)
    }

    /// Find customers by first and last name (exact match).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    #[instrument(skip(self))]
    pub async fn customers_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers
             WHERE first_name = $1 AND last_name = $2
             ORDER BY id"
        ))
        .bind(first_name)
        .bind(last_name)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| CustomerRecord::try_from(row).map(CustomerRecord::into_customer))
            .collect()
    }

    /// List a customer's orders, newest first, with the product name joined in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn orders_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT o.id, o.customer_id, o.product_id,
                   p.name AS product_name,
                   o.sell_price, o.purchase_date
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            JOIN products p ON p.id = o.product_id
            WHERE o.customer_id = $1
            ORDER BY o.purchase_date DESC, o.id DESC
            ",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }
}
