//! Catalog and order lookup commands.

use backstock_core::{CustomerId, ProductId};
use backstock_store::db::CatalogRepository;

use super::{CliError, connect, print_json};

/// Print all products, or only those on promotion.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the query fails.
pub async fn products(promotions_only: bool) -> Result<(), CliError> {
    let (_config, pool) = connect().await?;
    let catalog = CatalogRepository::new(&pool);

    let products = if promotions_only {
        catalog.promotions().await?
    } else {
        catalog.products().await?
    };

    tracing::info!(count = products.len(), "Loaded products");
    print_json(&products)
}

/// Print one product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the query fails.
pub async fn product(id: i32) -> Result<(), CliError> {
    let (_config, pool) = connect().await?;
    let product = CatalogRepository::new(&pool)
        .product(ProductId::new(id))
        .await?;
    print_json(&product)
}

/// Print customers matching a first and last name.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the query fails.
pub async fn customers_by_name(first_name: &str, last_name: &str) -> Result<(), CliError> {
    let (_config, pool) = connect().await?;
    let customers = CatalogRepository::new(&pool)
        .customers_by_name(first_name, last_name)
        .await?;
    print_json(&customers)
}

/// Print a customer's orders.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the query fails.
pub async fn orders(customer_id: i32) -> Result<(), CliError> {
    let (_config, pool) = connect().await?;
    let orders = CatalogRepository::new(&pool)
        .orders_for_customer(CustomerId::new(customer_id))
        .await?;
    print_json(&orders)
}
