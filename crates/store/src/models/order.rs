//! Customer order types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use backstock_core::{CustomerId, OrderId, Price, ProductId};

/// A purchase of one product by one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    /// Product name at read time (joined from `products`).
    pub product_name: String,
    /// Price actually charged.
    pub sell_price: Price,
    pub purchase_date: DateTime<Utc>,
}
