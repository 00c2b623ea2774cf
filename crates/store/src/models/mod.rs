//! Domain models for the storefront data layer.
//!
//! These types represent validated domain objects separate from database row
//! types. The account type handed to callers, [`customer::Customer`], has no
//! password hash field; the hash only travels on [`customer::CustomerRecord`]
//! between the record store and the session coordinator.

pub mod customer;
pub mod order;
pub mod product;
