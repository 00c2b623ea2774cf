//! Backstock Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront data layer and its
//! tooling:
//! - `store` - Credential vault, session coordinator, and record stores
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no
//! hashing. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, stored
//!   credentials, and login state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
