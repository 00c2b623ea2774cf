//! Credential and session services.
//!
//! # Services
//!
//! - `vault` - Argon2id password hashing and verification
//! - `session` - Registration, sign-in, and sign-out over an account store

pub mod session;
pub mod vault;
