//! # quire_core
//!
//! Core domain logic for Quire: the user and post models, the stores that
//! persist them, and the authentication flow (password hashing, token
//! issuance and validation, post ownership checks).

pub mod auth;
pub mod migrate;
pub mod models;
pub mod store;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
