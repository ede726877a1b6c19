//! Authentication and authorization logic.
//!
//! Password hashing, JWT issuance and verification, the credential-checking
//! authenticator, the token validator, and the post ownership authorizer.

pub mod authenticator;
pub mod jwt;
pub mod ownership;
pub mod password;
pub mod validator;

use thiserror::Error;

pub use authenticator::{AuthMethod, Authenticator};
pub use jwt::JwtKeys;
pub use ownership::OwnershipAuthorizer;
pub use validator::TokenValidator;

/// Authentication and authorization errors.
///
/// None of these are retried; each ends the current request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email already registered.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Login mismatch. Deliberately carries no detail so an unknown email
    /// and a wrong password look the same.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Malformed, expired, or wrongly signed token.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token was valid but the identity behind it is gone.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Identity is known but may not touch the resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
