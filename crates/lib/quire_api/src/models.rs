//! Request and response bodies specific to the HTTP surface.
//!
//! Domain shapes (`User`, `Post`, `AccessToken`, ...) come from
//! `quire_core::models` and are serialized as-is.

use serde::{Deserialize, Serialize};

/// `POST /auth/register` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/login` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Error body for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub error: String,
    pub message: String,
}
