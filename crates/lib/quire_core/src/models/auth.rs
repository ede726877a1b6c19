//! Authentication domain models.
//!
//! These are the shapes that cross the token boundary: the claims signed into
//! an access token and the identity a validated token resolves to.

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: user ID (standard JWT `sub` claim).
    pub sub: String,
    /// User email at the time the token was issued.
    pub email: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

/// The authenticated identity of a request.
///
/// Only produced by the token validator or by a successful credential check,
/// so holding one means the caller proved who they are in this request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

/// Login response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}
