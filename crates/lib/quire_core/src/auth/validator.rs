//! Access token validation.
//!
//! Every successful validation re-reads the user from the store. A deleted
//! account stops working at once, and the identity carries the current email
//! rather than the one baked into the token. The price is one primary-key
//! lookup per authenticated request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::AuthError;
use super::jwt::JwtKeys;
use crate::models::Identity;
use crate::store::UserStore;
use crate::uuid::parse_id;

#[derive(Clone)]
pub struct TokenValidator {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl TokenValidator {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    pub async fn validate(&self, token: &str) -> Result<Identity, AuthError> {
        self.validate_at(token, Utc::now()).await
    }

    /// Validate against an explicit clock.
    ///
    /// `InvalidToken` for a bad signature, a malformed token, or `now` at or
    /// past expiry; `Unauthorized` when the subject no longer exists.
    pub async fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        let claims = self.keys.verify(token, now).inspect_err(|e| {
            warn!(error = %e, "rejected access token");
        })?;

        let user_id = parse_id(&claims.sub)
            .ok_or_else(|| AuthError::InvalidToken("malformed subject".into()))?;

        let user = self.users.find_by_id(user_id).await.map_err(|e| match e {
            AuthError::NotFound(_) => {
                warn!(%user_id, "token subject no longer exists");
                AuthError::Unauthorized("User not found".into())
            }
            other => other,
        })?;

        Ok(Identity {
            user_id: user.id,
            email: user.email,
        })
    }
}
