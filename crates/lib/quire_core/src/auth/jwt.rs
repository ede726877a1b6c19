//! JWT token generation and verification.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::AuthError;
use crate::models::TokenClaims;

/// Access token lifetime: 1 day.
pub const ACCESS_TOKEN_EXPIRY_SECS: i64 = 24 * 60 * 60;

/// HS256 signing and verification keys derived from the process secret.
///
/// Built once at startup and cloned into whatever needs to issue or check
/// tokens. Construction fails on an empty secret so a misconfigured process
/// stops before serving anything.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::Validation("JWT secret must not be empty".into()));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS),
        })
    }

    /// Override the token lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Generate a signed access token issued at `now`.
    pub fn issue(&self, user_id: &str, email: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Verify signature and expiry against the supplied clock.
    ///
    /// Expiry is checked here rather than by `jsonwebtoken` so the clock can
    /// be injected, and without leeway: a token is dead from second `exp`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<TokenClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidToken("bad signature".into()),
                _ => AuthError::InvalidToken("malformed token".into()),
            })?;

        if now.timestamp() >= claims.exp {
            return Err(AuthError::InvalidToken("token expired".into()));
        }
        Ok(claims)
    }
}
