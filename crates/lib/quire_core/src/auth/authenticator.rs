//! Credential verification and token issuance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::AuthError;
use super::jwt::JwtKeys;
use super::password::{
    hash_password, validate_email, validate_password, verify_against_dummy, verify_password,
};
use super::validator::TokenValidator;
use crate::models::{AccessToken, Identity, NewUser, User};
use crate::store::UserStore;

/// How a caller proves who they are.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// Email and password, as submitted to the login form.
    Local { email: String, password: String },
    /// A previously issued access token.
    Bearer(String),
}

/// Registers users, checks their credentials, and issues access tokens.
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    /// Create an account. Fails with `Conflict` when the email is taken,
    /// whether the pre-check or the store's own constraint notices first.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        validate_email(email)?;
        validate_password(password)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::Conflict("Email already exists".into()));
        }

        let password_hash = hash_password(password)?;
        let user = self
            .users
            .create(NewUser {
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Check an email/password pair. Both failure causes return the same
    /// `InvalidCredentials` error.
    pub async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let Some(credentials) = self.users.find_credentials_by_email(email).await? else {
            verify_against_dummy(password);
            debug!("login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &credentials.password_hash)? {
            debug!("login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(credentials.user)
    }

    /// Issue an access token for a user whose credentials were just checked.
    pub fn login(&self, user: &User) -> Result<AccessToken, AuthError> {
        self.login_at(user, Utc::now())
    }

    pub fn login_at(&self, user: &User, now: DateTime<Utc>) -> Result<AccessToken, AuthError> {
        let access_token = self.keys.issue(&user.id.to_string(), &user.email, now)?;
        info!(user_id = %user.id, "access token issued");
        Ok(AccessToken { access_token })
    }

    /// Resolve either authentication method to an identity.
    pub async fn authenticate(&self, method: AuthMethod) -> Result<Identity, AuthError> {
        match method {
            AuthMethod::Local { email, password } => {
                let user = self.validate_credentials(&email, &password).await?;
                Ok(Identity {
                    user_id: user.id,
                    email: user.email,
                })
            }
            AuthMethod::Bearer(token) => self.validator().validate(&token).await,
        }
    }

    /// A validator sharing this authenticator's store and keys.
    pub fn validator(&self) -> TokenValidator {
        TokenValidator::new(self.users.clone(), self.keys.clone())
    }
}
