//! User models.
//!
//! `User` is the public shape and never carries the password hash. The hash
//! only travels inside `UserCredentials`, which the stores hand to the
//! authenticator and nobody else.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthError;
use crate::auth::password::{hash_password, validate_email, validate_password};

pub type UserId = Uuid;

/// Domain user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A bcrypt hash.
///
/// Can only be produced by hashing a plaintext password or by loading a
/// stored row, so callers outside this crate cannot hand a store a
/// pre-hashed value.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub(crate) fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// User with password hash (for the credential check only).
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: PasswordHash,
}

/// Insert payload for a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: PasswordHash,
}

/// Profile update as requested by the user. The password is plaintext.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Validated, store-ready form of a `UserPatch`.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<PasswordHash>,
}

impl UserPatch {
    /// Validate the patch and hash the new password if one was supplied.
    ///
    /// An empty password string is treated as "unchanged", matching the
    /// profile form which leaves the field blank to keep the old password.
    pub fn into_changes(self) -> Result<UserChanges, AuthError> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        let password_hash = match self.password.as_deref() {
            None | Some("") => None,
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
        };
        Ok(UserChanges {
            email: self.email,
            password_hash,
        })
    }
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password_hash.is_none()
    }
}
