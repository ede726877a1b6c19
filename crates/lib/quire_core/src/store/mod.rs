//! Record stores for users and posts.
//!
//! The authenticator, validator, and ownership authorizer only see these
//! traits. `MemoryStore` backs tests and `--memory` runs; `PgStore` backs
//! production.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::auth::AuthError;
use crate::models::{
    NewPost, NewUser, Post, PostId, PostPatch, PostWithAuthor, User, UserChanges,
    UserCredentials, UserId,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Credential store: users keyed by id, unique by email.
///
/// Email uniqueness is enforced by the store itself. A duplicate insert or an
/// email change onto a taken address fails with `AuthError::Conflict` even
/// when the caller skipped its own pre-check.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, new: NewUser) -> Result<User, AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Only the authenticator should call this.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AuthError>;

    /// Fails with `NotFound` for an unknown id.
    async fn find_by_id(&self, id: UserId) -> Result<User, AuthError>;

    /// Apply validated changes. Fails with `NotFound` for an unknown id.
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, AuthError>;

    /// Delete the user and their posts. Fails with `NotFound` for an unknown id.
    async fn remove(&self, id: UserId) -> Result<User, AuthError>;
}

/// Post store.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, newest first, each with its author.
    async fn list(&self) -> Result<Vec<PostWithAuthor>, AuthError>;

    /// Fails with `NotFound` for an unknown id.
    async fn find(&self, id: PostId) -> Result<PostWithAuthor, AuthError>;

    /// The post's author, or `None` if the post does not exist.
    async fn author_of(&self, id: PostId) -> Result<Option<UserId>, AuthError>;

    async fn create(&self, author_id: UserId, new: NewPost) -> Result<Post, AuthError>;

    /// Fails with `NotFound` for an unknown id.
    async fn update(&self, id: PostId, patch: PostPatch) -> Result<Post, AuthError>;

    /// Fails with `NotFound` for an unknown id.
    async fn remove(&self, id: PostId) -> Result<Post, AuthError>;
}

pub(crate) fn user_not_found(id: UserId) -> AuthError {
    AuthError::NotFound(format!("User with ID {id} not found"))
}

pub(crate) fn post_not_found(id: PostId) -> AuthError {
    AuthError::NotFound(format!("Post with ID {id} not found"))
}

pub(crate) fn email_taken() -> AuthError {
    AuthError::Conflict("Email already exists".into())
}
