//! Domain models shared by the stores, the API, and the frontend client.

pub mod auth;
pub mod post;
pub mod user;

pub use auth::{AccessToken, Identity, TokenClaims};
pub use post::{NewPost, Post, PostAuthor, PostId, PostPatch, PostWithAuthor};
pub use user::{NewUser, PasswordHash, User, UserChanges, UserCredentials, UserId, UserPatch};
