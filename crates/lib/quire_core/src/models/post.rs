//! Post models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{User, UserId};
use crate::auth::AuthError;

pub type PostId = Uuid;

/// A blog post. `author_id` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: Option<String>,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a post's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub id: UserId,
    pub email: String,
}

impl From<&User> for PostAuthor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

/// A post together with its author, as returned by reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: Post,
    pub author: PostAuthor,
}

/// Insert payload for a new post. The author comes from the request identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Partial post update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

fn validate_title(title: &str) -> Result<(), AuthError> {
    if title.trim().is_empty() {
        return Err(AuthError::Validation("Title is required".into()));
    }
    Ok(())
}

impl NewPost {
    pub fn validate(&self) -> Result<(), AuthError> {
        validate_title(&self.title)
    }
}

impl PostPatch {
    pub fn validate(&self) -> Result<(), AuthError> {
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }
}
