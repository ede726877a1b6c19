//! PostgreSQL-backed store.
//!
//! Email uniqueness comes from the `users_email_key` unique index, and a
//! violation surfaces as `AuthError::Conflict`. Posts cascade with their
//! author via the foreign key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{PostStore, UserStore, email_taken, post_not_found, user_not_found};
use crate::auth::AuthError;
use crate::models::{
    NewPost, NewUser, PasswordHash, Post, PostAuthor, PostId, PostPatch, PostWithAuthor, User,
    UserChanges, UserCredentials, UserId,
};
use crate::uuid::new_id;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    id: Uuid,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: Option<String>,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PostAuthorRow {
    id: Uuid,
    title: String,
    content: Option<String>,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_email: String,
}

impl From<PostAuthorRow> for PostWithAuthor {
    fn from(row: PostAuthorRow) -> Self {
        Self {
            author: PostAuthor {
                id: row.author_id,
                email: row.author_email,
            },
            post: Post {
                id: row.id,
                title: row.title,
                content: row.content,
                author_id: row.author_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

const USER_COLUMNS: &str = "id, email, created_at, updated_at";
const POST_COLUMNS: &str = "id, title, content, author_id, created_at, updated_at";
const POST_WITH_AUTHOR_SELECT: &str = "\
    SELECT p.id, p.title, p.content, p.author_id, p.created_at, p.updated_at, \
           u.email AS author_email \
    FROM posts p JOIN users u ON u.id = p.author_id";

/// Map write errors, turning the email unique index into a conflict.
fn map_write_error(e: sqlx::Error) -> AuthError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => email_taken(),
        _ => AuthError::DbError(e),
    }
}

/// Store over a PostgreSQL pool. Run `crate::migrate::migrate` first.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create(&self, new: NewUser) -> Result<User, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(new_id())
        .bind(&new.email)
        .bind(new.password_hash.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AuthError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| UserCredentials {
            user: User {
                id: r.id,
                email: r.email,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
            password_hash: PasswordHash::from_stored(r.password_hash),
        }))
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, AuthError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from)
            .ok_or_else(|| user_not_found(id))
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, AuthError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users \
             SET email = COALESCE($2, email), \
                 password_hash = COALESCE($3, password_hash), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_ref().map(PasswordHash::as_str))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .map(User::from)
        .ok_or_else(|| user_not_found(id))
    }

    async fn remove(&self, id: UserId) -> Result<User, AuthError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(User::from)
        .ok_or_else(|| user_not_found(id))
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn list(&self) -> Result<Vec<PostWithAuthor>, AuthError> {
        let rows = sqlx::query_as::<_, PostAuthorRow>(&format!(
            "{POST_WITH_AUTHOR_SELECT} ORDER BY p.created_at DESC, p.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(PostWithAuthor::from).collect())
    }

    async fn find(&self, id: PostId) -> Result<PostWithAuthor, AuthError> {
        sqlx::query_as::<_, PostAuthorRow>(&format!("{POST_WITH_AUTHOR_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(PostWithAuthor::from)
            .ok_or_else(|| post_not_found(id))
    }

    async fn author_of(&self, id: PostId) -> Result<Option<UserId>, AuthError> {
        let author = sqlx::query_scalar::<_, Uuid>("SELECT author_id FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn create(&self, author_id: UserId, new: NewPost) -> Result<Post, AuthError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "INSERT INTO posts (id, title, content, author_id) VALUES ($1, $2, $3, $4) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(new_id())
        .bind(&new.title)
        .bind(new.content.as_deref())
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                user_not_found(author_id)
            }
            _ => AuthError::DbError(e),
        })?;
        Ok(row.into())
    }

    async fn update(&self, id: PostId, patch: PostPatch) -> Result<Post, AuthError> {
        sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE posts \
             SET title = COALESCE($2, title), \
                 content = COALESCE($3, content), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.content.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .map(Post::from)
        .ok_or_else(|| post_not_found(id))
    }

    async fn remove(&self, id: PostId) -> Result<Post, AuthError> {
        sqlx::query_as::<_, PostRow>(&format!(
            "DELETE FROM posts WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Post::from)
        .ok_or_else(|| post_not_found(id))
    }
}
