//! In-process store behind a single `RwLock`.
//!
//! Each write takes the write lock for its whole check-and-mutate sequence,
//! which gives the same per-row atomicity the PostgreSQL store gets from its
//! constraints.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{PostStore, UserStore, email_taken, post_not_found, user_not_found};
use crate::auth::AuthError;
use crate::models::{
    NewPost, NewUser, PasswordHash, Post, PostAuthor, PostId, PostPatch, PostWithAuthor, User,
    UserChanges, UserCredentials, UserId,
};
use crate::uuid::new_id;

#[derive(Debug)]
struct StoredUser {
    user: User,
    password_hash: PasswordHash,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, StoredUser>,
    posts: BTreeMap<PostId, Post>,
}

impl Tables {
    fn email_in_use(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.user.email == email && Some(u.user.id) != except)
    }

    fn with_author(&self, post: &Post) -> Result<PostWithAuthor, AuthError> {
        let author = self
            .users
            .get(&post.author_id)
            .ok_or_else(|| user_not_found(post.author_id))?;
        Ok(PostWithAuthor {
            post: post.clone(),
            author: PostAuthor::from(&author.user),
        })
    }
}

/// Shared, cloneable in-memory store implementing both `UserStore` and
/// `PostStore`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new: NewUser) -> Result<User, AuthError> {
        let mut tables = self.tables.write().await;
        if tables.email_in_use(&new.email, None) {
            return Err(email_taken());
        }
        let now = Utc::now();
        let user = User {
            id: new_id(),
            email: new.email,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: new.password_hash,
            },
        );
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.user.email == email)
            .map(|u| u.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.user.email == email)
            .map(|u| UserCredentials {
                user: u.user.clone(),
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, AuthError> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(&id)
            .map(|u| u.user.clone())
            .ok_or_else(|| user_not_found(id))
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, AuthError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Err(user_not_found(id));
        }
        if let Some(email) = &changes.email
            && tables.email_in_use(email, Some(id))
        {
            return Err(email_taken());
        }

        let stored = tables.users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
        if let Some(email) = changes.email {
            stored.user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            stored.password_hash = hash;
        }
        stored.user.updated_at = Utc::now();
        Ok(stored.user.clone())
    }

    async fn remove(&self, id: UserId) -> Result<User, AuthError> {
        let mut tables = self.tables.write().await;
        let removed = tables.users.remove(&id).ok_or_else(|| user_not_found(id))?;
        tables.posts.retain(|_, post| post.author_id != id);
        Ok(removed.user)
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list(&self) -> Result<Vec<PostWithAuthor>, AuthError> {
        let tables = self.tables.read().await;
        tables
            .posts
            .values()
            .rev()
            .map(|post| tables.with_author(post))
            .collect()
    }

    async fn find(&self, id: PostId) -> Result<PostWithAuthor, AuthError> {
        let tables = self.tables.read().await;
        let post = tables.posts.get(&id).ok_or_else(|| post_not_found(id))?;
        tables.with_author(post)
    }

    async fn author_of(&self, id: PostId) -> Result<Option<UserId>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).map(|post| post.author_id))
    }

    async fn create(&self, author_id: UserId, new: NewPost) -> Result<Post, AuthError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&author_id) {
            return Err(user_not_found(author_id));
        }
        let now = Utc::now();
        let post = Post {
            id: new_id(),
            title: new.title,
            content: new.content,
            author_id,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, id: PostId, patch: PostPatch) -> Result<Post, AuthError> {
        let mut tables = self.tables.write().await;
        let post = tables.posts.get_mut(&id).ok_or_else(|| post_not_found(id))?;
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = Some(content);
        }
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn remove(&self, id: PostId) -> Result<Post, AuthError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).ok_or_else(|| post_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: hash_password("secret-pw").unwrap(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("a@example.com")).await.unwrap();

        let err = UserStore::create(&store, new_user("a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
    }

    #[tokio::test]
    async fn email_is_case_sensitive() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("a@example.com")).await.unwrap();
        assert!(UserStore::create(&store, new_user("A@example.com")).await.is_ok());
        assert!(store.find_by_email("A@EXAMPLE.COM").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lookups_on_unknown_id_are_not_found() {
        let store = MemoryStore::new();
        let id = new_id();

        assert!(matches!(store.find_by_id(id).await, Err(AuthError::NotFound(_))));
        assert!(matches!(
            UserStore::update(&store, id, UserChanges::default()).await,
            Err(AuthError::NotFound(_))
        ));
        assert!(matches!(
            UserStore::remove(&store, id).await,
            Err(AuthError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn email_change_onto_taken_address_conflicts() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("a@example.com")).await.unwrap();
        let b = UserStore::create(&store, new_user("b@example.com")).await.unwrap();

        let changes = UserChanges {
            email: Some("a@example.com".into()),
            password_hash: None,
        };
        let err = UserStore::update(&store, b.id, changes).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));

        // Keeping your own email is not a conflict.
        let same = UserChanges {
            email: Some("b@example.com".into()),
            password_hash: None,
        };
        assert!(UserStore::update(&store, b.id, same).await.is_ok());
    }

    #[tokio::test]
    async fn removing_a_user_removes_their_posts() {
        let store = MemoryStore::new();
        let a = UserStore::create(&store, new_user("a@example.com")).await.unwrap();
        let b = UserStore::create(&store, new_user("b@example.com")).await.unwrap();
        let post_a = PostStore::create(
            &store,
            a.id,
            NewPost {
                title: "mine".into(),
                content: None,
            },
        )
        .await
        .unwrap();
        PostStore::create(
            &store,
            b.id,
            NewPost {
                title: "theirs".into(),
                content: None,
            },
        )
        .await
        .unwrap();

        UserStore::remove(&store, a.id).await.unwrap();

        assert_eq!(store.author_of(post_a.id).await.unwrap(), None);
        let remaining = store.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].author.email, "b@example.com");
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStore::new();
        let a = UserStore::create(&store, new_user("a@example.com")).await.unwrap();
        for title in ["first", "second", "third"] {
            PostStore::create(
                &store,
                a.id,
                NewPost {
                    title: title.into(),
                    content: None,
                },
            )
            .await
            .unwrap();
        }

        let titles: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.post.title)
            .collect();
        assert_eq!(titles, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn post_patch_keeps_unset_fields() {
        let store = MemoryStore::new();
        let a = UserStore::create(&store, new_user("a@example.com")).await.unwrap();
        let post = PostStore::create(
            &store,
            a.id,
            NewPost {
                title: "title".into(),
                content: Some("body".into()),
            },
        )
        .await
        .unwrap();

        let updated = PostStore::update(
            &store,
            post.id,
            PostPatch {
                title: Some("new title".into()),
                content: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "new title");
        assert_eq!(updated.content.as_deref(), Some("body"));
        assert_eq!(updated.author_id, a.id);
    }
}
