//! Post ownership checks.

use std::sync::Arc;

use tracing::warn;

use super::AuthError;
use crate::models::{Identity, Post, PostId, UserId};
use crate::store::PostStore;

/// Decides whether an identity may mutate a post. Only the author may.
#[derive(Clone)]
pub struct OwnershipAuthorizer {
    posts: Arc<dyn PostStore>,
}

impl OwnershipAuthorizer {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }

    /// `true` iff the post exists and `user_id` wrote it. A missing post is
    /// `false`, not an error; storage failures still propagate.
    pub async fn is_author(&self, post_id: PostId, user_id: UserId) -> Result<bool, AuthError> {
        let author = self.posts.author_of(post_id).await?;
        Ok(author == Some(user_id))
    }

    /// Gate a write: existence first (`NotFound`), then ownership
    /// (`Forbidden`). Returns the current post for the caller to mutate.
    pub async fn authorize_post_write(
        &self,
        post_id: PostId,
        identity: &Identity,
    ) -> Result<Post, AuthError> {
        let post = self.posts.find(post_id).await?.post;
        if post.author_id != identity.user_id {
            warn!(%post_id, user_id = %identity.user_id, "post write denied: not the author");
            return Err(AuthError::Forbidden(
                "You are not authorized to modify this post.".into(),
            ));
        }
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::models::{NewPost, NewUser, User};
    use crate::store::{MemoryStore, UserStore};
    use crate::uuid::new_id;

    async fn user(store: &MemoryStore, email: &str) -> User {
        UserStore::create(
            store,
            NewUser {
                email: email.into(),
                password_hash: hash_password("secret-pw").unwrap(),
            },
        )
        .await
        .unwrap()
    }

    fn identity(user: &User) -> Identity {
        Identity {
            user_id: user.id,
            email: user.email.clone(),
        }
    }

    #[tokio::test]
    async fn only_the_creator_is_author() {
        let store = Arc::new(MemoryStore::new());
        let alice = user(&store, "alice@example.com").await;
        let bob = user(&store, "bob@example.com").await;
        let post = PostStore::create(
            store.as_ref(),
            alice.id,
            NewPost {
                title: "Alice's".into(),
                content: None,
            },
        )
        .await
        .unwrap();

        let authz = OwnershipAuthorizer::new(store.clone());
        assert!(authz.is_author(post.id, alice.id).await.unwrap());
        assert!(!authz.is_author(post.id, bob.id).await.unwrap());
    }

    #[tokio::test]
    async fn missing_post_is_never_authored() {
        let store = Arc::new(MemoryStore::new());
        let alice = user(&store, "alice@example.com").await;
        let authz = OwnershipAuthorizer::new(store.clone());

        assert!(!authz.is_author(new_id(), alice.id).await.unwrap());
    }

    #[tokio::test]
    async fn write_guard_checks_existence_before_ownership() {
        let store = Arc::new(MemoryStore::new());
        let alice = user(&store, "alice@example.com").await;
        let bob = user(&store, "bob@example.com").await;
        let post = PostStore::create(
            store.as_ref(),
            alice.id,
            NewPost {
                title: "Alice's".into(),
                content: None,
            },
        )
        .await
        .unwrap();
        let authz = OwnershipAuthorizer::new(store.clone());

        assert!(matches!(
            authz.authorize_post_write(new_id(), &identity(&bob)).await,
            Err(AuthError::NotFound(_))
        ));
        assert!(matches!(
            authz.authorize_post_write(post.id, &identity(&bob)).await,
            Err(AuthError::Forbidden(_))
        ));
        let allowed = authz
            .authorize_post_write(post.id, &identity(&alice))
            .await
            .unwrap();
        assert_eq!(allowed.id, post.id);
    }
}
