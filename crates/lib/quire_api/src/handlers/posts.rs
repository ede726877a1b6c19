//! Post handlers.
//!
//! Reads are public. Writes require an authenticated caller, and update and
//! delete go through the ownership guard (existence, then authorship)
//! before the store is touched.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use quire_core::models::{NewPost, Post, PostId, PostPatch, PostWithAuthor};
use tracing::info;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthenticatedUser;

/// `GET /posts`: all posts with their authors, newest first.
pub async fn list_posts_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PostWithAuthor>>> {
    Ok(Json(state.posts.list().await?))
}

/// `GET /posts/{id}`: one post with its author.
pub async fn get_post_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<PostId>,
) -> AppResult<Json<PostWithAuthor>> {
    Ok(Json(state.posts.find(id).await?))
}

/// `POST /posts`: create a post authored by the caller.
pub async fn create_post_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(body): AppJson<NewPost>,
) -> AppResult<(StatusCode, Json<Post>)> {
    body.validate()?;
    let post = state.posts.create(user.0.user_id, body).await?;
    info!(post_id = %post.id, author_id = %post.author_id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// `PUT /posts/{id}`: update a post. Author only.
pub async fn update_post_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<PostId>,
    AppJson(patch): AppJson<PostPatch>,
) -> AppResult<Json<Post>> {
    state.ownership.authorize_post_write(id, &user.0).await?;
    patch.validate()?;
    let post = state.posts.update(id, patch).await?;
    Ok(Json(post))
}

/// `DELETE /posts/{id}`: delete a post. Author only. Returns the removed post.
pub async fn delete_post_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<PostId>,
) -> AppResult<Json<Post>> {
    state.ownership.authorize_post_write(id, &user.0).await?;
    let post = state.posts.remove(id).await?;
    info!(post_id = %post.id, "post deleted");
    Ok(Json(post))
}
