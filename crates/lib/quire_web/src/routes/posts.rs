//! Post pages. Reads are open to anyone; writes need a session, and editing
//! re-checks existence and authorship before calling the API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use axum_extra::extract::SignedCookieJar;
use quire_core::models::{NewPost, PostId, PostPatch, PostWithAuthor};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::api_failure;
use crate::WebState;
use crate::error::{WebError, WebResult};
use crate::session::{self, Session, SessionUser};

/// A post as shown to the current visitor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(flatten)]
    pub post: PostWithAuthor,
    pub is_author: bool,
}

impl PostView {
    fn new(post: PostWithAuthor, user: Option<&SessionUser>) -> Self {
        let is_author = user.is_some_and(|u| u.id == post.post.author_id.to_string());
        Self { post, is_author }
    }
}

#[derive(Debug, Serialize)]
pub struct PostsPage {
    pub user: Option<SessionUser>,
    pub posts: Vec<PostView>,
}

#[derive(Debug, Serialize)]
pub struct PostPage {
    pub user: Option<SessionUser>,
    pub post: PostView,
}

/// New-post and edit form.
#[derive(Debug, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl PostForm {
    fn checked_title(&self) -> WebResult<String> {
        if self.title.trim().is_empty() {
            return Err(WebError::invalid("title", "Title is required"));
        }
        Ok(self.title.clone())
    }
}

/// `GET /posts`
pub async fn list(
    State(state): State<WebState>,
    jar: SignedCookieJar,
) -> WebResult<Json<PostsPage>> {
    let user = session::user(&jar);
    let posts = state
        .client
        .list_posts()
        .await?
        .into_iter()
        .map(|p| PostView::new(p, user.as_ref()))
        .collect();
    Ok(Json(PostsPage { user, posts }))
}

/// `GET /posts/{id}`
pub async fn show(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    Path(id): Path<PostId>,
) -> WebResult<Json<PostPage>> {
    let user = session::user(&jar);
    let post = state.client.get_post(id).await?;
    let post = PostView::new(post, user.as_ref());
    Ok(Json(PostPage { user, post }))
}

/// `POST /posts/new`
pub async fn create(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, Response> {
    let session =
        session::require_session(&jar, "/posts/new").map_err(IntoResponse::into_response)?;
    let new = NewPost {
        title: form.checked_title().map_err(IntoResponse::into_response)?,
        content: form.content.filter(|c| !c.is_empty()),
    };
    state
        .client
        .create_post(&session.token, &new)
        .await
        .map_err(|e| api_failure(jar, e, "/posts/new"))?;
    Ok(Redirect::to("/posts").into_response())
}

/// Fetch a post the session user is about to change. Missing posts are
/// `404`; posts by someone else are `403`.
async fn authored_post(
    state: &WebState,
    session: &Session,
    id: PostId,
    denied: &str,
) -> WebResult<PostWithAuthor> {
    let post = state.client.get_post(id).await.map_err(|e| match e.status() {
        Some(StatusCode::NOT_FOUND) => WebError::NotFound("Post not found".into()),
        _ => WebError::from(e),
    })?;
    if post.post.author_id.to_string() != session.user.id {
        warn!(post_id = %id, user_id = %session.user.id, "edit denied: not the author");
        return Err(WebError::Forbidden(denied.into()));
    }
    Ok(post)
}

/// `GET /posts/{id}/edit`
pub async fn edit(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    Path(id): Path<PostId>,
) -> Result<Json<PostPage>, Response> {
    let path = format!("/posts/{id}/edit");
    let session =
        session::require_session(&jar, &path).map_err(IntoResponse::into_response)?;
    let post = authored_post(&state, &session, id, "You are not the author of this post.")
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(PostPage {
        post: PostView::new(post, Some(&session.user)),
        user: Some(session.user),
    }))
}

/// `POST /posts/{id}/edit` with `intent` set to `update` or `delete`.
pub async fn submit_edit(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    Path(id): Path<PostId>,
    Form(form): Form<PostForm>,
) -> Result<Response, Response> {
    let path = format!("/posts/{id}/edit");
    let session =
        session::require_session(&jar, &path).map_err(IntoResponse::into_response)?;
    authored_post(&state, &session, id, "You are not authorized to perform this action.")
        .await
        .map_err(IntoResponse::into_response)?;

    match form.intent.as_deref() {
        Some("update") => {
            let patch = PostPatch {
                title: Some(form.checked_title().map_err(IntoResponse::into_response)?),
                content: form.content,
            };
            state
                .client
                .update_post(&session.token, id, &patch)
                .await
                .map_err(|e| api_failure(jar, e, &path))?;
            Ok(Redirect::to(&format!("/posts/{id}")).into_response())
        }
        Some("delete") => {
            state
                .client
                .delete_post(&session.token, id)
                .await
                .map_err(|e| api_failure(jar, e, &path))?;
            Ok(Redirect::to("/posts").into_response())
        }
        _ => Err(WebError::invalid("intent", "Unknown intent").into_response()),
    }
}
