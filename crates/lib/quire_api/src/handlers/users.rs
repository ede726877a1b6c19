//! Profile handlers for the authenticated user (`/users/me`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use quire_core::models::{User, UserPatch};
use tracing::info;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthenticatedUser;

/// `GET /users/me`: the caller's profile.
pub async fn get_me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<User>> {
    let me = state.users.find_by_id(user.0.user_id).await?;
    Ok(Json(me))
}

/// `PATCH /users/me`: change email and/or password.
///
/// A supplied password is always re-hashed; the body has no way to set a
/// hash directly.
pub async fn update_me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(patch): AppJson<UserPatch>,
) -> AppResult<Json<User>> {
    let changes = patch.into_changes()?;
    if changes.is_empty() {
        let me = state.users.find_by_id(user.0.user_id).await?;
        return Ok(Json(me));
    }
    let updated = state.users.update(user.0.user_id, changes).await?;
    info!(user_id = %updated.id, "profile updated");
    Ok(Json(updated))
}

/// `DELETE /users/me`: delete the caller's account and posts.
pub async fn delete_me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<StatusCode> {
    state.users.remove(user.0.user_id).await?;
    info!(user_id = %user.0.user_id, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}
