//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use quire_core::models::{AccessToken, User};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::models::{LoginRequest, RegisterRequest};

/// `POST /auth/register`: create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state
        .authenticator
        .register(&body.email, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /auth/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<AccessToken>> {
    let user = state
        .authenticator
        .validate_credentials(&body.email, &body.password)
        .await?;
    let token = state.authenticator.login(&user)?;
    Ok(Json(token))
}
