//! Authentication middleware: Bearer token extraction and validation.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use quire_core::auth::TokenValidator;
use quire_core::models::Identity;

use crate::AppState;
use crate::error::AppError;

/// Identity of the caller, stored in request extensions by `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))
}

/// Resolve request headers to an identity. Independent of the router so it
/// can be called from anywhere a request needs authenticating.
pub async fn authenticate(
    headers: &HeaderMap,
    validator: &TokenValidator,
) -> Result<Identity, AppError> {
    let token = bearer_token(headers)?;
    Ok(validator.validate(token).await?)
}

/// Axum middleware: authenticates the request and injects
/// `AuthenticatedUser` into its extensions before the handler runs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = authenticate(request.headers(), &state.validator).await?;
    request.extensions_mut().insert(AuthenticatedUser(identity));
    Ok(next.run(request).await)
}
