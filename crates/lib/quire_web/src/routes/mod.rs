//! Frontend route handlers.

pub mod auth;
pub mod posts;
pub mod profile;

use axum::response::{IntoResponse, Response};
use axum_extra::extract::SignedCookieJar;

use crate::client::ApiClientError;
use crate::error::WebError;
use crate::session;

/// Render a failed API call made on behalf of a session.
///
/// A `401` means the API no longer accepts the stored token, so the session
/// is destroyed and the user is sent to log in, coming back to `redirect_to`.
pub(crate) fn api_failure(
    jar: SignedCookieJar,
    err: ApiClientError,
    redirect_to: &str,
) -> Response {
    match err {
        ApiClientError::Unauthorized(_) => {
            session::reauthenticate(jar, redirect_to).into_response()
        }
        other => WebError::from(other).into_response(),
    }
}
