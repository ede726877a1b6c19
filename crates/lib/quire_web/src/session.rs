//! Session bridge: keeps the API access token in a signed, httpOnly cookie.
//!
//! A request is either anonymous (no cookie, or one whose signature does not
//! verify) or authenticated (a cookie carrying the token). The cookie holds
//! the token and nothing else.

use axum::response::Redirect;
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::debug;
use url::form_urlencoded;

/// Cookie name for the session.
pub const SESSION_COOKIE: &str = "__session";

/// Session lifetime: 7 days.
pub const SESSION_MAX_AGE_DAYS: i64 = 7;

/// The user a session belongs to, read from the token payload.
///
/// For display only. The signature is not checked here; the API remains
/// the authority on who the caller is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
}

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

/// Build the httpOnly session cookie.
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(SESSION_MAX_AGE_DAYS))
        .build()
}

/// Build the removal cookie for the session.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Store a freshly issued token. Anonymous becomes authenticated.
pub fn create_session(jar: SignedCookieJar, token: &str, secure: bool) -> SignedCookieJar {
    jar.add(session_cookie(token, secure))
}

/// The stored token, or `None` when the cookie is absent or tampered with.
pub fn token(jar: &SignedCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

/// The session user, decoded from the stored token's payload.
pub fn user(jar: &SignedCookieJar) -> Option<SessionUser> {
    token(jar).and_then(|t| decode_user(&t))
}

/// Read `sub` and `email` from a token without verifying it.
pub fn decode_user(token: &str) -> Option<SessionUser> {
    #[derive(Deserialize)]
    struct Payload {
        sub: String,
        email: String,
    }

    let payload = token.split('.').nth(1)?;
    let bytes = match URL_SAFE_NO_PAD.decode(payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "session token payload is not base64");
            return None;
        }
    };
    let Payload { sub, email } = serde_json::from_slice(&bytes).ok()?;
    Some(SessionUser { id: sub, email })
}

/// The current session, or a redirect to the login page that brings the
/// user back to `redirect_to` afterwards.
pub fn require_session(jar: &SignedCookieJar, redirect_to: &str) -> Result<Session, Redirect> {
    let token = token(jar).ok_or_else(|| login_redirect(redirect_to))?;
    let user = decode_user(&token).ok_or_else(|| login_redirect(redirect_to))?;
    Ok(Session { token, user })
}

/// Remove the session cookie. Authenticated becomes anonymous.
pub fn destroy_session(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(clear_session_cookie())
}

/// The API no longer accepts the stored token: drop the session and send the
/// user to log in again, returning to `redirect_to` afterwards.
pub fn reauthenticate(jar: SignedCookieJar, redirect_to: &str) -> (SignedCookieJar, Redirect) {
    debug!(redirect_to, "session rejected by API");
    (destroy_session(jar), login_redirect(redirect_to))
}

/// `303` to `/login?redirectTo=<path>`.
pub fn login_redirect(redirect_to: &str) -> Redirect {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirectTo", redirect_to)
        .finish();
    Redirect::to(&format!("/login?{query}"))
}

/// Accept only same-site paths as a post-login destination.
///
/// Browsers treat `\` like `/` in a `Location`, so `/\host` is as
/// off-site as `//host`.
pub fn safe_redirect_target(target: Option<&str>) -> &str {
    match target {
        Some(path) if is_local_path(path) => path,
        _ => "/posts",
    }
}

fn is_local_path(path: &str) -> bool {
    let mut chars = path.chars();
    chars.next() == Some('/')
        && !matches!(chars.next(), Some('/'))
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}
