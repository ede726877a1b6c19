//! The session user's profile page.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use axum_extra::extract::SignedCookieJar;
use quire_core::models::{User, UserPatch};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::api_failure;
use crate::WebState;
use crate::error::WebError;
use crate::session::{self, SessionUser};

const PROFILE_PATH: &str = "/profile";

#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub user: SessionUser,
    pub profile: User,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdated {
    pub success: &'static str,
    pub profile: User,
}

/// Profile form. `intent` is `update` or `delete`.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl ProfileForm {
    fn into_patch(self) -> Result<UserPatch, WebError> {
        if self.email.is_empty() {
            return Err(WebError::invalid("email", "Email is required"));
        }
        Ok(UserPatch {
            email: Some(self.email),
            // Blank means keep the current password.
            password: self.password.filter(|p| !p.is_empty()),
        })
    }
}

/// `GET /profile`
pub async fn show(
    State(state): State<WebState>,
    jar: SignedCookieJar,
) -> Result<Json<ProfilePage>, Response> {
    let session =
        session::require_session(&jar, PROFILE_PATH).map_err(IntoResponse::into_response)?;
    let profile = state
        .client
        .me(&session.token)
        .await
        .map_err(|e| api_failure(jar, e, PROFILE_PATH))?;
    Ok(Json(ProfilePage {
        user: session.user,
        profile,
    }))
}

/// `POST /profile`
pub async fn submit(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    Form(form): Form<ProfileForm>,
) -> Result<Response, Response> {
    let session =
        session::require_session(&jar, PROFILE_PATH).map_err(IntoResponse::into_response)?;

    match form.intent.as_deref() {
        Some("update") => {
            let patch = form.into_patch().map_err(IntoResponse::into_response)?;
            let profile = state
                .client
                .update_me(&session.token, &patch)
                .await
                .map_err(|e| api_failure(jar, e, PROFILE_PATH))?;
            Ok(Json(ProfileUpdated {
                success: "Profile updated successfully!",
                profile,
            })
            .into_response())
        }
        Some("delete") => {
            state
                .client
                .delete_me(&session.token)
                .await
                .map_err(|e| api_failure(jar.clone(), e, PROFILE_PATH))?;
            info!(user_id = %session.user.id, "account deleted, session destroyed");
            Ok((session::destroy_session(jar), Redirect::to("/login")).into_response())
        }
        _ => Err(WebError::invalid("intent", "Unknown intent").into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, password: Option<&str>) -> ProfileForm {
        ProfileForm {
            intent: Some("update".into()),
            email: email.into(),
            password: password.map(Into::into),
        }
    }

    #[test]
    fn email_is_required() {
        assert!(matches!(
            form("", None).into_patch(),
            Err(WebError::Invalid { field: "email", .. })
        ));
    }

    #[test]
    fn blank_password_is_left_out() {
        let patch = form("a@example.com", Some("")).into_patch().unwrap();
        assert_eq!(patch.email.as_deref(), Some("a@example.com"));
        assert!(patch.password.is_none());

        let patch = form("a@example.com", Some("new-secret")).into_patch().unwrap();
        assert_eq!(patch.password.as_deref(), Some("new-secret"));
    }
}
