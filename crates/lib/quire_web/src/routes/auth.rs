//! Login, registration, and logout.

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use axum_extra::extract::SignedCookieJar;
use quire_core::models::AccessToken;
use serde::Deserialize;
use tracing::info;

use crate::WebState;
use crate::error::{WebError, WebResult};
use crate::session;

/// Login and registration form.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

impl CredentialsForm {
    fn require_filled(&self) -> WebResult<()> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(WebError::invalid("form", "Email and password are required."));
        }
        Ok(())
    }
}

/// `POST /login`: log in through the API and start a session.
pub async fn login(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    Form(form): Form<CredentialsForm>,
) -> WebResult<(SignedCookieJar, Redirect)> {
    form.require_filled()?;
    let AccessToken { access_token } = state.client.login(&form.email, &form.password).await?;

    let target = session::safe_redirect_target(form.redirect_to.as_deref());
    info!(redirect_to = target, "session started");
    let jar = session::create_session(jar, &access_token, state.config.secure_cookies);
    Ok((jar, Redirect::to(target)))
}

/// `POST /register`: create an account, then send the user to log in.
pub async fn register(
    State(state): State<WebState>,
    Form(form): Form<CredentialsForm>,
) -> WebResult<Redirect> {
    form.require_filled()?;
    state.client.register(&form.email, &form.password).await?;

    Ok(match form.redirect_to.as_deref() {
        Some(target) if !target.is_empty() => {
            session::login_redirect(session::safe_redirect_target(Some(target)))
        }
        _ => Redirect::to("/login"),
    })
}

/// `POST /logout`: end the session.
pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, Redirect) {
    (session::destroy_session(jar), Redirect::to("/login"))
}
