//! # quire_web
//!
//! Frontend service for Quire. Holds the API access token in a signed
//! session cookie and forwards it on every call to the API.

pub mod client;
pub mod config;
pub mod error;
pub mod routes;
pub mod session;

use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;

use crate::client::ApiClient;
use crate::config::WebConfig;
use crate::routes::{auth, posts, profile};

/// Shared state for the frontend routes.
#[derive(Debug, Clone)]
pub struct WebState {
    pub client: ApiClient,
    pub config: WebConfig,
}

impl WebState {
    pub fn new(config: WebConfig) -> Self {
        Self {
            client: ApiClient::new(config.api_base_url.clone()),
            config,
        }
    }
}

// SignedCookieJar requires Key to be extractable from state
impl FromRef<WebState> for Key {
    fn from_ref(state: &WebState) -> Self {
        state.config.session_key.clone()
    }
}

/// Builds the frontend router.
pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/posts", get(posts::list))
        .route("/posts/new", post(posts::create))
        .route("/posts/{id}", get(posts::show))
        .route("/posts/{id}/edit", get(posts::edit).post(posts::submit_edit))
        .route("/profile", get(profile::show).post(profile::submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
