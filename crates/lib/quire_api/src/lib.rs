//! # quire_api
//!
//! HTTP API library for Quire: registration, login, the caller's profile,
//! and posts with author-only writes.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use quire_core::auth::{AuthError, Authenticator, JwtKeys, OwnershipAuthorizer, TokenValidator};
use quire_core::store::{MemoryStore, PgStore, PostStore, UserStore};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, hello, posts, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Credential store.
    pub users: Arc<dyn UserStore>,
    /// Post store.
    pub posts: Arc<dyn PostStore>,
    pub authenticator: Authenticator,
    pub validator: TokenValidator,
    pub ownership: OwnershipAuthorizer,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Wire the auth components over the given stores.
    ///
    /// Fails when the signing secret is unusable, so a bad config never
    /// reaches the listener.
    pub fn new(
        config: ApiConfig,
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
    ) -> Result<Self, AuthError> {
        let keys = JwtKeys::new(&config.jwt_secret)?;
        Ok(Self {
            authenticator: Authenticator::new(users.clone(), keys.clone()),
            validator: TokenValidator::new(users.clone(), keys),
            ownership: OwnershipAuthorizer::new(posts.clone()),
            users,
            posts,
            config,
        })
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(config: ApiConfig) -> Result<Self, AuthError> {
        let store = Arc::new(MemoryStore::new());
        Self::new(config, store.clone(), store)
    }

    /// State over PostgreSQL. Run `migrate` on the pool first.
    pub fn postgres(config: ApiConfig, pool: PgPool) -> Result<Self, AuthError> {
        let store = Arc::new(PgStore::new(pool));
        Self::new(config, store.clone(), store)
    }
}

/// Run embedded database migrations.
///
/// Delegates to `quire_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    quire_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/", get(hello::hello))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/posts", get(posts::list_posts_handler))
        .route("/posts/{id}", get(posts::get_post_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(
            "/users/me",
            get(users::get_me_handler)
                .patch(users::update_me_handler)
                .delete(users::delete_me_handler),
        )
        .route("/posts", post(posts::create_post_handler))
        .route(
            "/posts/{id}",
            axum::routing::put(posts::update_post_handler).delete(posts::delete_post_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
