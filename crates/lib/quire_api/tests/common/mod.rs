//! Shared helpers for the router integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use quire_api::{AppState, config::ApiConfig};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

/// Router over a fresh in-memory store.
pub fn app() -> Router {
    let config = ApiConfig::new("127.0.0.1:0", None, SECRET).expect("config");
    let state = AppState::in_memory(config).expect("state");
    quire_api::router(state)
}

/// Send a request and return the status with the parsed JSON body
/// (`Value::Null` for empty or non-JSON bodies).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Register a user and return their id.
pub async fn register(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["id"].as_str().expect("user id").to_string()
}

/// Log in and return the access token.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["access_token"].as_str().expect("token").to_string()
}

/// Register then log in.
pub async fn signed_up(app: &Router, email: &str) -> (String, String) {
    let id = register(app, email, "secret-pw").await;
    let token = login(app, email, "secret-pw").await;
    (id, token)
}
