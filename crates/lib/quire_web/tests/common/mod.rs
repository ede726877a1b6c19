//! Shared helpers: a real API on an ephemeral port, and the frontend router
//! driven in-process with cookies carried by hand.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use quire_api::AppState;
use quire_api::config::ApiConfig;
use quire_web::WebState;
use quire_web::config::WebConfig;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::form_urlencoded;

pub const SESSION_SECRET: &str =
    "test-session-secret-test-session-secret-test-session-secret-0123456789";

pub const PASSWORD: &str = "secret-pw";

/// Start an in-memory API and return a frontend router pointed at it.
pub async fn web() -> Router {
    let config = ApiConfig::new("127.0.0.1:0", None, "test-jwt-secret").expect("api config");
    let api = quire_api::router(AppState::in_memory(config).expect("api state"));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, api).await.expect("api server");
    });

    let config = WebConfig::new("127.0.0.1:0", &format!("http://{addr}"), SESSION_SECRET, false)
        .expect("web config");
    quire_web::router(WebState::new(config))
}

/// What a browser would care about in a response.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookies: Vec<String>,
    pub body: Value,
}

impl Reply {
    /// The `Set-Cookie` line for the session, if any.
    pub fn session_set_cookie(&self) -> Option<&str> {
        self.set_cookies
            .iter()
            .map(String::as_str)
            .find(|c| c.starts_with("__session="))
    }

    /// `__session=<value>`, ready to send back in a `Cookie` header.
    pub fn session_cookie(&self) -> Option<String> {
        self.session_set_cookie()
            .map(|c| c.split(';').next().unwrap_or_default().to_string())
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    form: Option<&[(&str, &str)]>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let req = match form {
        Some(pairs) => {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter().copied())
                .finish();
            builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(encoded))
                .unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let location = resp
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let set_cookies = resp
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply {
        status,
        location,
        set_cookies,
        body,
    }
}

/// Register through the frontend, log in, and return the session cookie.
pub async fn logged_in(app: &Router, email: &str) -> String {
    let reply = send(
        app,
        Method::POST,
        "/register",
        None,
        Some(&[("email", email), ("password", PASSWORD)]),
    )
    .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER, "register failed: {reply:?}");

    let reply = send(
        app,
        Method::POST,
        "/login",
        None,
        Some(&[("email", email), ("password", PASSWORD)]),
    )
    .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER, "login failed: {reply:?}");
    reply.session_cookie().expect("session cookie")
}
