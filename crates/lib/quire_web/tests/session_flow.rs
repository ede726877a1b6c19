//! Integration test: the session cookie across login, logout, and API
//! rejections.

mod common;

use axum::http::{Method, StatusCode};
use common::{PASSWORD, logged_in, send, web};
use serde_json::Value;

#[tokio::test]
async fn register_then_login_starts_a_session() {
    let app = web().await;

    let reply = send(
        &app,
        Method::POST,
        "/register",
        None,
        Some(&[("email", "a@example.com"), ("password", PASSWORD)]),
    )
    .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/login"));

    let reply = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(&[
            ("email", "a@example.com"),
            ("password", PASSWORD),
            ("redirectTo", "/profile"),
        ]),
    )
    .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/profile"));

    let set_cookie = reply.session_set_cookie().expect("session cookie");
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=604800"));
    assert!(!set_cookie.contains("Secure"));

    let cookie = reply.session_cookie().unwrap();
    let reply = send(&app, Method::GET, "/profile", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["user"]["email"], "a@example.com");
    assert_eq!(reply.body["profile"]["email"], "a@example.com");
}

#[tokio::test]
async fn login_defaults_to_posts() {
    let app = web().await;
    send(
        &app,
        Method::POST,
        "/register",
        None,
        Some(&[("email", "a@example.com"), ("password", PASSWORD)]),
    )
    .await;

    let reply = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(&[
            ("email", "a@example.com"),
            ("password", PASSWORD),
            ("redirectTo", "https://elsewhere.example"),
        ]),
    )
    .await;
    assert_eq!(reply.location.as_deref(), Some("/posts"));
}

#[tokio::test]
async fn failed_login_reports_form_error() {
    let app = web().await;
    logged_in(&app, "a@example.com").await;

    let reply = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(&[("email", "a@example.com"), ("password", "wrong-pw")]),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["errors"]["form"], "Invalid credentials");
    assert!(reply.session_set_cookie().is_none());

    let reply = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(&[("email", "a@example.com"), ("password", "")]),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["errors"]["form"], "Email and password are required.");
}

#[tokio::test]
async fn duplicate_registration_surfaces_conflict() {
    let app = web().await;
    logged_in(&app, "a@example.com").await;

    let reply = send(
        &app,
        Method::POST,
        "/register",
        None,
        Some(&[("email", "a@example.com"), ("password", PASSWORD)]),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["errors"]["form"], "Email already exists");
}

#[tokio::test]
async fn tampered_cookie_reads_as_anonymous() {
    let app = web().await;
    let cookie = logged_in(&app, "a@example.com").await;

    let mut tampered = cookie.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'x' { 'y' } else { 'x' });

    let reply = send(&app, Method::GET, "/posts", Some(&tampered), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["user"], Value::Null);

    let reply = send(
        &app,
        Method::POST,
        "/posts/new",
        Some(&tampered),
        Some(&[("title", "Sneaky")]),
    )
    .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(
        reply.location.as_deref(),
        Some("/login?redirectTo=%2Fposts%2Fnew")
    );

    // The untouched cookie still works.
    let reply = send(&app, Method::GET, "/posts", Some(&cookie), None).await;
    assert_eq!(reply.body["user"]["email"], "a@example.com");
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = web().await;
    let cookie = logged_in(&app, "a@example.com").await;

    let reply = send(&app, Method::POST, "/logout", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/login"));

    let removal = reply.session_set_cookie().expect("removal cookie");
    assert!(removal.starts_with("__session=;"));
    assert!(removal.contains("Max-Age=0"));
}

#[tokio::test]
async fn api_rejection_destroys_session_and_redirects() {
    let app = web().await;
    let cookie = logged_in(&app, "a@example.com").await;

    // Delete the account; this response already clears the cookie.
    let reply = send(
        &app,
        Method::POST,
        "/profile",
        Some(&cookie),
        Some(&[("intent", "delete")]),
    )
    .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/login"));
    assert!(reply.session_set_cookie().unwrap().contains("Max-Age=0"));

    // A browser that kept the old cookie gets a 401 from the API, which
    // drops the session and sends it to log in again.
    let reply = send(&app, Method::GET, "/profile", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(
        reply.location.as_deref(),
        Some("/login?redirectTo=%2Fprofile")
    );
    assert!(reply.session_set_cookie().unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn profile_update_changes_login_email() {
    let app = web().await;
    let cookie = logged_in(&app, "a@example.com").await;

    let reply = send(
        &app,
        Method::POST,
        "/profile",
        Some(&cookie),
        Some(&[
            ("intent", "update"),
            ("email", "b@example.com"),
            ("password", ""),
        ]),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["success"], "Profile updated successfully!");
    assert_eq!(reply.body["profile"]["email"], "b@example.com");

    let reply = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(&[("email", "b@example.com"), ("password", PASSWORD)]),
    )
    .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);

    let reply = send(
        &app,
        Method::POST,
        "/profile",
        Some(&cookie),
        Some(&[("intent", "update"), ("email", "")]),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["errors"]["email"], "Email is required");
}
