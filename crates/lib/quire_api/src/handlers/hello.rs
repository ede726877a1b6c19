//! Greeting endpoint: doubles as a liveness check.

/// `GET /`: plain-text greeting.
pub async fn hello() -> &'static str {
    "Hello from the Quire API!"
}
