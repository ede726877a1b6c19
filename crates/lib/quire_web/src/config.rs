//! Frontend service configuration.

use std::fmt;

use axum_extra::extract::cookie::Key;
use thiserror::Error;
use url::Url;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";

/// Configuration errors. All of them stop startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not defined in environment variables")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Configuration for the frontend service.
#[derive(Clone)]
pub struct WebConfig {
    /// Address to bind the HTTP listener.
    pub bind_addr: String,
    /// Base URL of the Quire API, e.g. `http://127.0.0.1:3000`.
    pub api_base_url: Url,
    /// Key that signs the session cookie.
    pub session_key: Key,
    /// Mark the session cookie `Secure`. On in production.
    pub secure_cookies: bool,
}

impl fmt::Debug for WebConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebConfig")
            .field("bind_addr", &self.bind_addr)
            .field("api_base_url", &self.api_base_url.as_str())
            .field("session_key", &"<redacted>")
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl WebConfig {
    /// Build a config from raw values.
    ///
    /// The session secret must be at least 64 bytes; shorter secrets are
    /// rejected rather than stretched.
    pub fn new(
        bind_addr: impl Into<String>,
        api_base_url: &str,
        session_secret: &str,
        secure_cookies: bool,
    ) -> Result<Self, ConfigError> {
        let api_base_url = Url::parse(api_base_url).map_err(|e| ConfigError::Invalid {
            name: "API_BASE_URL",
            reason: e.to_string(),
        })?;
        let session_key =
            Key::try_from(session_secret.as_bytes()).map_err(|e| ConfigError::Invalid {
                name: "SESSION_SECRET",
                reason: e.to_string(),
            })?;
        Ok(Self {
            bind_addr: bind_addr.into(),
            api_base_url,
            session_key,
            secure_cookies,
        })
    }

    /// Reads configuration variables through `lookup`.
    ///
    /// | Variable         | Default                      |
    /// |------------------|------------------------------|
    /// | `BIND_ADDR`      | `127.0.0.1:3001`             |
    /// | `API_BASE_URL`   | required                     |
    /// | `SESSION_SECRET` | required, at least 64 bytes  |
    /// | `QUIRE_ENV`      | `production` enables `Secure` |
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = lookup("API_BASE_URL").ok_or(ConfigError::Missing("API_BASE_URL"))?;
        let session_secret =
            lookup("SESSION_SECRET").ok_or(ConfigError::Missing("SESSION_SECRET"))?;
        let production = lookup("QUIRE_ENV").is_some_and(|env| env == "production");
        Self::new(
            lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            &api_base_url,
            &session_secret,
            production,
        )
    }
}
