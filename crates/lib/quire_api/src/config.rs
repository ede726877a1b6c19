//! API server configuration.

use std::fmt;

use thiserror::Error;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Configuration errors. All of them stop startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not defined in environment variables")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// PostgreSQL connection URL. `None` runs against the in-memory store.
    pub database_url: Option<String>,
    /// JWT signing secret.
    pub jwt_secret: String,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

impl ApiConfig {
    /// Build a config, rejecting an empty signing secret.
    pub fn new(
        bind_addr: impl Into<String>,
        database_url: Option<String>,
        jwt_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Empty("JWT_SECRET"));
        }
        Ok(Self {
            bind_addr: bind_addr.into(),
            database_url,
            jwt_secret,
        })
    }

    /// Reads configuration variables through `lookup`.
    ///
    /// | Variable       | Default                  |
    /// |----------------|--------------------------|
    /// | `BIND_ADDR`    | `127.0.0.1:3000`         |
    /// | `DATABASE_URL` | unset (in-memory store)  |
    /// | `JWT_SECRET`   | required                 |
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        Self::new(
            lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            jwt_secret,
        )
    }
}
