//! Frontend error type and its HTTP mapping.
//!
//! Every failure renders as `{"errors": {<field>: <message>}}`, the shape
//! the forms read back. Failures not tied to one input use the `form` key.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::client::ApiClientError;

/// Convenience alias for route results.
pub type WebResult<T> = Result<T, WebError>;

#[derive(Debug, Error)]
pub enum WebError {
    /// A submitted field is missing or malformed.
    #[error("{field}: {message}")]
    Invalid { field: &'static str, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Api(#[from] ApiClientError),
}

impl WebError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }

    /// Form-level failure with a specific status.
    fn form(status: StatusCode, message: impl Into<String>) -> Response {
        (status, Json(ErrorBody::single("form", message.into()))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub errors: BTreeMap<&'static str, String>,
}

impl ErrorBody {
    pub fn single(field: &'static str, message: String) -> Self {
        Self {
            errors: BTreeMap::from([(field, message)]),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::Invalid { field, message } => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::single(field, message))).into_response()
            }
            WebError::NotFound(m) => Self::form(StatusCode::NOT_FOUND, m),
            WebError::Forbidden(m) => Self::form(StatusCode::FORBIDDEN, m),
            WebError::Api(ApiClientError::Unauthorized(m)) => Self::form(StatusCode::UNAUTHORIZED, m),
            WebError::Api(ApiClientError::Status { status, message }) => Self::form(status, message),
            WebError::Api(e) => {
                error!(error = %e, "API call failed");
                Self::form(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred. Please try again.",
                )
            }
        }
    }
}
