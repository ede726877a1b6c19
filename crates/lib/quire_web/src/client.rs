//! Typed client for the Quire HTTP API.

use quire_core::models::{
    AccessToken, NewPost, Post, PostId, PostPatch, PostWithAuthor, User, UserPatch,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use url::Url;

/// Errors from an API call.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// The API rejected the credentials or token (`401`).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success status, with the API's message.
    #[error("API returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiClientError {
    /// HTTP status the API answered with, if it answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the Quire API. Cheap to clone; clones share a connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Client rooted at `base`. A path prefix on `base` is kept on every call.
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> Result<RequestBuilder, ApiClientError> {
        let url = self.base.join(path.trim_start_matches('/'))?;
        let builder = self.http.request(method, url);
        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Checks the response status; returns the response on success or an
    /// error carrying the API's message.
    async fn ensure_success(response: Response) -> Result<Response, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        if status == StatusCode::UNAUTHORIZED {
            Err(ApiClientError::Unauthorized(message))
        } else {
            Err(ApiClientError::Status { status, message })
        }
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiClientError> {
        let response = Self::ensure_success(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// `POST /auth/register`
    pub async fn register(&self, email: &str, password: &str) -> Result<User, ApiClientError> {
        let req = self
            .request(Method::POST, "/auth/register", None)?
            .json(&json!({ "email": email, "password": password }));
        Self::json(req).await
    }

    /// `POST /auth/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, ApiClientError> {
        let req = self
            .request(Method::POST, "/auth/login", None)?
            .json(&json!({ "email": email, "password": password }));
        Self::json(req).await
    }

    /// `GET /users/me`
    pub async fn me(&self, token: &str) -> Result<User, ApiClientError> {
        Self::json(self.request(Method::GET, "/users/me", Some(token))?).await
    }

    /// `PATCH /users/me`
    pub async fn update_me(&self, token: &str, patch: &UserPatch) -> Result<User, ApiClientError> {
        let req = self.request(Method::PATCH, "/users/me", Some(token))?.json(patch);
        Self::json(req).await
    }

    /// `DELETE /users/me`
    pub async fn delete_me(&self, token: &str) -> Result<(), ApiClientError> {
        let req = self.request(Method::DELETE, "/users/me", Some(token))?;
        Self::ensure_success(req.send().await?).await?;
        Ok(())
    }

    /// `GET /posts`
    pub async fn list_posts(&self) -> Result<Vec<PostWithAuthor>, ApiClientError> {
        Self::json(self.request(Method::GET, "/posts", None)?).await
    }

    /// `GET /posts/{id}`
    pub async fn get_post(&self, id: PostId) -> Result<PostWithAuthor, ApiClientError> {
        Self::json(self.request(Method::GET, &format!("/posts/{id}"), None)?).await
    }

    /// `POST /posts`
    pub async fn create_post(&self, token: &str, post: &NewPost) -> Result<Post, ApiClientError> {
        let req = self.request(Method::POST, "/posts", Some(token))?.json(post);
        Self::json(req).await
    }

    /// `PUT /posts/{id}`
    pub async fn update_post(
        &self,
        token: &str,
        id: PostId,
        patch: &PostPatch,
    ) -> Result<Post, ApiClientError> {
        let req = self
            .request(Method::PUT, &format!("/posts/{id}"), Some(token))?
            .json(patch);
        Self::json(req).await
    }

    /// `DELETE /posts/{id}`
    pub async fn delete_post(&self, token: &str, id: PostId) -> Result<Post, ApiClientError> {
        Self::json(self.request(Method::DELETE, &format!("/posts/{id}"), Some(token))?).await
    }
}
