//! REST client for the lunch backend's user and session endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures and non-2xx responses are returned as-is. Nothing is
//! retried here; the caller decides what a failure means for the UI.

use super::types::{ApiErrorBody, CreatedUser, Credentials, LoginResponse};
use crate::config::ClientConfig;
use crate::services::auth::AuthError;

/// Backend operations the auth service depends on.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Create a user account (`POST /users`).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Api`] when the backend rejects the credentials,
    /// or [`AuthError::Transport`] when the request never completes. A 2xx
    /// body is never a parse error; see [`CreatedUser::from_body`].
    async fn create_user(&self, user: &Credentials) -> Result<CreatedUser, AuthError>;

    /// Open a session and receive a bearer token (`POST /sessions`).
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`AuthApi::create_user`], plus [`AuthError::Parse`]
    /// when a 2xx body carries no `token`.
    async fn create_session(&self, user: &Credentials) -> Result<LoginResponse, AuthError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HttpClientBuild`] if the underlying client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeouts.request())
            .connect_timeout(config.timeouts.connect())
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.api_base_url.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `user` to `path`, returning the body of a 2xx response.
    async fn post_credentials(&self, path: &str, user: &Credentials) -> Result<String, AuthError> {
        let url = endpoint(&self.base_url, path);
        let response = self.http.post(&url).json(user).send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "request failed");
            AuthError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| AuthError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            tracing::warn!(%url, status, "backend rejected request");
            return Err(AuthError::Api { status, body: parse_error_body(&text) });
        }

        Ok(text)
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn create_user(&self, user: &Credentials) -> Result<CreatedUser, AuthError> {
        let text = self.post_credentials("/users", user).await?;
        Ok(CreatedUser::from_body(&text))
    }

    async fn create_session(&self, user: &Credentials) -> Result<LoginResponse, AuthError> {
        let text = self.post_credentials("/sessions", user).await?;
        serde_json::from_str(&text).map_err(|e| AuthError::Parse(e.to_string()))
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Parse a backend error body, keeping non-JSON bodies verbatim as the message.
fn parse_error_body(text: &str) -> ApiErrorBody {
    serde_json::from_str::<ApiErrorBody>(text).unwrap_or_else(|_| ApiErrorBody { message: text.to_owned() })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;
