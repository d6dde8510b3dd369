//! Auth service — signup, login, logout, and current-user derivation.
//!
//! ARCHITECTURE
//! ============
//! The stored token is the only session state. `is_logged_in` and
//! `current_user` recompute from it on every call; nothing is cached.
//! Backend access and storage are injected (`AuthApi`, `TokenStorage`) so the
//! service runs unchanged against in-memory fakes.
//!
//! EVENTS
//! ======
//! `subscribe` hands out receivers on a `tokio::sync::broadcast` channel.
//! Only two sites emit: successful login (`true`) and logout (`false`).
//! Receivers see emissions made after they subscribed; there is no replay.
//! The channel holds `LOGIN_EVENT_CAPACITY` transitions. A receiver that
//! falls further behind gets `RecvError::Lagged(n)`, loses the `n` oldest
//! transitions, and resumes from the oldest retained one. Consumers that only
//! need the current state should re-query `is_logged_in` on `Lagged`.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::net::api::AuthApi;
use crate::net::types::{ApiErrorBody, Credentials, LoginResponse};
use crate::storage::{AUTHORIZATION_KEY, StorageError, TokenStorage};
use crate::token::{DecodedUser, TokenError, decode_token};

const LOGIN_EVENT_CAPACITY: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("backend returned {status}: {}", .body.message)]
    Api { status: u16, body: ApiErrorBody },
    #[error("response parse failed: {0}")]
    Parse(String),
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
    #[error("no session token stored")]
    NotLoggedIn,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn TokenStorage>,
    logged_in: broadcast::Sender<bool>,
}

impl AuthService {
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, storage: Arc<dyn TokenStorage>) -> Self {
        let (logged_in, _) = broadcast::channel(LOGIN_EVENT_CAPACITY);
        Self { api, storage, logged_in }
    }

    /// Create an account, then log in with the same credentials.
    ///
    /// Only the follow-up login stores a token.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection unchanged (e.g. a 400 with a
    /// validation message) or any error from the follow-up [`Self::login`].
    /// An unexpected shape in a 2xx `/users` body is not an error.
    pub async fn signup(&self, user: &Credentials) -> Result<LoginResponse, AuthError> {
        let created = self.api.create_user(user).await?;
        tracing::info!(
            username = created.username.as_deref(),
            user_id = created.id.as_deref(),
            "signup succeeded"
        );
        self.login(user).await
    }

    /// Open a session, store its token, and broadcast `true`.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection unchanged; nothing is stored or
    /// broadcast in that case. A storage failure after a successful request
    /// is returned as [`AuthError::Storage`] and also suppresses the event.
    pub async fn login(&self, user: &Credentials) -> Result<LoginResponse, AuthError> {
        let response = self.api.create_session(user).await?;
        self.storage.set(AUTHORIZATION_KEY, &response.token)?;
        tracing::info!(username = %user.username, "login succeeded");
        self.emit(true);
        Ok(response)
    }

    /// True when a token is stored. Expiry is not consulted; see
    /// [`Self::session_expired`].
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        match self.storage.get(AUTHORIZATION_KEY) {
            Ok(token) => token.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "token storage unreadable; treating as logged out");
                false
            }
        }
    }

    /// Remove the stored token and broadcast `false`, whether or not a token
    /// was present.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the token cannot be removed; the
    /// event is still broadcast.
    pub fn logout(&self) -> Result<(), AuthError> {
        let removed = self.storage.remove(AUTHORIZATION_KEY);
        tracing::info!("logout");
        self.emit(false);
        removed.map_err(AuthError::from)
    }

    /// Decode the stored token's claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotLoggedIn`] when no token is stored and
    /// [`AuthError::Token`] when the stored token cannot be decoded.
    pub fn current_user(&self) -> Result<DecodedUser, AuthError> {
        let token = self.storage.get(AUTHORIZATION_KEY)?.ok_or(AuthError::NotLoggedIn)?;
        Ok(decode_token(&token)?)
    }

    /// True when a stored token's `exp` is at or before `now` (unix seconds).
    /// False when logged out or the token carries no `exp`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::current_user`], except a missing token yields `Ok(false)`.
    pub fn session_expired(&self, now: i64) -> Result<bool, AuthError> {
        match self.current_user() {
            Ok(user) => Ok(user.is_expired_at(now)),
            Err(AuthError::NotLoggedIn) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Raw stored token, for `Authorization: Bearer` headers.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if storage cannot be read.
    pub fn token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.storage.get(AUTHORIZATION_KEY)?)
    }

    /// Receive future login (`true`) and logout (`false`) transitions.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<bool> {
        self.logged_in.subscribe()
    }

    fn emit(&self, logged_in: bool) {
        // Err only means nobody is listening.
        let listeners = self.logged_in.send(logged_in).unwrap_or(0);
        tracing::debug!(logged_in, listeners, "login state broadcast");
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
