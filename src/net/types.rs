//! Wire types exchanged with the lunch backend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Username/password pair sent to `/users` and `/sessions`. Never persisted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful `POST /sessions` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Successful `POST /users` body. The echoed password hash is consumed and
/// discarded during deserialization.
///
/// Any 2xx from `/users` means the account exists, so every field is optional
/// and [`CreatedUser::from_body`] never fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatedUser {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "dietPreferences", default, deserialize_with = "null_as_default")]
    pub diet_preferences: Vec<String>,
    #[serde(rename = "password", default, skip_serializing)]
    _password_hash: serde::de::IgnoredAny,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreatedUser {
    /// Parse a `/users` success body, falling back to an empty record when the
    /// body is not the expected shape.
    #[must_use]
    pub fn from_body(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unexpected /users body; continuing without user record");
            Self::default()
        })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error payload the backend sends with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
