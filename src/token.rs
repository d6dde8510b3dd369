//! Bearer token claim decoding.
//!
//! DESIGN
//! ======
//! The client never holds the backend's signing key, so decoding is a pure
//! read of the JWT payload segment: no signature check, no network call.
//! Identity derived here is for display and routing only; the backend still
//! authenticates every request that carries the token.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token must have 3 segments, found {0}")]
    Segments(usize),
    #[error("token payload is not base64url: {0}")]
    Base64(String),
    #[error("token claims are invalid: {0}")]
    Claims(String),
}

/// Identity claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedUser {
    pub username: String,
    #[serde(rename = "_id")]
    pub id: String,
    /// Expiry (unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Issued at (unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Any claims beyond the ones above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DecodedUser {
    /// True when the token carries an `exp` at or before `now` (unix seconds).
    /// Tokens without `exp` never expire.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= now)
    }
}

/// Decode the claims of a JWT without verifying its signature.
///
/// # Errors
///
/// Returns [`TokenError`] if the token does not have three segments, the
/// payload is not base64url, or the claims lack `username`/`_id`.
pub fn decode_token(token: &str) -> Result<DecodedUser, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Segments(segments.len()));
    }

    // Some issuers pad the payload; URL_SAFE_NO_PAD rejects '='.
    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| TokenError::Base64(e.to_string()))?;

    serde_json::from_slice::<DecodedUser>(&bytes).map_err(|e| TokenError::Claims(e.to_string()))
}

/// Current wall-clock time in unix seconds.
#[must_use]
pub fn now_secs() -> i64 {
    #[allow(clippy::cast_possible_wrap)]
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    secs
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
