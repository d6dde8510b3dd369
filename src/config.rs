//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TOKEN_DIR: &str = ".lunch";
const DEFAULT_TOKEN_FILE: &str = "session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl ClientTimeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for ClientTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub token_file: PathBuf,
    pub timeouts: ClientTimeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `LUNCH_API_BASE_URL`: default `http://localhost:8080/api`
    /// - `LUNCH_TOKEN_FILE`: default `~/.lunch/session.json`
    /// - `LUNCH_REQUEST_TIMEOUT_SECS`: default 30
    /// - `LUNCH_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        let api_base_url = normalize_base_url(
            &std::env::var("LUNCH_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
        );
        let token_file = std::env::var("LUNCH_TOKEN_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(default_token_file, PathBuf::from);
        let timeouts = ClientTimeouts {
            request_secs: env_parse_u64("LUNCH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("LUNCH_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Self { api_base_url, token_file, timeouts }
    }

    /// Replace the base URL, applying the same normalization as `from_env`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api_base_url = normalize_base_url(base_url);
        self
    }

    #[must_use]
    pub fn with_token_file(mut self, path: PathBuf) -> Self {
        self.token_file = path;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_file: default_token_file(),
            timeouts: ClientTimeouts::default(),
        }
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn default_token_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_TOKEN_DIR)
        .join(DEFAULT_TOKEN_FILE)
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
