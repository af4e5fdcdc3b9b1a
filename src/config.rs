//! Client configuration parsed from environment variables.
//!
//! The base URL stands in for the browser page origin: HTTP endpoints are
//! joined onto it and the socket URL mirrors its transport security.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

use reqwest::Url;

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_LOG_RETENTION: usize = 1000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const SESSION_DIR: &str = "nexus-chat";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin of the chat service, e.g. `https://chat.example.com`.
    pub base_url: String,
    /// Where the durable session (`token`, `user_id`) is kept.
    pub session_file: PathBuf,
    /// Maximum number of messages held in memory; `None` keeps everything.
    pub log_retention: Option<usize>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            session_file: default_session_file(),
            log_retention: Some(DEFAULT_LOG_RETENTION),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `NEXUS_BASE_URL`: default `http://127.0.0.1:8080`
    /// - `NEXUS_SESSION_FILE`: default `<config dir>/nexus-chat/session.json`
    /// - `NEXUS_LOG_RETENTION`: default 1000, `0` for unbounded
    /// - `NEXUS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `NEXUS_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("NEXUS_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| DEFAULT_BASE_URL.to_owned(), |s| normalize_base_url(&s));
        let session_file = std::env::var("NEXUS_SESSION_FILE")
            .ok()
            .filter(|s| !s.is_empty())
            .map_or_else(default_session_file, PathBuf::from);
        let log_retention = parse_retention(std::env::var("NEXUS_LOG_RETENTION").ok().as_deref());

        Self {
            base_url,
            session_file,
            log_retention,
            request_timeout_secs: env_parse_u64("NEXUS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: env_parse_u64("NEXUS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Replace the base URL, dropping any trailing slash.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Absolute URL for an HTTP endpoint path such as `/auth/login`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Socket URL for `token`, mirroring the base URL's transport security.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] when the base URL is neither
    /// `http://` nor `https://`.
    pub fn ws_url(&self, token: &str) -> Result<String, ClientError> {
        let base = self.base_url.trim_end_matches('/');
        let raw = if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}/ws")
        } else if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}/ws")
        } else {
            return Err(ClientError::InvalidBaseUrl(self.base_url.clone()));
        };

        let mut url = Url::parse(&raw).map_err(|_| ClientError::InvalidBaseUrl(self.base_url.clone()))?;
        url.query_pairs_mut().append_pair("token", token);
        Ok(url.into())
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(SESSION_DIR)
        .join(SESSION_FILE)
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

/// Parse a retention setting; `0` disables the limit, junk falls back to the default.
pub fn parse_retention(raw: Option<&str>) -> Option<usize> {
    match raw.map(str::trim).map(str::parse::<usize>) {
        Some(Ok(0)) => None,
        Some(Ok(n)) => Some(n),
        _ => Some(DEFAULT_LOG_RETENTION),
    }
}
