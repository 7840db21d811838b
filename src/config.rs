//! Configuration types for the API client and outbound messages.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`ClientConfig`] - endpoint, credential, paging and timeout settings
//! - [`SplitConfig`] - length limits for outbound messages
//!
//! # Example
//!
//! ```rust
//! use gmkit::config::ClientConfig;
//!
//! let config = ClientConfig::new()
//!     .with_token("secret")
//!     .with_timeout_secs(10);
//!
//! assert_eq!(config.page_size, 100);
//! assert_eq!(config.token.as_deref(), Some("secret"));
//! ```

use std::env;

use serde::{Deserialize, Serialize};

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "GROUPME_TOKEN";

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "GROUPME_API_URL";

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.groupme.com/v3";

/// Largest page the messages endpoints will return.
pub const MAX_PAGE_SIZE: usize = 100;

/// Settings for [`HttpClient`](crate::api::HttpClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL without a trailing slash (default: the public v3 API)
    pub base_url: String,

    /// Access token; requests are refused locally when this is `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub token: Option<String>,

    /// Messages per page (default: 100, the service maximum)
    pub page_size: usize,

    /// Groups/chats per listing page (default: 10)
    pub list_page_size: usize,

    /// Per-request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            page_size: MAX_PAGE_SIZE,
            list_page_size: 10,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from `GROUPME_TOKEN` and `GROUPME_API_URL`.
    ///
    /// Unset or empty variables leave the defaults in place.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(token) = env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty()) {
            config.token = Some(token);
        }
        if let Some(url) = env::var(API_URL_ENV).ok().filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url);
        }
        config
    }

    /// Sets the API base URL. A trailing slash is removed.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Sets the access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the message page size, clamped to `1..=100`.
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Sets the listing page size.
    #[must_use]
    pub fn with_list_page_size(mut self, size: usize) -> Self {
        self.list_page_size = size.max(1);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Length limits applied to outbound text.
///
/// The service refuses messages over 1000 characters. Text longer than
/// `max_len` is split into chunks of at most `chunk_len` characters, which is
/// kept well below the limit since separators are re-added between pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Longest text sent as a single message (default: 1000)
    pub max_len: usize,

    /// Longest chunk produced when splitting (default: 920)
    pub chunk_len: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_len: 1000,
            chunk_len: 920,
        }
    }
}

impl SplitConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the single-message limit.
    #[must_use]
    pub fn with_max_len(mut self, len: usize) -> Self {
        self.max_len = len.max(1);
        self
    }

    /// Sets the chunk size, never below one character.
    #[must_use]
    pub fn with_chunk_len(mut self, len: usize) -> Self {
        self.chunk_len = len.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert!(config.token.is_none());
        assert_eq!(config.page_size, 100);
        assert_eq!(config.list_page_size, 10);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_base_url("http://localhost:8080/v3/")
            .with_token("abc")
            .with_page_size(500)
            .with_list_page_size(0)
            .with_timeout_secs(5);

        assert_eq!(config.base_url, "http://localhost:8080/v3");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        assert_eq!(config.list_page_size, 1);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_client_config_serde_skips_missing_token() {
        let json = serde_json::to_string(&ClientConfig::new()).unwrap();
        assert!(!json.contains("token"));

        let parsed: ClientConfig = serde_json::from_str(
            r#"{"base_url":"http://x","page_size":50,"list_page_size":10,"timeout_secs":1}"#,
        )
        .unwrap();
        assert_eq!(parsed.page_size, 50);
        assert!(parsed.token.is_none());
    }

    #[test]
    fn test_split_config_default() {
        let config = SplitConfig::default();
        assert_eq!(config.max_len, 1000);
        assert_eq!(config.chunk_len, 920);
    }

    #[test]
    fn test_split_config_builder() {
        let config = SplitConfig::new().with_max_len(10).with_chunk_len(0);
        assert_eq!(config.max_len, 10);
        assert_eq!(config.chunk_len, 1);
    }
}
