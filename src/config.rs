//! Client configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://verify.eryn.io".to_string()
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_request_timeout() -> u64 {
    30
}

/// Configuration for [`VerificationClient`](crate::VerificationClient).
///
/// All values are fixed at construction; the client never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the verification API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request when present.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Lifetime of cached lookups, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Emit a debug log line for every outgoing request.
    #[serde(default)]
    pub log_requests: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            cache_ttl_secs: default_cache_ttl(),
            request_timeout_secs: default_request_timeout(),
            log_requests: false,
        }
    }
}

impl ClientConfig {
    /// Configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different API instance.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Authenticate requests with a bearer token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Override the cache TTL.
    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Toggle per-request debug logging.
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }
}
