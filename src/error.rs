//! Error types for the verification client.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for verification lookups.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the verification client.
///
/// A not-found answer from the API is not an error; lookups report it as
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
    /// The request was rejected for pacing reasons, either by the local
    /// bucket (`local: true`) before any network traffic, or by the remote
    /// service answering 429 (`local: false`).
    #[error("rate limit exceeded, retry after {}s", retry_after.as_secs())]
    RateLimited {
        /// How long to wait before the next attempt can succeed.
        retry_after: Duration,
        /// Whether the rejection originated client-side.
        local: bool,
    },

    /// The remote service answered with an error payload.
    #[error("verification API error ({status}): {message}")]
    Api {
        /// Upstream HTTP status.
        status: u16,
        /// Message extracted from the error payload.
        message: String,
    },

    /// Non-ok response that carried no recognizable error payload.
    #[error("unexpected response from verification API ({status})")]
    UnexpectedStatus {
        /// Upstream HTTP status.
        status: u16,
        /// Raw response body, for diagnostics.
        body: String,
    },

    /// The configured base URL does not parse.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// Transport-level failure from the HTTP client.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    /// Whether this is a rate limit rejection, local or remote.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// The wait the caller should honor before retrying, when one applies.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    /// Upstream HTTP status, for errors that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
