//! Error types for the API client.
//!
//! Non-2xx responses land in `Status` with the raw status code and body.
//! Timeouts get a dedicated variant since callers often tell them apart from
//! other transport failures.

use std::time::Duration;

use reqwest::StatusCode;

/// Errors returned by `ApiClient` and the resource wrappers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// No response arrived within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection, TLS or protocol failure.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body could not be decoded as the expected type.
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// A local file could not be read into an upload.
    #[error("cannot read upload: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(timeout)
        } else {
            ApiError::Transport(err)
        }
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
