//! API error types.

use thiserror::Error;

/// Errors that can occur when talking to a backend service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Whether the service itself reported the failure (as opposed to the
    /// request never completing).
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::NotFound(_))
    }
}
