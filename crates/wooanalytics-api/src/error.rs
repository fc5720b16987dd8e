//! Error types for the API client.

use crate::detail::ErrorDetail;
use thiserror::Error;

/// Errors returned by [`crate::JobService`] implementations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network or transport failure (connection refused, timeout, TLS)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {}", detail.as_ref().map_or_else(|| "no detail".to_string(), ErrorDetail::message))]
    Status {
        /// HTTP status code
        status: u16,
        /// Error detail extracted from the response body
        detail: Option<ErrorDetail>,
    },

    /// The response body did not have the expected shape
    #[error("failed to parse response from {endpoint}: {message}")]
    Parse {
        /// Endpoint path that produced the body
        endpoint: String,
        /// Error message
        message: String,
    },

    /// The configured base URL cannot carry path segments
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Error detail sent by the server, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Status { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }

    /// HTTP status code, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Human-readable message for the user, `fallback` when the server gave none.
    ///
    /// Structured field errors are joined with `", "`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail()
            .map_or_else(|| fallback.to_string(), ErrorDetail::message)
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
