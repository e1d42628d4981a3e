//! Error types for probes.

use thiserror::Error;

/// Errors that can occur while fetching a health endpoint.
///
/// These never cross the public probe boundary: every variant is folded
/// into a `HealthResult` before a probe returns.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,
}

impl ProbeError {
    /// Whether the endpoint could not be reached at all (as opposed to
    /// reaching it and getting an error back).
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ProbeError::Connection(_) | ProbeError::Timeout)
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout
        } else if err.is_connect() {
            ProbeError::Connection(err.to_string())
        } else {
            ProbeError::Http(err.to_string())
        }
    }
}
