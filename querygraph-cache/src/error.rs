//! Cache and transport error types.

use thiserror::Error;

/// Errors surfaced by the cache's fetch path.
///
/// All variants propagate to the caller and are never stored in the cache,
/// so the next call with the same signature retries from scratch.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// Network or transport failure.
    #[error("fetch failed: {message}")]
    Fetch { message: String },

    /// The response body could not be decoded as JSON.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// The request descriptor could not be turned into an HTTP request.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl CacheError {
    /// Shorthand for a fetch error.
    pub fn fetch(message: impl Into<String>) -> Self {
        CacheError::Fetch {
            message: message.into(),
        }
    }

    /// Shorthand for a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        CacheError::Decode {
            message: message.into(),
        }
    }

    /// Shorthand for an invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        CacheError::InvalidRequest {
            message: message.into(),
        }
    }
}

/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
