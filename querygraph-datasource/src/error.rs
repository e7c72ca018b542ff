//! Data-source error types.

use thiserror::Error;

/// Errors raised while building handlers or extracting results.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// Invalid endpoint override or handler configuration. Raised at
    /// handler-build time and fatal to building that handler.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A result record lacks the fields the extraction contract requires.
    /// Aborts extraction of that result set.
    #[error("malformed record: {message}")]
    MalformedRecord { message: String },
}

impl DataSourceError {
    /// Shorthand for a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        DataSourceError::Configuration {
            message: message.into(),
        }
    }

    /// Shorthand for a malformed-record error.
    pub fn malformed_record(message: impl Into<String>) -> Self {
        DataSourceError::MalformedRecord {
            message: message.into(),
        }
    }
}

/// Result type alias for data-source operations.
pub type Result<T> = std::result::Result<T, DataSourceError>;
