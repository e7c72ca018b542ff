//! Pattern-level error types.

use thiserror::Error;

/// Errors raised by selection handling.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A single-pick widget received more than one simultaneously-selected
    /// value.
    #[error("ambiguous selection: widget allows exactly one value, got {count}")]
    AmbiguousSelection { count: usize },
}

/// Result type alias for pattern operations.
pub type Result<T> = std::result::Result<T, PatternError>;
