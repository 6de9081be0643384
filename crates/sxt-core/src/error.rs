//! Core error types.

use thiserror::Error;

/// Errors raised while constructing core values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An identity field was empty or malformed.
    #[error("invalid {field}: {reason}")]
    InvalidIdentity {
        /// Which field was rejected.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
