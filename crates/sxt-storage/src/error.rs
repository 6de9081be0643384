//! Storage error types.

/// Errors from session storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The record carries an empty token and was not written.
    #[error("refusing to persist session with empty {which} token")]
    EmptyToken {
        /// `"access"` or `"refresh"`.
        which: &'static str,
    },

    /// The user id cannot be used as a storage key.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The backing medium failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
