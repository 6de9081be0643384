//! Capability-related error types.

use thiserror::Error;

/// Errors that can occur building or checking capability tokens.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// No capabilities were supplied; an empty token is never minted.
    #[error("at least one capability is required")]
    EmptyCapabilities,

    /// A capability could not be expressed as a Datalog fact.
    #[error("invalid capability fact {fact}: {reason}")]
    InvalidFact {
        /// The offending fact or field.
        fact: String,
        /// Why it's invalid.
        reason: String,
    },

    /// The root key could not sign the token.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The token could not be parsed or its signature did not verify.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Authorization could not be evaluated.
    #[error("authorization error: {0}")]
    Authorization(String),

    /// Crypto error.
    #[error("crypto error: {0}")]
    CryptoError(#[from] sxt_crypto::CryptoError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type for capability operations.
pub type CapabilityResult<T> = Result<T, CapabilityError>;
