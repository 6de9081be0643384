//! Authentication error types.

use std::fmt;
use sxt_core::TransportError;
use sxt_crypto::CryptoError;
use sxt_storage::StorageError;
use thiserror::Error;

/// Longest response body kept in an error.
const BODY_SNIPPET_LEN: usize = 512;

/// Protocol step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStep {
    /// `auth/code`
    RequestChallenge,
    /// `auth/token`
    ExchangeToken,
    /// `auth/refresh`
    Refresh,
}

impl fmt::Display for AuthStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RequestChallenge => "challenge request",
            Self::ExchangeToken => "token exchange",
            Self::Refresh => "token refresh",
        };
        f.write_str(name)
    }
}

/// Why an endpoint call failed.
#[derive(Debug, Error)]
pub enum EndpointCause {
    /// No response was obtained.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// The endpoint answered 2xx with a body that does not fit the protocol.
    #[error("malformed response ({reason}): {body}")]
    MalformedBody {
        /// What was wrong with it.
        reason: String,
        /// Leading part of the response body.
        body: String,
    },
}

impl EndpointCause {
    pub(crate) fn status(status: u16, body: &[u8]) -> Self {
        Self::Status {
            status,
            body: snippet(body),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>, body: &[u8]) -> Self {
        Self::MalformedBody {
            reason: reason.into(),
            body: snippet(body),
        }
    }
}

fn snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.into_owned(),
    }
}

/// Errors from the login protocol and session bootstrap.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An auth endpoint call failed.
    #[error("{step} failed: {cause}")]
    Endpoint {
        /// Which step failed.
        step: AuthStep,
        /// What went wrong.
        #[source]
        cause: EndpointCause,
    },

    /// Key material could not be used for signing.
    #[error("signing failed: {0}")]
    Signing(#[source] CryptoError),

    /// A fresh key pair could not be generated.
    #[error("key generation failed: {0}")]
    KeyGeneration(#[source] CryptoError),

    /// Tokens were issued but could not be written to the session store.
    #[error("session issued but not persisted: {0}")]
    SessionPersistence(#[source] StorageError),

    /// The session store could not be read or cleared.
    #[error("session store error: {0}")]
    SessionStore(#[source] StorageError),

    /// First-time enrollment needs a join code.
    #[error("no stored session for {user_id} and no join code to enroll with")]
    MissingJoinCode {
        /// The user being enrolled.
        user_id: String,
    },

    /// Explicit credentials must name the user and both key halves.
    #[error("incomplete credentials: {0}")]
    IncompleteCredentials(String),

    /// The transport could not be configured.
    #[error("transport configuration error: {0}")]
    Configuration(String),
}

impl AuthError {
    pub(crate) fn endpoint(step: AuthStep, cause: impl Into<EndpointCause>) -> Self {
        Self::Endpoint {
            step,
            cause: cause.into(),
        }
    }

    /// The failed step, for endpoint errors.
    #[must_use]
    pub fn step(&self) -> Option<AuthStep> {
        match self {
            Self::Endpoint { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_truncates_long_bodies() {
        let long = "x".repeat(2_000);
        let cause = EndpointCause::status(500, long.as_bytes());
        let EndpointCause::Status { body, .. } = cause else {
            panic!("expected status cause");
        };
        assert_eq!(body.len(), 515);
        assert!(body.ends_with("..."));
    }

    #[test]
    fn test_display_names_step() {
        let err = AuthError::endpoint(
            AuthStep::ExchangeToken,
            EndpointCause::status(401, b"bad signature"),
        );
        assert_eq!(err.to_string(), "token exchange failed: HTTP 401: bad signature");
        assert_eq!(err.step(), Some(AuthStep::ExchangeToken));
    }
}
