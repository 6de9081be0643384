//! Platform identity.
//!
//! A [`UserId`] names the account on the platform and keys the stored
//! session. A [`JoinCode`] is only needed the first time a key is enrolled.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Opaque platform user id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a user id, rejecting empty or whitespace-only input.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidIdentity`] if the id is blank.
    pub fn new(id: impl Into<String>) -> CoreResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::InvalidIdentity {
                field: "user id",
                reason: "must not be empty".into(),
            });
        }
        Ok(Self(id))
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Enrollment code presented with the first challenge request.
///
/// `Debug` never prints the code.
#[derive(Clone, PartialEq, Eq)]
pub struct JoinCode(String);

impl JoinCode {
    /// Create a join code, rejecting blank input.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidIdentity`] if the code is blank.
    pub fn new(code: impl Into<String>) -> CoreResult<Self> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(CoreError::InvalidIdentity {
                field: "join code",
                reason: "must not be empty".into(),
            });
        }
        Ok(Self(code))
    }

    /// The raw code, for placing in the challenge request body.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JoinCode(<redacted>)")
    }
}
