//! A single `(operation, resource)` grant.

use std::fmt;
use std::str::FromStr;

use crate::error::{CapabilityError, CapabilityResult};

/// Permission to perform `operation` on `resource`.
///
/// Both fields end up inside a quoted Datalog string, so they must be
/// non-empty and free of quotes, backslashes and control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capability {
    operation: String,
    resource: String,
}

impl Capability {
    /// Create a capability.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::InvalidFact`] if either field is empty or
    /// contains a character that cannot appear in a fact literal.
    pub fn new(operation: impl Into<String>, resource: impl Into<String>) -> CapabilityResult<Self> {
        let operation = operation.into();
        let resource = resource.into();
        check_term("operation", &operation)?;
        check_term("resource", &resource)?;
        Ok(Self {
            operation,
            resource,
        })
    }

    /// Capability for every operation on `resource`.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn any_operation(resource: impl Into<String>) -> CapabilityResult<Self> {
        Self::new(crate::operation::WILDCARD, resource)
    }

    /// The operation name.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The resource identifier.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }
}

pub(crate) fn check_term(field: &str, value: &str) -> CapabilityResult<()> {
    let reason = if value.is_empty() {
        "must not be empty"
    } else if value.contains(['"', '\\']) {
        "must not contain quotes or backslashes"
    } else if value.chars().any(char::is_control) {
        "must not contain control characters"
    } else {
        return Ok(());
    };

    Err(CapabilityError::InvalidFact {
        fact: format!("{field} {value:?}"),
        reason: reason.into(),
    })
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operation, self.resource)
    }
}

/// Parses `operation:resource`. The first `:` separates the two, so
/// resources may themselves contain colons.
impl FromStr for Capability {
    type Err = CapabilityError;

    fn from_str(s: &str) -> CapabilityResult<Self> {
        let (operation, resource) = s.split_once(':').ok_or_else(|| CapabilityError::InvalidFact {
            fact: s.to_string(),
            reason: "expected operation:resource".into(),
        })?;
        Self::new(operation.trim(), resource.trim())
    }
}
