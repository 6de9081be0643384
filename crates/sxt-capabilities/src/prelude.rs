//! Prelude module - commonly used types for convenient import.
//!
//! Use `use sxt_capabilities::prelude::*;` to import all essential types.

pub use crate::{CapabilityError, CapabilityResult};

pub use crate::{AttenuationSet, Capability, CapabilityToken, CapabilityTokenBuilder};

pub use crate::operation;
