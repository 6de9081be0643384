//! Prelude module - commonly used types for convenient import.
//!
//! Use `use sxt_core::prelude::*;` to import all essential types.

pub use crate::{CoreError, CoreResult};

pub use crate::{JoinCode, TokenPair, UserId};

pub use crate::{
    AuthRoute, AuthTransport, HttpMethod, TransportError, TransportRequest, TransportResponse,
};

pub use crate::dirs::SxtHome;
