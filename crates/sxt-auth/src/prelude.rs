//! Prelude module - commonly used types for convenient import.
//!
//! Use `use sxt_auth::prelude::*;` to import all essential types.

pub use crate::{AuthError, AuthResult, AuthStep};

pub use crate::{AuthClient, ReqwestTransport};

pub use crate::{ActiveSession, AuthSession, BootstrapOutcome, Credentials, KeyPolicy, SessionState};
