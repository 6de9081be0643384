//! SxT Auth - challenge-response login and session lifecycle.
//!
//! This crate provides:
//! - [`AuthClient`]: the protocol primitives (challenge, sign, token
//!   exchange, validate, refresh, logout) over any [`AuthTransport`](sxt_core::AuthTransport)
//! - [`ReqwestTransport`]: the blocking HTTP transport
//! - [`AuthSession`]: the bootstrap state machine that reuses, refreshes or
//!   re-establishes a stored session
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sxt_auth::{AuthClient, AuthSession, Credentials, ReqwestTransport, DEFAULT_TIMEOUT};
//! use sxt_core::{JoinCode, UserId};
//! use sxt_storage::MemorySessionStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ReqwestTransport::new("https://api.spaceandtime.app/v1", DEFAULT_TIMEOUT)?;
//! let mut auth = AuthSession::new(
//!     AuthClient::new(Arc::new(transport)),
//!     Arc::new(MemorySessionStore::new()),
//! );
//!
//! let session = auth.bootstrap(Credentials::stored(
//!     UserId::new("alice")?,
//!     Some(JoinCode::new("join-code")?),
//! ))?;
//! println!("bearer token length: {}", session.access_token().len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod client;
mod error;
mod http;
mod session;

pub use client::{AuthChallenge, AuthClient, ChallengeSignature, DEFAULT_SCHEME};
pub use error::{AuthError, AuthResult, AuthStep, EndpointCause};
pub use http::{DEFAULT_TIMEOUT, ReqwestTransport};
pub use session::{
    ActiveSession, AuthSession, BootstrapOutcome, Credentials, KeyPolicy, SessionState,
};
