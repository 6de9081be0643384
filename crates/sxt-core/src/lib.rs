//! SxT Core - foundation types for the SxT client.
//!
//! This crate provides:
//! - Platform identity types ([`UserId`], [`JoinCode`])
//! - The bearer [`TokenPair`] issued by the auth endpoint
//! - The [`AuthTransport`] seam between the auth protocol and HTTP
//! - The `~/.sxt/` directory layout ([`dirs::SxtHome`])

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod dirs;
pub mod error;
pub mod identity;
pub mod tokens;
pub mod transport;

pub use error::{CoreError, CoreResult};
pub use identity::{JoinCode, UserId};
pub use tokens::TokenPair;
pub use transport::{
    AuthRoute, AuthTransport, HttpMethod, TransportError, TransportRequest, TransportResponse,
};
