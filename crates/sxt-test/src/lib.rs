//! SxT Test - shared test utilities for the SxT client.
//!
//! This crate provides mock implementations and test helpers that can be
//! used across multiple SxT crates as a dev-dependency.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sxt_auth::AuthClient;
//! use sxt_core::AuthRoute;
//! use sxt_test::{MockTransport, token_response};
//!
//! let transport = Arc::new(
//!     MockTransport::new()
//!         .with_json(AuthRoute::Refresh, 200, &token_response("a2", "r2")),
//! );
//! let client = AuthClient::new(transport.clone());
//!
//! assert!(client.refresh("r1").is_some());
//! assert_eq!(transport.request_count(AuthRoute::Refresh), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
