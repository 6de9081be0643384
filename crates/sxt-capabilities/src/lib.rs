//! SxT Capabilities - signed, attenuated authorization tokens.
//!
//! A capability token is a biscuit rooted at the user's Ed25519 key whose
//! authority block lists one `sxt:capability(operation, resource)` fact per
//! granted capability, in the order given. Tokens travel as URL-safe base64
//! strings; several may be presented together as an [`AttenuationSet`].
//!
//! # Example
//!
//! ```
//! use sxt_capabilities::{Capability, CapabilityTokenBuilder, operation};
//! use sxt_crypto::KeyPair;
//!
//! let root = KeyPair::generate().unwrap();
//!
//! let token = CapabilityTokenBuilder::new()
//!     .capability(Capability::new(operation::DQL_SELECT, "eth.blocks").unwrap())
//!     .build(&root)
//!     .unwrap();
//!
//! let public = root.export_public_key();
//! assert!(token.verify(&public).is_ok());
//! assert!(token.authorizes(&public, operation::DQL_SELECT, "eth.blocks").unwrap());
//! assert!(!token.authorizes(&public, operation::DML_DELETE, "eth.blocks").unwrap());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod operation;

mod attenuation;
mod capability;
mod error;
mod token;

pub use attenuation::{AttenuationSet, BISCUITS_FIELD};
pub use capability::Capability;
pub use error::{CapabilityError, CapabilityResult};
pub use token::{CAPABILITY_PREDICATE, CapabilityToken, CapabilityTokenBuilder};
