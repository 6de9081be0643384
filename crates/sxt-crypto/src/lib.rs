//! SxT Crypto - key management for the SxT client.
//!
//! This crate provides:
//! - Ed25519 key pairs with secure memory handling
//! - Validated construction from externally supplied key material
//! - Deterministic ("pure" Ed25519) signatures over raw message bytes
//!
//! Keys never touch disk here. Persisting them is the job of the session
//! store.
//!
//! # Example
//!
//! ```
//! use sxt_crypto::KeyPair;
//!
//! let keypair = KeyPair::generate().unwrap();
//!
//! let signature = keypair.sign(b"auth-code");
//! assert!(keypair.verify(b"auth-code", &signature).is_ok());
//!
//! // Transport encodings used by the auth endpoint.
//! assert_eq!(signature.to_hex().len(), 128);
//! let b64 = keypair.export_public_key().to_base64();
//! assert!(b64.ends_with('='));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod keypair;
mod signature;

pub use error::{CryptoError, CryptoResult};
pub use keypair::{KEYPAIR_LENGTH, KeyPair, PUBLIC_KEY_LENGTH, PublicKey, SEED_LENGTH};
pub use signature::{SIGNATURE_LENGTH, Signature};
