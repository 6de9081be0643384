//! SxT Storage - session record persistence.
//!
//! A session record ties a user id to its bearer tokens and the key pair the
//! platform knows it by. Backends implement [`SessionStore`]:
//!
//! - [`MemorySessionStore`]: process-local, for tests and one-shot runs
//! - [`FileSessionStore`]: one JSON file per user id with atomic replacement
//!
//! Every backend goes through [`SessionStore::write`], which refuses records
//! with an empty access or refresh token before anything reaches storage.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod file;
mod memory;
mod record;
mod store;

pub use error::{StorageError, StorageResult};
pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use record::{PersistedSession, SessionRecord};
pub use store::{SessionBackend, SessionStore};
