//! Prelude module - commonly used types for convenient import.
//!
//! Use `use sxt_storage::prelude::*;` to import all essential types.

pub use crate::{StorageError, StorageResult};

pub use crate::{SessionBackend, SessionRecord, SessionStore};

pub use crate::{FileSessionStore, MemorySessionStore};
