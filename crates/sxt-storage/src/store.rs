//! The session store interface and backend selection.

use std::path::PathBuf;
use std::sync::Arc;
use sxt_core::UserId;

use crate::error::StorageResult;
use crate::file::FileSessionStore;
use crate::memory::MemorySessionStore;
use crate::record::SessionRecord;

/// Persists session records keyed by user id.
///
/// Implementations provide [`persist`](Self::persist); callers use
/// [`write`](Self::write), which validates the record first. Writes must be
/// atomic from the caller's view.
pub trait SessionStore: Send + Sync {
    /// Load the record for `user_id`.
    ///
    /// Returns `Ok(None)` when no usable record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend itself fails.
    fn read(&self, user_id: &UserId) -> StorageResult<Option<SessionRecord>>;

    /// Store a record that has already passed validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn persist(&self, record: &SessionRecord) -> StorageResult<()>;

    /// Remove the record for `user_id`. Removing a missing record is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn delete(&self, user_id: &UserId) -> StorageResult<()>;

    /// Validate and store a record, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::EmptyToken`](crate::StorageError::EmptyToken)
    /// without touching storage if either token is empty, otherwise any
    /// backend error.
    fn write(&self, record: &SessionRecord) -> StorageResult<()> {
        record.ensure_persistable()?;
        self.persist(record)
    }
}

/// Which backend to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    /// Process-local map.
    Memory,
    /// One JSON file per user id in the given directory.
    File(PathBuf),
}

impl SessionBackend {
    /// Open the selected backend.
    #[must_use]
    pub fn open(&self) -> Arc<dyn SessionStore> {
        match self {
            Self::Memory => Arc::new(MemorySessionStore::new()),
            Self::File(dir) => Arc::new(FileSessionStore::new(dir)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;
    use sxt_core::TokenPair;
    use sxt_crypto::KeyPair;

    #[test]
    fn test_write_rejects_empty_tokens_before_storage() {
        let dir = tempfile::tempdir().unwrap();
        let sessions = dir.path().join("sessions");

        for backend in [SessionBackend::Memory, SessionBackend::File(sessions.clone())] {
            let store = backend.open();
            let record = SessionRecord::new(
                UserId::new("alice").unwrap(),
                TokenPair::new("", "refresh"),
                KeyPair::generate().unwrap(),
            );

            assert!(matches!(
                store.write(&record),
                Err(StorageError::EmptyToken { .. })
            ));
            assert!(store.read(&record.user_id).unwrap().is_none());
        }

        // The file backend never even created its directory.
        assert!(!sessions.exists());
    }
}
