//! In-memory session store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use sxt_core::UserId;
use tracing::debug;

use crate::error::StorageResult;
use crate::record::SessionRecord;
use crate::store::SessionStore;

/// Session store backed by a process-local map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: RwLock<HashMap<UserId, SessionRecord>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self, user_id: &UserId) -> StorageResult<Option<SessionRecord>> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned())
    }

    fn persist(&self, record: &SessionRecord) -> StorageResult<()> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.user_id.clone(), record.clone());
        debug!(user_id = %record.user_id, "Session stored in memory");
        Ok(())
    }

    fn delete(&self, user_id: &UserId) -> StorageResult<()> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(user_id);
        Ok(())
    }
}
