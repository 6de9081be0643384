//! File-backed session store.
//!
//! Records live in `{dir}/{user_id}.json`, readable only by the owner.
//!
//! # Crash Safety
//!
//! Writes go to a uniquely named temporary file in the same directory that is
//! then renamed over the record, so a reader sees either the old record or the
//! new one, never a partial write. This holds across processes too.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use sxt_core::UserId;
use tracing::{debug, info, warn};

use crate::error::{StorageError, StorageResult};
use crate::record::{PersistedSession, SessionRecord};
use crate::store::SessionStore;

/// Session store writing one JSON file per user id.
///
/// Directory creation is lazy: the directory is only created on the first
/// write, not at construction time.
#[derive(Debug)]
pub struct FileSessionStore {
    dir: PathBuf,
    dir_ensured: AtomicBool,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Create a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let dir_exists = dir.is_dir();
        Self {
            dir,
            dir_ensured: AtomicBool::new(dir_exists),
            write_lock: Mutex::new(()),
        }
    }

    /// Directory holding the records.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> StorageResult<()> {
        if self.dir_ensured.load(Ordering::Relaxed) {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700))?;
        }
        self.dir_ensured.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn record_path(&self, user_id: &UserId) -> StorageResult<PathBuf> {
        let id = user_id.as_str();
        if id.starts_with('.')
            || id.contains(['/', '\\', '\0'])
            || id.chars().any(char::is_control)
        {
            return Err(StorageError::InvalidKey(format!(
                "user id {id:?} cannot be used as a file name"
            )));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));

    // Unique per writer, so concurrent processes never share a temp file.
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl SessionStore for FileSessionStore {
    fn read(&self, user_id: &UserId) -> StorageResult<Option<SessionRecord>> {
        let path = self.record_path(user_id)?;

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record =
            PersistedSession::from_json(&bytes).and_then(|p| p.to_record(user_id.clone()));

        match record {
            Ok(record) => {
                debug!(user_id = %user_id, "Session loaded");
                Ok(Some(record))
            },
            Err(e) => {
                warn!(user_id = %user_id, path = ?path, error = %e, "Ignoring unreadable session record");
                Ok(None)
            },
        }
    }

    fn persist(&self, record: &SessionRecord) -> StorageResult<()> {
        let path = self.record_path(&record.user_id)?;
        let json = PersistedSession::from_record(record).to_json()?;

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.ensure_dir()?;
        write_atomic(&path, &json)?;

        debug!(user_id = %record.user_id, path = ?path, "Session saved");
        Ok(())
    }

    fn delete(&self, user_id: &UserId) -> StorageResult<()> {
        let path = self.record_path(user_id)?;

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(user_id = %user_id, "Session deleted");
                Ok(())
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sxt_core::TokenPair;
    use sxt_crypto::KeyPair;

    fn record(user: &str) -> SessionRecord {
        SessionRecord::new(
            UserId::new(user).unwrap(),
            TokenPair::new("access", "refresh"),
            KeyPair::generate().unwrap(),
        )
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("sessions"));
        let record = record("alice");

        assert!(store.read(&record.user_id).unwrap().is_none());
        store.write(&record).unwrap();

        let loaded = store.read(&record.user_id).unwrap().unwrap();
        assert_eq!(loaded, record);
        assert!(dir.path().join("sessions/alice.json").is_file());
        assert_eq!(fs::read_dir(dir.path().join("sessions")).unwrap().count(), 1);
    }

    #[test]
    fn test_overwrite_keeps_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        let record = record("alice");

        store.write(&record).unwrap();
        store
            .write(&record.clone().with_tokens(TokenPair::new("a2", "r2")))
            .unwrap();

        let loaded = store.read(&record.user_id).unwrap().unwrap();
        assert_eq!(loaded.tokens.access_token, "a2");
        assert_eq!(loaded.keypair, record.keypair);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let sessions = dir.path().join("sessions");
        let store = FileSessionStore::new(&sessions);
        store.write(&record("alice")).unwrap();

        let dir_mode = fs::metadata(&sessions).unwrap().permissions().mode();
        let file_mode = fs::metadata(sessions.join("alice.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(dir_mode & 0o777, 0o700);
        assert_eq!(file_mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_record_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("alice.json"), b"{not json").unwrap();

        let store = FileSessionStore::new(dir.path());
        assert!(
            store
                .read(&UserId::new("alice").unwrap())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_path_like_user_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());

        for id in ["../escape", "a/b", "a\\b", ".hidden"] {
            let user = UserId::new(id).unwrap();
            assert!(matches!(
                store.read(&user),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn test_concurrent_writers_on_same_dir() {
        let dir = tempfile::tempdir().unwrap();
        let user = UserId::new("alice").unwrap();
        let keypair = KeyPair::generate().unwrap();
        let short = TokenPair::new("a", "r");
        let long = TokenPair::new("a".repeat(4096), "r".repeat(4096));

        std::thread::scope(|scope| {
            for tokens in [&short, &long] {
                let store = FileSessionStore::new(dir.path());
                let record = SessionRecord::new(user.clone(), tokens.clone(), keypair.clone());
                scope.spawn(move || {
                    for _ in 0..100 {
                        store.write(&record).unwrap();
                    }
                });
            }
        });

        let loaded = FileSessionStore::new(dir.path())
            .read(&user)
            .unwrap()
            .unwrap();
        assert!(loaded.tokens == short || loaded.tokens == long);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        let record = record("alice");

        store.write(&record).unwrap();
        store.delete(&record.user_id).unwrap();
        assert!(store.read(&record.user_id).unwrap().is_none());

        // Deleting again is fine.
        store.delete(&record.user_id).unwrap();
    }
}
