//! Durable store and session ledger as JSON files.
//!
//! Writes go to a temp file in the same directory and are persisted over
//! the target, so a crash never leaves a half-written store behind.

use crate::error::WorkspaceResult;
use pagedraft_editor::{DirtyPageStore, SessionLedger};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub const STORE_FILE: &str = "dirty-pages.json";
pub const LEDGER_FILE: &str = "session-ledger.json";

#[derive(Debug, Clone)]
pub struct JsonStorage {
    dir: PathBuf,
}

impl JsonStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load_store(&self) -> WorkspaceResult<DirtyPageStore> {
        self.load(STORE_FILE)
    }

    pub fn save_store(&self, store: &DirtyPageStore) -> WorkspaceResult<()> {
        self.save(STORE_FILE, store)
    }

    pub fn load_ledger(&self) -> WorkspaceResult<SessionLedger> {
        self.load(LEDGER_FILE)
    }

    pub fn save_ledger(&self, ledger: &SessionLedger) -> WorkspaceResult<()> {
        self.save(LEDGER_FILE, ledger)
    }

    /// Drop the session-scoped ledger; the store is kept
    pub fn clear_session(&self) -> WorkspaceResult<()> {
        match std::fs::remove_file(self.dir.join(LEDGER_FILE)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> WorkspaceResult<T> {
        let path = self.dir.join(name);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(file = %path.display(), "No saved state, starting empty");
                return Ok(T::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) -> WorkspaceResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(name);

        let mut file = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut file, value)?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(&target).map_err(|e| e.error)?;

        debug!(file = %target.display(), "Saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagedraft_editor::{DirtyPageEntry, EditLog};

    #[test]
    fn test_missing_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path().join("state"));
        assert!(storage.load_store().unwrap().is_empty());
        assert_eq!(storage.load_ledger().unwrap(), SessionLedger::new());
    }

    #[test]
    fn test_store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path());

        let mut store = DirtyPageStore::new();
        store.upsert(
            "index.html",
            DirtyPageEntry::new("<p>dirty</p>".to_string(), "<p>base</p>", EditLog::new()),
        );
        storage.save_store(&store).unwrap();

        let loaded = storage.load_store().unwrap();
        assert_eq!(loaded, store);
        assert!(loaded.get("index.html").unwrap().is_based_on("<p>base</p>"));
    }

    #[test]
    fn test_clear_session_keeps_store() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path());
        storage.save_store(&DirtyPageStore::new()).unwrap();
        storage.save_ledger(&SessionLedger::new()).unwrap();

        storage.clear_session().unwrap();
        storage.clear_session().unwrap();
        assert!(dir.path().join(STORE_FILE).exists());
        assert!(!dir.path().join(LEDGER_FILE).exists());
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORE_FILE), "{ not json").unwrap();
        let storage = JsonStorage::new(dir.path());
        assert!(storage.load_store().is_err());
    }
}
