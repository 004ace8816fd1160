//! JSON file cache store.
//!
//! One file per sync instance. Writes go to a sibling temp file that is then
//! renamed over the cache, so a reader never sees a half-written snapshot.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use inbox_sync_types::SyncSnapshot;

use super::{CacheStore, StoreError};

/// Prefix of per-instance cache file names.
pub const CACHE_FILE_PREFIX: &str = "inbox_messages";

/// Cache store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the store for a named instance inside `dir`.
    ///
    /// The file is `<dir>/inbox_messages_<instance_id>.json`.
    pub fn for_instance(dir: &Path, instance_id: &str) -> Self {
        Self::new(dir.join(format!("{}_{}.json", CACHE_FILE_PREFIX, instance_id)))
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CacheStore for JsonFileStore {
    fn load(&self) -> Result<SyncSnapshot, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No cache at {}, starting empty", self.path.display());
                return Ok(SyncSnapshot::empty());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let snapshot = SyncSnapshot::from_json(&contents).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        if !snapshot.is_known_version() {
            tracing::warn!(
                "Cache {} has format version {}, reading it as version 1",
                self.path.display(),
                snapshot.version
            );
        }

        Ok(snapshot)
    }

    fn save(&self, snapshot: &SyncSnapshot) -> Result<(), StoreError> {
        let json = snapshot.to_json().map_err(StoreError::Encode)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let temp = self.temp_path();
        let written = std::fs::write(&temp, json)
            .and_then(|()| set_file_permissions_0600(&temp))
            .and_then(|()| std::fs::rename(&temp, &self.path));
        if let Err(e) = written {
            // Never leave a partial temp file next to the cache.
            let _ = std::fs::remove_file(&temp);
            return Err(self.io_error(e));
        }

        tracing::debug!(
            "Saved {} messages to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Set file permissions to 0600 (owner read/write only) on Unix.
/// No-op on non-Unix platforms.
fn set_file_permissions_0600(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use inbox_sync_types::{FetchedMessage, MessageRecord};
    use tempfile::tempdir;

    fn snapshot_with(ids: &[&str]) -> SyncSnapshot {
        let ts = Utc.with_ymd_and_hms(2024, 1, 8, 7, 45, 0).unwrap();
        SyncSnapshot::new(
            ids.iter()
                .map(|id| MessageRecord::from_fetched(FetchedMessage::new(*id, "s", "x", ts), None))
                .collect(),
        )
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::for_instance(dir.path(), "acct");

        let snapshot = store.load().unwrap();
        assert!(snapshot.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::for_instance(dir.path(), "acct");
        let snapshot = snapshot_with(&["2", "1"]);

        store.save(&snapshot).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, snapshot);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn file_name_includes_instance_id() {
        let store = JsonFileStore::for_instance(Path::new("/var/cache"), "entry42");
        assert_eq!(
            store.path(),
            Path::new("/var/cache/inbox_messages_entry42.json")
        );
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/deeper/cache.json"));

        store.save(&snapshot_with(&["1"])).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn failed_save_removes_temp_file() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cache.json"));
        // A non-empty directory at the cache path makes the rename fail
        std::fs::create_dir(store.path()).unwrap();
        std::fs::write(store.path().join("keep"), "").unwrap();

        assert!(matches!(
            store.save(&snapshot_with(&["1"])),
            Err(StoreError::Io { .. })
        ));
        assert!(!store.temp_path().exists());
        assert!(store.path().is_dir());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::for_instance(dir.path(), "acct");
        std::fs::write(store.path(), "{ not json").unwrap();

        let result = store.load();
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn loads_cache_without_version_field() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::for_instance(dir.path(), "acct");
        std::fs::write(
            store.path(),
            r#"{"messages": [{"id": 1, "subject": "Hi", "sender": "Office",
                "timestamp": "2024-01-08T07:45:00+02:00", "unread": true}]}"#,
        )
        .unwrap();

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            snapshot.messages[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 8, 5, 45, 0).unwrap()
        );
    }

    #[cfg(unix)]
    #[test]
    fn cache_file_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let store = JsonFileStore::for_instance(dir.path(), "acct");
        store.save(&snapshot_with(&["1"])).unwrap();

        let perms = std::fs::metadata(store.path()).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600, "file should be 0600");
    }
}
