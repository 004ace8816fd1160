//! In-memory cache store for testing.

use std::sync::{Arc, Mutex};

use inbox_sync_types::SyncSnapshot;

use super::{CacheStore, StoreError};

/// In-memory cache store for testing.
///
/// Not persistent - all data is lost when the store is dropped. Clones
/// share state, so a test can keep a handle to inspect what the engine
/// saved.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    snapshot: Option<SyncSnapshot>,
    saves: usize,
    fail_next_load: Option<String>,
    fail_next_save: Option<String>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a snapshot.
    pub fn with_snapshot(snapshot: SyncSnapshot) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().snapshot = Some(snapshot);
        store
    }

    /// The currently stored snapshot, if any was ever stored.
    pub fn snapshot(&self) -> Option<SyncSnapshot> {
        self.inner.lock().unwrap().snapshot.clone()
    }

    /// Number of successful `save()` calls.
    pub fn save_count(&self) -> usize {
        self.inner.lock().unwrap().saves
    }

    /// Cause the next `load()` to fail.
    pub fn fail_next_load(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_load = Some(error.to_string());
    }

    /// Cause the next `save()` to fail.
    pub fn fail_next_save(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_save = Some(error.to_string());
    }
}

impl CacheStore for MemoryStore {
    fn load(&self) -> Result<SyncSnapshot, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_load.take() {
            return Err(StoreError::Other(error));
        }
        Ok(inner.snapshot.clone().unwrap_or_default())
    }

    fn save(&self, snapshot: &SyncSnapshot) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_save.take() {
            return Err(StoreError::Other(error));
        }
        inner.snapshot = Some(snapshot.clone());
        inner.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_starts_empty() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());
        assert!(store.snapshot().is_none());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn memory_store_save_load() {
        let store = MemoryStore::new();
        let snapshot = SyncSnapshot::empty();

        store.save(&snapshot).unwrap();

        assert_eq!(store.load().unwrap(), snapshot);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryStore::new();
        let observer = store.clone();

        store.save(&SyncSnapshot::empty()).unwrap();
        assert_eq!(observer.save_count(), 1);
    }

    #[test]
    fn forced_failures_apply_once() {
        let store = MemoryStore::new();
        store.fail_next_save("disk full");
        store.fail_next_load("unreadable");

        assert!(matches!(store.save(&SyncSnapshot::empty()), Err(StoreError::Other(_))));
        assert!(matches!(store.load(), Err(StoreError::Other(_))));
        assert!(store.save(&SyncSnapshot::empty()).is_ok());
        assert!(store.load().is_ok());
    }
}
