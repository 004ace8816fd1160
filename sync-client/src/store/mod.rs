//! Durable cache storage.
//!
//! This module provides a trait for loading and saving the [`SyncSnapshot`]
//! of one sync instance, plus a JSON file implementation and a memory-based
//! implementation for testing.
//!
//! Load and save are synchronous: they are fast, local steps of a cycle and
//! never suspend it.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use inbox_sync_types::{SnapshotError, SyncSnapshot};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the cache failed.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// Path of the cache file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The cache file exists but cannot be decoded.
    #[error("corrupt cache at {path}: {source}")]
    Corrupt {
        /// Path of the cache file.
        path: PathBuf,
        /// Underlying decode error.
        source: SnapshotError,
    },

    /// The snapshot could not be encoded.
    #[error("snapshot encoding failed: {0}")]
    Encode(#[source] SnapshotError),

    /// Store operation failed for another reason.
    #[error("store error: {0}")]
    Other(String),
}

/// Trait for the durable cache of one sync instance.
pub trait CacheStore: Send + Sync {
    /// Load the persisted snapshot.
    ///
    /// Returns an empty snapshot if nothing has been persisted yet.
    fn load(&self) -> Result<SyncSnapshot, StoreError>;

    /// Replace the persisted snapshot.
    fn save(&self, snapshot: &SyncSnapshot) -> Result<(), StoreError>;
}
