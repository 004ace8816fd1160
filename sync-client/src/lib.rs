//! # sync-client
//!
//! Incremental message sync for inbox-sync.
//!
//! This is the library that hosts embed to keep a local message cache in
//! step with a remote messaging service.
//!
//! ## Features
//!
//! - **Incremental fetch**: only messages newer than the newest cached one
//! - **Durable cache**: versioned JSON snapshot, written atomically
//! - **Source Abstraction**: pluggable remote source (mock for tests and demos)
//! - **Pure Core**: cursor, merge and views come from sync-core
//! - **Single-flight scheduling**: periodic, startup and manual triggers
//!
//! ## Example
//!
//! ```ignore
//! use inbox_sync_client::{spawn_scheduler, JsonFileStore, MockSource, ScheduleConfig, SyncEngine, SyncInstance};
//!
//! let store = JsonFileStore::for_instance(&cache_dir, "school");
//! let engine = SyncEngine::new(MockSource::new(), store, credentials);
//! let instance = Arc::new(SyncInstance::new("school", engine));
//!
//! let scheduler = spawn_scheduler(instance.clone(), ScheduleConfig::default());
//! scheduler.refresh().await;
//! println!("{:?}", instance.status().views.latest_message);
//! scheduler.shutdown().await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod error;
pub mod instance;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod source;
pub mod store;

pub use engine::{CycleReport, EngineConfig, SyncEngine};
pub use error::{FailureKind, SyncFailure};
pub use instance::{SyncInstance, SyncStatus, TriggerOutcome};
pub use registry::InstanceRegistry;
pub use scheduler::{spawn_scheduler, ScheduleConfig, SchedulerHandle, DEFAULT_INTERVAL};
pub use session::SyncSession;
pub use source::{MessageSource, MockSession, MockSource, SourceError};
pub use store::{CacheStore, JsonFileStore, MemoryStore, StoreError};
