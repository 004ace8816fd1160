//! # sync-types
//!
//! Data model for inbox-sync.
//!
//! This crate provides the foundational types used across all inbox-sync crates:
//! - [`MessageId`] - Source-assigned message identity
//! - [`FetchedMessage`], [`MessageRecord`] - Messages as fetched and as cached
//! - [`SyncSnapshot`] - The versioned, persisted message set
//! - [`Credentials`] - Account credentials handed to the remote source
//! - [`SnapshotError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod credentials;
mod error;
mod ids;
mod messages;
mod snapshot;

pub use credentials::Credentials;
pub use error::SnapshotError;
pub use ids::MessageId;
pub use messages::{FetchedMessage, MessageRecord};
pub use snapshot::{SyncSnapshot, SNAPSHOT_VERSION};
