//! SyncSnapshot - the persisted unit of the message cache.

use serde::{Deserialize, Serialize};

use crate::{MessageRecord, SnapshotError};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// The full persisted state of the message set at a point in time.
///
/// `messages` is ordered newest-first by timestamp and holds no duplicate
/// ids. The timestamp of the first record is the cursor for the next fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSnapshot {
    /// Format version. Missing in very old caches, read as version 1.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Cached messages, newest first.
    #[serde(default)]
    pub messages: Vec<MessageRecord>,
}

impl SyncSnapshot {
    /// Create an empty snapshot at the current format version.
    pub fn empty() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            messages: Vec::new(),
        }
    }

    /// Create a snapshot holding the given newest-first message set.
    pub fn new(messages: Vec<MessageRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            messages,
        }
    }

    /// The newest cached record, if any.
    pub fn newest(&self) -> Option<&MessageRecord> {
        self.messages.first()
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether the snapshot was written by a format version this build knows.
    pub fn is_known_version(&self) -> bool {
        self.version == SNAPSHOT_VERSION
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(SnapshotError::Serialization)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(SnapshotError::Deserialization)
    }
}

impl Default for SyncSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchedMessage;
    use chrono::{TimeZone, Utc};

    fn record(id: &str) -> MessageRecord {
        let ts = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
        MessageRecord::from_fetched(FetchedMessage::new(id, "Subject", "Sender", ts), None)
    }

    #[test]
    fn empty_snapshot() {
        let snapshot = SyncSnapshot::empty();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert!(snapshot.newest().is_none());
    }

    #[test]
    fn json_roundtrip_preserves_order() {
        let snapshot = SyncSnapshot::new(vec![record("b"), record("a")]);
        let json = snapshot.to_json().unwrap();
        let back = SyncSnapshot::from_json(&json).unwrap();

        assert_eq!(back, snapshot);
        assert_eq!(back.newest().unwrap().id.as_str(), "b");
    }

    #[test]
    fn missing_version_reads_as_version_one() {
        let back = SyncSnapshot::from_json(r#"{"messages": []}"#).unwrap();
        assert_eq!(back.version, 1);
        assert!(back.is_known_version());
    }

    #[test]
    fn unknown_version_still_loads() {
        let back = SyncSnapshot::from_json(r#"{"version": 9, "messages": []}"#).unwrap();
        assert_eq!(back.version, 9);
        assert!(!back.is_known_version());
    }

    #[test]
    fn garbage_is_a_deserialization_error() {
        let err = SyncSnapshot::from_json("not json").unwrap_err();
        assert!(matches!(err, SnapshotError::Deserialization(_)));
    }
}
