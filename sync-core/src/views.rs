//! Derived views over the cached message set.
//!
//! Views are recomputed from the merged set after every cycle and are never
//! persisted.

use chrono::{DateTime, Utc};
use inbox_sync_types::MessageRecord;
use serde::Serialize;

/// Summary facts handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivedViews {
    /// The newest cached message.
    pub latest_message: Option<MessageRecord>,
    /// The newest cached message that was unread when fetched.
    ///
    /// Not necessarily the same record as `latest_message`.
    pub latest_unread_message: Option<MessageRecord>,
    /// When the last successful sync cycle completed.
    pub last_sync: Option<DateTime<Utc>>,
}

impl DerivedViews {
    /// Subject of the latest message, the primary value shown to users.
    pub fn latest_subject(&self) -> Option<&str> {
        self.latest_message.as_ref().map(|m| m.subject.as_str())
    }
}

/// Build the views for a newest-first message set.
///
/// `last_sync` is passed through from the session. Safe on an empty set.
pub fn build_views(messages: &[MessageRecord], last_sync: Option<DateTime<Utc>>) -> DerivedViews {
    DerivedViews {
        latest_message: messages.first().cloned(),
        latest_unread_message: messages.iter().find(|m| m.unread).cloned(),
        last_sync,
    }
}
