//! Message records.
//!
//! A [`FetchedMessage`] is what the remote source hands back for one
//! message. Once merged into the cache it becomes a [`MessageRecord`], which
//! additionally carries the markdown rendering of its HTML body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::MessageId;

/// A message as returned by the remote source.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedMessage {
    /// Source-assigned identifier.
    pub id: MessageId,
    /// Subject line.
    pub subject: String,
    /// Sender display name.
    pub sender: String,
    /// Source-assigned send time, used as the ordering key.
    pub timestamp: DateTime<Utc>,
    /// Inbox read state at fetch time. Never refreshed afterwards.
    pub unread: bool,
    /// HTML body, when content was requested and present.
    #[serde(default)]
    pub content_html: Option<String>,
}

impl FetchedMessage {
    /// Create a fetched message without body content.
    pub fn new(
        id: impl Into<MessageId>,
        subject: impl Into<String>,
        sender: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            sender: sender.into(),
            timestamp,
            unread: false,
            content_html: None,
        }
    }

    /// Mark the message as unread.
    pub fn unread(mut self, unread: bool) -> Self {
        self.unread = unread;
        self
    }

    /// Attach an HTML body.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.content_html = Some(html.into());
        self
    }
}

impl fmt::Debug for FetchedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchedMessage")
            .field("id", &self.id)
            .field("subject", &self.subject)
            .field("timestamp", &self.timestamp)
            .field("unread", &self.unread)
            .field("content_html", &body_summary(&self.content_html))
            .finish()
    }
}

/// A message as held in the local cache.
///
/// Records are immutable once stored: a later sync never updates the read
/// state or body of a record that is already cached.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Source-assigned identifier.
    pub id: MessageId,
    /// Subject line.
    pub subject: String,
    /// Sender display name.
    pub sender: String,
    /// Source-assigned send time, used as the ordering key.
    pub timestamp: DateTime<Utc>,
    /// Inbox read state at fetch time.
    #[serde(default)]
    pub unread: bool,
    /// HTML body.
    #[serde(default)]
    pub content_html: Option<String>,
    /// Markdown rendering of `content_html`.
    #[serde(default)]
    pub content_markdown: Option<String>,
}

impl MessageRecord {
    /// Build a cache record from a fetched message and its derived markdown.
    pub fn from_fetched(message: FetchedMessage, content_markdown: Option<String>) -> Self {
        Self {
            id: message.id,
            subject: message.subject,
            sender: message.sender,
            timestamp: message.timestamp,
            unread: message.unread,
            content_html: message.content_html,
            content_markdown,
        }
    }
}

impl fmt::Debug for MessageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRecord")
            .field("id", &self.id)
            .field("subject", &self.subject)
            .field("timestamp", &self.timestamp)
            .field("unread", &self.unread)
            .field("content_html", &body_summary(&self.content_html))
            .field("content_markdown", &body_summary(&self.content_markdown))
            .finish()
    }
}

fn body_summary(body: &Option<String>) -> String {
    match body {
        Some(text) => format!("[{} bytes]", text.len()),
        None => "none".to_string(),
    }
}
