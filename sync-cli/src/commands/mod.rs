//! CLI command implementations.

pub mod status;
pub mod sync;
pub mod watch;

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Local, Utc};
use std::path::PathBuf;
use std::sync::Arc;

use inbox_sync_client::{JsonFileStore, MockSource, SyncEngine, SyncInstance};
use inbox_sync_core::DerivedViews;
use inbox_sync_types::{FetchedMessage, MessageRecord};

use crate::config::{AccountConfig, Config};

/// Instance type the CLI runs.
pub type CliInstance = SyncInstance<MockSource, JsonFileStore>;

/// Resolved settings shared by all commands.
#[derive(Debug)]
pub struct Host {
    /// Loaded configuration.
    pub config: Config,
    /// Directory of the cache files.
    pub cache_dir: PathBuf,
    /// Use the demo source.
    pub mock: bool,
}

impl Host {
    /// Cache store of one account.
    pub fn store(&self, account: &AccountConfig) -> JsonFileStore {
        JsonFileStore::for_instance(&self.cache_dir, &account.id)
    }

    /// Build the sync instance of one account.
    pub fn instance(&self, account: &AccountConfig) -> Result<Arc<CliInstance>> {
        if !self.mock {
            bail!(
                "No remote message source is built into this binary. \
                 Run with --mock to sync against the demo source."
            );
        }

        let engine = SyncEngine::new(demo_source(), self.store(account), account.credentials())
            .with_config(self.config.sync.engine());
        Ok(Arc::new(SyncInstance::new(account.id.clone(), engine)))
    }
}

/// A mock source seeded with a small demo inbox.
///
/// Timestamps are relative to now; the oldest message lies outside the
/// default bootstrap window and is never fetched into an empty cache.
pub fn demo_source() -> MockSource {
    let now = Utc::now();
    let source = MockSource::new();
    source.add_message(
        FetchedMessage::new(1001u64, "Parents evening", "Principal", now - Duration::hours(2))
            .unread(true)
            .with_html("<p>Join us on <b>Thursday</b> at 18:00 in the main hall.</p>"),
    );
    source.add_message(
        FetchedMessage::new(1000u64, "Lunch menu for the week", "Kitchen", now - Duration::hours(26))
            .with_html("<ul><li>Monday: pasta</li><li>Tuesday: salmon soup</li></ul>"),
    );
    source.add_message(
        FetchedMessage::new(999u64, "Field trip permission", "Homeroom", now - Duration::days(3))
            .unread(true),
    );
    source.add_message(FetchedMessage::new(
        900u64,
        "Term start",
        "Office",
        now - Duration::days(10),
    ));
    source
}

/// Format a timestamp in local time.
pub fn format_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn message_line(message: &MessageRecord) -> String {
    format!(
        "{} (from {}, {}, id {})",
        message.subject,
        message.sender,
        format_time(message.timestamp),
        message.id
    )
}

/// Print derived views the way a dashboard sensor would show them.
pub fn print_views(id: &str, views: &DerivedViews) {
    println!("[{}]", id);
    match views.last_sync {
        Some(at) => println!("  Last sync:     {}", format_time(at)),
        None => println!("  Last sync:     not recorded"),
    }
    match &views.latest_message {
        Some(message) => println!("  Latest:        {}", message_line(message)),
        None => println!("  Latest:        none"),
    }
    match &views.latest_unread_message {
        Some(message) => println!("  Latest unread: {}", message_line(message)),
        None => println!("  Latest unread: none"),
    }
}

/// Print the body of a message, indented.
pub fn print_content(message: &MessageRecord) {
    if let Some(markdown) = &message.content_markdown {
        for line in markdown.lines() {
            println!("    | {}", line);
        }
    }
}
