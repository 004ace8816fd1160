//! Fetch-since cursor for inbox-sync.
//!
//! The cursor is the timestamp boundary for the next fetch: only messages
//! strictly newer than it are requested. It is derived from the cached
//! message set rather than stored separately:
//! - Non-empty cache: timestamp of the newest record.
//! - Empty cache: `now` minus the bootstrap window (7 days by default).
//!
//! The bootstrap window is a policy choice. A first sync after a long gap
//! does not see messages older than the window.

use chrono::{DateTime, Duration, Utc};
use inbox_sync_types::MessageRecord;

/// Default bootstrap window in days.
pub const BOOTSTRAP_DAYS: i64 = 7;

/// The default bootstrap window as a duration.
pub fn default_bootstrap_window() -> Duration {
    Duration::days(BOOTSTRAP_DAYS)
}

/// Where a cursor value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorOrigin {
    /// Timestamp of the newest cached record.
    NewestCached,
    /// `now` minus the bootstrap window (empty cache).
    Bootstrap,
}

/// A computed fetch-since boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCursor {
    /// Fetch messages strictly newer than this instant.
    pub after: DateTime<Utc>,
    /// How the boundary was chosen.
    pub origin: CursorOrigin,
}

/// Compute the cursor for the next fetch.
///
/// `messages` must be ordered newest-first. A window reaching past the
/// earliest representable instant saturates there.
pub fn fetch_cursor(
    messages: &[MessageRecord],
    now: DateTime<Utc>,
    bootstrap_window: Duration,
) -> FetchCursor {
    match messages.first() {
        Some(newest) => FetchCursor {
            after: newest.timestamp,
            origin: CursorOrigin::NewestCached,
        },
        None => FetchCursor {
            after: now
                .checked_sub_signed(bootstrap_window)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            origin: CursorOrigin::Bootstrap,
        },
    }
}
