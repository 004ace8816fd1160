//! SyncEngine - one incremental sync cycle.
//!
//! This module provides [`SyncEngine`], which runs a single cycle against a
//! [`MessageSource`] and a [`CacheStore`].
//!
//! # Architecture
//!
//! The engine uses pure functions from sync-core for the cycle logic and
//! performs the actual I/O through the source and store traits.
//!
//! ```text
//! SyncInstance → SyncEngine → MessageSource → Network
//!                    ↓    ↘
//!                    ↓     CacheStore → Disk
//!              sync-core (cursor, merge, views)
//! ```
//!
//! A cycle loads the cache, computes the fetch cursor, logs in if needed,
//! fetches, merges, persists (only when something was added) and records
//! the sync instant. A failing step aborts the cycle before the cache is
//! written.

use chrono::{DateTime, Duration, Utc};
use inbox_sync_core::{
    build_views, default_bootstrap_window, fetch_cursor, merge, CursorOrigin, DerivedViews, Event,
    FetchCursor,
};
use inbox_sync_types::{Credentials, SyncSnapshot};

use crate::error::SyncFailure;
use crate::session::SyncSession;
use crate::source::{MessageSource, SourceError};
use crate::store::CacheStore;

/// Tunables for a sync engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How far back the first fetch of an empty cache reaches.
    pub bootstrap_window: Duration,
    /// Request HTML bodies with each fetch.
    pub with_content: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bootstrap_window: default_bootstrap_window(),
            with_content: true,
        }
    }
}

impl EngineConfig {
    /// Set the bootstrap window.
    pub fn with_bootstrap_window(mut self, window: Duration) -> Self {
        self.bootstrap_window = window;
        self
    }
}

/// The result of a successful cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// The cache after the cycle (unchanged if nothing was added).
    pub snapshot: SyncSnapshot,
    /// Views over `snapshot`.
    pub views: DerivedViews,
    /// The cursor the fetch used.
    pub cursor: FetchCursor,
    /// Number of messages the source returned.
    pub fetched: usize,
    /// Number of messages added to the cache.
    pub added: usize,
    /// Number of fetched messages dropped as already cached.
    pub duplicates: usize,
    /// Whether the cache was rewritten.
    pub persisted: bool,
    /// When the cycle completed.
    pub completed_at: DateTime<Utc>,
}

/// Runs sync cycles for one account.
pub struct SyncEngine<S: MessageSource, C: CacheStore> {
    source: S,
    store: C,
    credentials: Credentials,
    config: EngineConfig,
}

impl<S: MessageSource, C: CacheStore> SyncEngine<S, C> {
    /// Create an engine with the default configuration.
    pub fn new(source: S, store: C, credentials: Credentials) -> Self {
        Self {
            source,
            store,
            credentials,
            config: EngineConfig::default(),
        }
    }

    /// Replace the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one sync cycle.
    ///
    /// On failure the cache is left untouched. An authentication failure
    /// clears the session handle so the next cycle logs in again; any other
    /// failure keeps it.
    pub async fn run_cycle(
        &self,
        session: &mut SyncSession<S::Session>,
    ) -> Result<CycleReport, SyncFailure> {
        if session.state().is_closed() {
            return Err(SyncFailure::Unexpected("sync instance is closed".into()));
        }

        let snapshot = self.store.load().map_err(|e| {
            tracing::error!("Failed to load message cache: {}", e);
            SyncFailure::from(e)
        })?;

        let cursor = fetch_cursor(&snapshot.messages, Utc::now(), self.config.bootstrap_window);
        match cursor.origin {
            CursorOrigin::NewestCached => {
                tracing::debug!("Fetching messages after: {}", cursor.after)
            }
            CursorOrigin::Bootstrap => tracing::debug!(
                "No cached messages, fetching messages from bootstrap window: {}",
                cursor.after
            ),
        }

        if session.handle().is_none() {
            tracing::debug!(
                "Connecting to {} as {}",
                self.credentials.server_url,
                self.credentials.username
            );
            match self.source.authenticate(&self.credentials).await {
                Ok(handle) => session.logged_in(handle),
                Err(e) => return Err(source_failure(session, e)),
            }
        }

        let result = match session.handle() {
            Some(handle) => {
                self.source
                    .fetch_messages(handle, cursor.after, self.config.with_content)
                    .await
            }
            None => return Err(SyncFailure::Unexpected("no session after login".into())),
        };
        let fetched = result.map_err(|e| source_failure(session, e))?;

        let fetched_count = fetched.len();
        tracing::debug!("Fetched {} messages", fetched_count);

        let outcome = merge(&snapshot.messages, fetched);
        for id in &outcome.markdown_failures {
            tracing::warn!("Could not render body of message {} as markdown", id);
        }
        if outcome.duplicates > 0 {
            tracing::warn!(
                "Dropped {} fetched messages that were already cached",
                outcome.duplicates
            );
        }
        if outcome.repaired > 0 {
            tracing::warn!(
                "Dropped {} cached messages with repeated ids",
                outcome.repaired
            );
        }

        let added = outcome.added;
        let duplicates = outcome.duplicates;
        let persisted = outcome.changed();
        let snapshot = if persisted {
            let updated = SyncSnapshot::new(outcome.messages);
            self.store.save(&updated).map_err(|e| {
                tracing::error!("Failed to save message cache: {}", e);
                SyncFailure::from(e)
            })?;
            updated
        } else {
            snapshot
        };

        let completed_at = Utc::now();
        session.synced_at(completed_at);
        let views = build_views(&snapshot.messages, session.last_sync());

        tracing::info!(
            "Sync cycle complete: {} fetched, {} added, {} cached",
            fetched_count,
            added,
            snapshot.len()
        );

        Ok(CycleReport {
            snapshot,
            views,
            cursor,
            fetched: fetched_count,
            added,
            duplicates,
            persisted,
            completed_at,
        })
    }

    /// Feed a lifecycle event to the session and close the released handle
    /// at the source, if any.
    ///
    /// Closing is best-effort: a failure is logged and the session still
    /// transitions.
    pub async fn release(&self, session: &mut SyncSession<S::Session>, event: Event) {
        if let Some(handle) = session.apply(event) {
            if let Err(e) = self.source.close(handle).await {
                tracing::error!("Error closing source session: {}", e);
            }
        }
    }

    /// Load the cached snapshot without contacting the source.
    pub fn cached(&self) -> Result<SyncSnapshot, SyncFailure> {
        Ok(self.store.load()?)
    }

}

/// Classify a source error, dropping the session on authentication failure.
fn source_failure<H>(session: &mut SyncSession<H>, err: SourceError) -> SyncFailure {
    if err.is_authentication() {
        tracing::error!("Authentication failed: {}", err);
        let _ = session.apply(Event::AuthenticationFailed);
    } else if err.is_transient() {
        tracing::error!("Error communicating with source: {}", err);
    } else {
        tracing::error!("Unexpected error from source: {}", err);
    }
    SyncFailure::from(err)
}
