//! One configured account: engine, session and published status.
//!
//! Cycles are single-flight. A trigger that arrives while a cycle is running
//! returns [`TriggerOutcome::Coalesced`] without starting a second cycle.
//! Shutdown waits for an in-flight cycle to finish before releasing the
//! session.

use chrono::{DateTime, Utc};
use inbox_sync_core::{DerivedViews, Event, LifecycleState};
use tokio::sync::{watch, Mutex};

use crate::engine::{CycleReport, SyncEngine};
use crate::error::SyncFailure;
use crate::session::SyncSession;
use crate::source::MessageSource;
use crate::store::CacheStore;

/// What presentation sees of an instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncStatus {
    /// Views from the last successful cycle. Kept across failures.
    pub views: DerivedViews,
    /// Whether the last attempted cycle succeeded.
    pub healthy: bool,
    /// The failure of the last attempted cycle, if it failed.
    pub last_error: Option<SyncFailure>,
    /// When the last cycle was attempted.
    pub last_attempt: Option<DateTime<Utc>>,
}

/// Result of [`SyncInstance::trigger`].
#[derive(Debug)]
pub enum TriggerOutcome {
    /// The cycle ran and succeeded.
    Completed(Box<CycleReport>),
    /// The cycle ran and failed.
    Failed(SyncFailure),
    /// A cycle was already running; this trigger was absorbed by it.
    Coalesced,
    /// The instance has been shut down.
    Closed,
}

impl TriggerOutcome {
    /// Whether a cycle ran and succeeded.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// A sync instance for one account.
pub struct SyncInstance<S: MessageSource, C: CacheStore> {
    id: String,
    engine: SyncEngine<S, C>,
    session: Mutex<SyncSession<S::Session>>,
    status: watch::Sender<SyncStatus>,
}

impl<S: MessageSource, C: CacheStore> SyncInstance<S, C> {
    /// Create an instance around an engine.
    pub fn new(id: impl Into<String>, engine: SyncEngine<S, C>) -> Self {
        let (status, _) = watch::channel(SyncStatus::default());
        Self {
            id: id.into(),
            engine,
            session: Mutex::new(SyncSession::new()),
            status,
        }
    }

    /// Instance identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The engine (for testing).
    pub fn engine(&self) -> &SyncEngine<S, C> {
        &self.engine
    }

    /// Run a cycle now, unless one is already running.
    pub async fn trigger(&self) -> TriggerOutcome {
        let Ok(mut session) = self.session.try_lock() else {
            tracing::debug!("[{}] Sync already in progress, trigger coalesced", self.id);
            return TriggerOutcome::Coalesced;
        };

        if session.state().is_closed() {
            tracing::debug!("[{}] Instance closed, trigger ignored", self.id);
            return TriggerOutcome::Closed;
        }

        let attempt = Utc::now();
        match self.engine.run_cycle(&mut session).await {
            Ok(report) => {
                self.status.send_modify(|status| {
                    status.views = report.views.clone();
                    status.healthy = true;
                    status.last_error = None;
                    status.last_attempt = Some(attempt);
                });
                TriggerOutcome::Completed(Box::new(report))
            }
            Err(failure) => {
                tracing::error!("[{}] {}", self.id, failure);
                self.status.send_modify(|status| {
                    status.healthy = false;
                    status.last_error = Some(failure.clone());
                    status.last_attempt = Some(attempt);
                });
                TriggerOutcome::Failed(failure)
            }
        }
    }

    /// Release the current source session. The next cycle logs in again.
    pub async fn close_session(&self) {
        let mut session = self.session.lock().await;
        self.engine.release(&mut session, Event::SessionClosed).await;
        tracing::debug!("[{}] Source session closed", self.id);
    }

    /// Shut the instance down.
    ///
    /// Waits for an in-flight cycle, then releases the session. Idempotent.
    pub async fn shutdown(&self) {
        let mut session = self.session.lock().await;
        if session.state().is_closed() {
            return;
        }
        self.engine.release(&mut session, Event::Shutdown).await;
        tracing::info!("[{}] Sync instance shut down", self.id);
    }

    /// Current lifecycle state. Waits for an in-flight cycle.
    pub async fn state(&self) -> LifecycleState {
        self.session.lock().await.state()
    }

    /// Latest published status.
    pub fn status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }
}
