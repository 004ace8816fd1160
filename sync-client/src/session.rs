//! Transient session state of one sync instance.

use chrono::{DateTime, Utc};
use inbox_sync_core::{Action, Event, LifecycleState};

/// In-memory session state: the authenticated handle (if any), the last
/// successful sync instant and the lifecycle state.
///
/// Never persisted.
#[derive(Debug)]
pub struct SyncSession<H> {
    handle: Option<H>,
    last_sync: Option<DateTime<Utc>>,
    state: LifecycleState,
}

impl<H> SyncSession<H> {
    /// Create an unauthenticated session that has never synced.
    pub fn new() -> Self {
        Self {
            handle: None,
            last_sync: None,
            state: LifecycleState::new(),
        }
    }

    /// The authenticated handle, if one is held.
    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    /// When the last successful cycle completed.
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.last_sync
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Store a freshly authenticated handle.
    pub(crate) fn logged_in(&mut self, handle: H) {
        let (state, _actions) = self.state.on_event(Event::LoginSucceeded);
        self.state = state;
        self.handle = Some(handle);
    }

    /// Record a successful cycle.
    pub(crate) fn synced_at(&mut self, at: DateTime<Utc>) {
        self.last_sync = Some(at);
    }

    /// Feed a lifecycle event and execute the resulting actions.
    ///
    /// Returns the handle when it must be released at the source; the caller
    /// performs that I/O.
    pub(crate) fn apply(&mut self, event: Event) -> Option<H> {
        let (state, actions) = self.state.on_event(event);
        self.state = state;

        let mut release = None;
        for action in actions {
            match action {
                Action::DropSession => {
                    self.handle = None;
                }
                Action::ReleaseSession => {
                    release = self.handle.take();
                }
            }
        }
        release
    }
}

impl<H> Default for SyncSession<H> {
    fn default() -> Self {
        Self::new()
    }
}
