//! Session lifecycle state machine for inbox-sync.
//!
//! This module provides a pure, side-effect-free state machine for the
//! lifecycle of one sync instance. The state machine takes events as input
//! and produces a new state plus a list of actions to execute.
//!
//! The actual I/O (closing a remote session) is performed by sync-client,
//! not by this module.
//!
//! ```text
//!                 LoginSucceeded
//! Unauthenticated ──────────────▶ Authenticated
//!        ▲  │                        │   │
//!        │  │   AuthenticationFailed │   │
//!        │  │   SessionClosed        │   │
//!        │  └────────────────────────┘   │
//!        │ Shutdown                      │ Shutdown
//!        ▼                               ▼
//!      Closed ◀──────────────────────────┘   (terminal)
//! ```

/// Lifecycle state machine - NO I/O, just state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No authenticated session; the next cycle logs in.
    Unauthenticated,
    /// Holding an authenticated session handle.
    Authenticated,
    /// Torn down. No further cycles may run.
    Closed,
}

impl LifecycleState {
    /// Create a new state machine in the Unauthenticated state.
    pub fn new() -> Self {
        Self::Unauthenticated
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller (sync-client)
    /// is responsible for executing the returned actions.
    pub fn on_event(self, event: Event) -> (Self, Vec<Action>) {
        match (self, event) {
            // Closed is terminal
            (Self::Closed, _) => (Self::Closed, vec![]),

            // From Unauthenticated
            (Self::Unauthenticated, Event::LoginSucceeded) => (Self::Authenticated, vec![]),
            (Self::Unauthenticated, Event::AuthenticationFailed) => {
                (Self::Unauthenticated, vec![Action::DropSession])
            }
            (Self::Unauthenticated, Event::Shutdown) => (Self::Closed, vec![]),

            // From Authenticated
            (Self::Authenticated, Event::AuthenticationFailed) => {
                (Self::Unauthenticated, vec![Action::DropSession])
            }
            (Self::Authenticated, Event::SessionClosed) => {
                (Self::Unauthenticated, vec![Action::ReleaseSession])
            }
            (Self::Authenticated, Event::Shutdown) => (Self::Closed, vec![Action::ReleaseSession]),

            // Invalid transitions - stay in current state
            (state, _) => (state, vec![]),
        }
    }

    /// Check if a session handle is held.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }

    /// Check if the instance has been torn down.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::new()
    }
}

/// Events that can occur in the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Login with the stored credentials succeeded.
    LoginSucceeded,
    /// The source rejected the credentials or the session.
    AuthenticationFailed,
    /// The host asked to release the session but keep the instance.
    SessionClosed,
    /// The host tore the instance down.
    Shutdown,
}

/// Actions to be executed by the sync-client.
///
/// These are instructions, not side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Forget the session handle without contacting the source.
    DropSession,
    /// Close the session handle at the source (best-effort), then forget it.
    ReleaseSession,
}
