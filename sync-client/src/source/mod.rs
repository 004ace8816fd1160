//! Remote source abstraction for inbox-sync.
//!
//! This module abstracts the remote messaging service (HTTP session,
//! mock for testing). The sync engine only depends on this contract.
//!
//! # Design
//!
//! The source trait is async and session-oriented:
//! - `authenticate()` logs in and returns a session handle
//! - `fetch_messages()` returns messages strictly newer than a timestamp
//! - `close()` releases the session
//!
//! Request timeouts are the source's concern; it reports them as
//! [`SourceError::Timeout`].

mod mock;

pub use mock::{MockSession, MockSource};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use inbox_sync_types::{Credentials, FetchedMessage};
use thiserror::Error;

/// Source errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Credentials or session were rejected.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The service could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The service answered with something unexpected.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A request timed out.
    #[error("request timed out")]
    Timeout,

    /// Anything the source could not categorize.
    #[error("{0}")]
    Other(String),
}

impl SourceError {
    /// Whether this is a credentials/session rejection.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Whether this is a transient transport or protocol problem.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Protocol(_) | Self::Timeout)
    }
}

/// Contract of the remote messaging service.
///
/// Implementations handle the underlying transport (HTTP session, mock, etc).
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Authenticated session handle.
    type Session: Send + Sync;

    /// Log in with the given credentials.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Self::Session, SourceError>;

    /// Fetch messages strictly newer than `after`.
    ///
    /// With `with_content` set, HTML bodies are included.
    async fn fetch_messages(
        &self,
        session: &Self::Session,
        after: DateTime<Utc>,
        with_content: bool,
    ) -> Result<Vec<FetchedMessage>, SourceError>;

    /// Release a session.
    async fn close(&self, session: Self::Session) -> Result<(), SourceError>;
}
