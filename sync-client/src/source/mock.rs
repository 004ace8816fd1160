//! Mock message source for testing.
//!
//! Holds an in-memory mailbox, allows forcing failures and records every
//! call for verification.

use super::{MessageSource, SourceError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use inbox_sync_types::{Credentials, FetchedMessage};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Session handle issued by [`MockSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockSession {
    /// Sequence number of the login that produced this session.
    pub login: u32,
    /// User that logged in.
    pub username: String,
}

/// Mock message source for testing.
///
/// `fetch_messages` returns the next queued batch verbatim if one is
/// queued, otherwise every mailbox message strictly newer than `after`,
/// newest first. Clones share state.
#[derive(Debug, Default, Clone)]
pub struct MockSource {
    inner: Arc<Mutex<MockSourceInner>>,
}

#[derive(Debug, Default)]
struct MockSourceInner {
    mailbox: Vec<FetchedMessage>,
    batch_queue: VecDeque<Vec<FetchedMessage>>,
    logins: u32,
    closed: Vec<MockSession>,
    fetch_calls: Vec<(DateTime<Utc>, bool)>,
    fail_next_authenticate: Option<SourceError>,
    fail_next_fetch: Option<SourceError>,
    fail_next_close: Option<String>,
    fetch_delay: Option<Duration>,
}

impl MockSource {
    /// Create a new mock source with an empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message to the mailbox.
    pub fn add_message(&self, message: FetchedMessage) {
        let mut inner = self.inner.lock().unwrap();
        inner.mailbox.push(message);
    }

    /// Queue a batch to be returned by the next `fetch_messages()` call,
    /// regardless of the requested cursor.
    pub fn queue_batch(&self, batch: Vec<FetchedMessage>) {
        let mut inner = self.inner.lock().unwrap();
        inner.batch_queue.push_back(batch);
    }

    /// Cause the next `authenticate()` to fail with the given error.
    pub fn fail_next_authenticate(&self, error: SourceError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_authenticate = Some(error);
    }

    /// Cause the next `fetch_messages()` to fail with the given error.
    pub fn fail_next_fetch(&self, error: SourceError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_fetch = Some(error);
    }

    /// Cause the next `close()` to fail with the given message.
    pub fn fail_next_close(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_close = Some(error.to_string());
    }

    /// Make every `fetch_messages()` call sleep before answering.
    pub fn set_fetch_delay(&self, delay: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.fetch_delay = Some(delay);
    }

    /// Number of successful logins.
    pub fn login_count(&self) -> u32 {
        self.inner.lock().unwrap().logins
    }

    /// Number of `fetch_messages()` calls, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.inner.lock().unwrap().fetch_calls.len()
    }

    /// The `after` and `with_content` arguments of the last fetch.
    pub fn last_fetch(&self) -> Option<(DateTime<Utc>, bool)> {
        self.inner.lock().unwrap().fetch_calls.last().copied()
    }

    /// Sessions passed to `close()`, including failed closes.
    pub fn closed_sessions(&self) -> Vec<MockSession> {
        self.inner.lock().unwrap().closed.clone()
    }
}

#[async_trait]
impl MessageSource for MockSource {
    type Session = MockSession;

    async fn authenticate(&self, credentials: &Credentials) -> Result<MockSession, SourceError> {
        let mut inner = self.inner.lock().unwrap();

        // Check for forced failure
        if let Some(error) = inner.fail_next_authenticate.take() {
            return Err(error);
        }

        inner.logins += 1;
        Ok(MockSession {
            login: inner.logins,
            username: credentials.username.clone(),
        })
    }

    async fn fetch_messages(
        &self,
        _session: &MockSession,
        after: DateTime<Utc>,
        with_content: bool,
    ) -> Result<Vec<FetchedMessage>, SourceError> {
        let delay = {
            let mut inner = self.inner.lock().unwrap();
            inner.fetch_calls.push((after, with_content));
            inner.fetch_delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.lock().unwrap();

        // Check for forced failure
        if let Some(error) = inner.fail_next_fetch.take() {
            return Err(error);
        }

        if let Some(batch) = inner.batch_queue.pop_front() {
            return Ok(batch);
        }

        let mut messages: Vec<FetchedMessage> = inner
            .mailbox
            .iter()
            .filter(|m| m.timestamp > after)
            .cloned()
            .map(|mut m| {
                if !with_content {
                    m.content_html = None;
                }
                m
            })
            .collect();
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(messages)
    }

    async fn close(&self, session: MockSession) -> Result<(), SourceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.closed.push(session);

        if let Some(error) = inner.fail_next_close.take() {
            return Err(SourceError::Connection(error));
        }
        Ok(())
    }
}
