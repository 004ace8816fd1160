//! Sync cycle failure taxonomy.
//!
//! Every error inside a cycle is folded into one of three kinds before it
//! leaves the engine. None of them is retried within the cycle; the next
//! scheduled cycle is the retry.

use std::fmt;

use thiserror::Error;

use crate::source::SourceError;
use crate::store::StoreError;

/// The kind of a failed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Credentials rejected. The next cycle logs in again.
    Authentication,
    /// Network or protocol trouble. The session is kept.
    SourceUnavailable,
    /// Anything uncategorized. The session is kept.
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Authentication => "authentication failure",
            Self::SourceUnavailable => "source unavailable",
            Self::Unexpected => "unexpected failure",
        })
    }
}

/// A failed sync cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncFailure {
    /// Credentials rejected.
    #[error("cycle failed: authentication failure, {0}")]
    Authentication(String),

    /// Network or protocol trouble.
    #[error("cycle failed: source unavailable, {0}")]
    SourceUnavailable(String),

    /// Anything uncategorized.
    #[error("cycle failed: unexpected failure, {0}")]
    Unexpected(String),
}

impl SyncFailure {
    /// The failure kind.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Authentication(_) => FailureKind::Authentication,
            Self::SourceUnavailable(_) => FailureKind::SourceUnavailable,
            Self::Unexpected(_) => FailureKind::Unexpected,
        }
    }

    /// The failure detail without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Authentication(d) | Self::SourceUnavailable(d) | Self::Unexpected(d) => d,
        }
    }
}

impl From<SourceError> for SyncFailure {
    fn from(err: SourceError) -> Self {
        if err.is_authentication() {
            Self::Authentication(err.to_string())
        } else if err.is_transient() {
            Self::SourceUnavailable(err.to_string())
        } else {
            Self::Unexpected(err.to_string())
        }
    }
}

impl From<StoreError> for SyncFailure {
    fn from(err: StoreError) -> Self {
        Self::Unexpected(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_kind_and_detail() {
        let failure = SyncFailure::SourceUnavailable("request timed out".into());
        assert_eq!(
            failure.to_string(),
            "cycle failed: source unavailable, request timed out"
        );
        assert_eq!(failure.detail(), "request timed out");
    }

    #[test]
    fn source_errors_are_classified() {
        let auth: SyncFailure = SourceError::Authentication("bad password".into()).into();
        let conn: SyncFailure = SourceError::Connection("refused".into()).into();
        let proto: SyncFailure = SourceError::Protocol("html instead of json".into()).into();
        let timeout: SyncFailure = SourceError::Timeout.into();
        let other: SyncFailure = SourceError::Other("boom".into()).into();

        assert_eq!(auth.kind(), FailureKind::Authentication);
        assert_eq!(conn.kind(), FailureKind::SourceUnavailable);
        assert_eq!(proto.kind(), FailureKind::SourceUnavailable);
        assert_eq!(timeout.kind(), FailureKind::SourceUnavailable);
        assert_eq!(other.kind(), FailureKind::Unexpected);
    }

    #[test]
    fn store_errors_are_unexpected() {
        let failure: SyncFailure = StoreError::Other("disk full".into()).into();
        assert_eq!(failure.kind(), FailureKind::Unexpected);
        assert!(failure.detail().contains("disk full"));
    }

    #[test]
    fn failure_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncFailure>();
    }
}
