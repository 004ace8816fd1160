//! # sync-core
//!
//! Pure logic for inbox-sync (no I/O, instant tests).
//!
//! This crate implements the algorithms of one sync cycle and the session
//! lifecycle state machine without any network or disk I/O.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output, the clock is a parameter)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (remote source, cache file) is performed by `sync-client`,
//! which feeds these functions and interprets the actions they return.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod content;
pub mod cursor;
pub mod lifecycle;
pub mod merge;
pub mod views;

pub use content::{derive_markdown, html_to_markdown, ContentError, MARKDOWN_WIDTH};
pub use cursor::{default_bootstrap_window, fetch_cursor, CursorOrigin, FetchCursor, BOOTSTRAP_DAYS};
pub use lifecycle::{Action, Event, LifecycleState};
pub use merge::{merge, MergeOutcome};
pub use views::{build_views, DerivedViews};
