//! Merging fetched messages into the cached message set.
//!
//! [`merge`] is pure: it takes the current set by reference and returns a
//! new one. Existing records are never modified, and the set of distinct ids
//! only grows. A cache that already repeats an id is collapsed to one record
//! per id.
//!
//! Fetches are "strictly newer than the cursor", so fetched records normally
//! land in front of the existing ones. Clock skew or reordering at the source
//! can still hand back a record that is already cached; those are dropped by
//! id, as are repeats within one batch.

use std::collections::HashSet;

use inbox_sync_types::{FetchedMessage, MessageId, MessageRecord};

use crate::content::derive_markdown;

/// Result of merging one fetched batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The merged set, newest first.
    pub messages: Vec<MessageRecord>,
    /// Number of fetched records that were added.
    pub added: usize,
    /// Number of fetched records dropped because their id was already present.
    pub duplicates: usize,
    /// Number of cached records dropped because an earlier cached record
    /// had the same id.
    pub repaired: usize,
    /// Ids of added records whose HTML body could not be rendered.
    pub markdown_failures: Vec<MessageId>,
}

impl MergeOutcome {
    /// Whether the merge changed the set.
    pub fn changed(&self) -> bool {
        self.added > 0
    }
}

/// Merge a fetched batch into a newest-first message set.
///
/// Markdown is derived for every added record that carries HTML; a failed
/// conversion stores the record without markdown. Ordering is by timestamp,
/// newest first; on equal timestamps fetched records come before cached ones
/// and each side keeps its relative order.
///
/// A cache that already holds repeated ids keeps only the first (newest)
/// record of each id.
pub fn merge(existing: &[MessageRecord], fetched: Vec<FetchedMessage>) -> MergeOutcome {
    let mut seen: HashSet<MessageId> = HashSet::with_capacity(existing.len() + fetched.len());
    let kept: Vec<MessageRecord> = existing
        .iter()
        .filter(|m| seen.insert(m.id.clone()))
        .cloned()
        .collect();
    let repaired = existing.len() - kept.len();

    let mut added_records = Vec::with_capacity(fetched.len());
    let mut duplicates = 0;
    let mut markdown_failures = Vec::new();

    for message in fetched {
        if !seen.insert(message.id.clone()) {
            duplicates += 1;
            continue;
        }

        let markdown = derive_markdown(message.content_html.as_deref());
        if markdown.is_none() && has_body(&message) {
            markdown_failures.push(message.id.clone());
        }
        added_records.push(MessageRecord::from_fetched(message, markdown));
    }

    let added = added_records.len();
    let mut messages = added_records;
    messages.extend(kept);
    // Stable: ties keep fetched-before-cached order.
    messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    MergeOutcome {
        messages,
        added,
        duplicates,
        repaired,
        markdown_failures,
    }
}

fn has_body(message: &FetchedMessage) -> bool {
    message
        .content_html
        .as_deref()
        .is_some_and(|html| !html.trim().is_empty())
}
