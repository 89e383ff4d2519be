//! Enumeration-derived feed.
//!
//! Feed entries carry only a key and a modification time. They are built
//! from the collection's listing and metadata, so producing a feed never
//! reads or parses document bodies.

use crate::collection::Collection;
use crate::error::Result;
use crate::store::{Clock, DocumentStore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::SystemTime;

/// One document in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    /// Document key.
    pub key: String,
    /// When the backing item last changed.
    pub last_modified: DateTime<Utc>,
}

impl FeedEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(key: impl Into<String>, modified: SystemTime) -> Self {
        Self {
            key: key.into(),
            last_modified: DateTime::<Utc>::from(modified),
        }
    }

    /// The modification date as `YYYY-MM-DD`.
    #[must_use]
    pub fn lastmod(&self) -> String {
        self.last_modified.format("%Y-%m-%d").to_string()
    }
}

impl<C: Collection, K: Clock> DocumentStore<C, K> {
    /// Lists feed entries in collection order.
    ///
    /// Items whose modification time cannot be read are skipped. If the
    /// collection cannot be enumerated the failure is logged and the feed
    /// is empty.
    pub fn feed_entries(&self) -> Vec<FeedEntry> {
        self.try_feed_entries().unwrap_or_else(|e| {
            tracing::error!(
                collection = %self.collection().describe(),
                error = %e,
                "failed to enumerate feed"
            );
            Vec::new()
        })
    }

    /// Like [`feed_entries`](Self::feed_entries), but reports enumeration
    /// failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be enumerated.
    pub fn try_feed_entries(&self) -> Result<Vec<FeedEntry>> {
        let collection = self.collection();
        let keys = collection.list_keys()?;
        let mut entries = Vec::with_capacity(keys.len());

        for key in keys {
            match collection.modified(&key) {
                Ok(Some(modified)) => entries.push(FeedEntry::new(key, modified)),
                Ok(None) => tracing::debug!(key = %key, "listed item vanished before stat"),
                Err(e) => tracing::warn!(key = %key, error = %e, "skipping item without mtime"),
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::MemoryCollection;
    use std::sync::Arc;
    use std::time::Duration;

    fn day(n: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(n * 86_400)
    }

    #[test]
    fn test_lastmod_format() {
        let entry = FeedEntry::new("alpha", day(19_000));
        assert_eq!(entry.lastmod(), "2022-01-08");
    }

    #[test]
    fn test_serializes_camel_case() {
        let entry = FeedEntry::new("alpha", day(0));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["key"], "alpha");
        assert_eq!(json["lastModified"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_feed_entries_follow_collection_order() {
        let collection = MemoryCollection::new()
            .with_item("b", "---\ntitle: B\n---\n")
            .with_item("a", "---\ntitle: A\n---\n");
        collection.set_modified("b", day(1));
        collection.set_modified("a", day(2));
        let store = DocumentStore::new(collection);

        let entries = store.feed_entries();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(entries[0].lastmod(), "1970-01-02");
        assert_eq!(entries[1].lastmod(), "1970-01-03");
    }

    #[test]
    fn test_feed_entries_never_read_bodies() {
        let collection = Arc::new(
            MemoryCollection::new()
                .with_item("a", "---\ntitle: [broken\n---\n")
                .with_item("b", "body"),
        );
        let store = DocumentStore::new(Arc::clone(&collection));

        assert_eq!(store.feed_entries().len(), 2);
        assert_eq!(collection.read_calls(), 0);
    }

    #[test]
    fn test_feed_entries_backend_failure() {
        let collection = MemoryCollection::new().with_item("a", "body");
        collection.set_unavailable(true);
        let store = DocumentStore::new(collection);

        assert!(store.feed_entries().is_empty());
        assert!(store.try_feed_entries().is_err());
    }
}
