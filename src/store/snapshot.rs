//! Point-in-time view of the whole collection.

use crate::core::Document;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// An ordered, immutable set of documents plus the instant it was loaded.
///
/// Snapshots are built completely before the store publishes them and are
/// never mutated afterwards; a refresh replaces the whole snapshot.
#[derive(Debug)]
pub struct Snapshot {
    documents: Vec<Arc<Document>>,
    positions: HashMap<String, usize>,
    loaded_at: Instant,
}

impl Snapshot {
    /// Builds a snapshot from documents in enumeration order.
    ///
    /// A key that appears more than once keeps its first position; later
    /// duplicates are dropped.
    #[must_use]
    pub fn new(documents: Vec<Document>, loaded_at: Instant) -> Self {
        let mut positions = HashMap::with_capacity(documents.len());
        let mut kept = Vec::with_capacity(documents.len());

        for doc in documents {
            if positions.contains_key(&doc.key) {
                tracing::warn!(key = %doc.key, "duplicate key in collection, keeping first");
                continue;
            }
            positions.insert(doc.key.clone(), kept.len());
            kept.push(Arc::new(doc));
        }

        Self {
            documents: kept,
            positions,
            loaded_at,
        }
    }

    /// Documents in enumeration order.
    #[must_use]
    pub fn documents(&self) -> &[Arc<Document>] {
        &self.documents
    }

    /// Looks up a document by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<Document>> {
        self.position(key).and_then(|i| self.documents.get(i))
    }

    /// Position of a key in enumeration order.
    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` when the snapshot holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Instant the snapshot was loaded.
    #[must_use]
    pub const fn loaded_at(&self) -> Instant {
        self.loaded_at
    }

    /// Whether the snapshot is younger than `ttl` at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.loaded_at) < ttl
    }
}
