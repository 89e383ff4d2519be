//! Cached document store.
//!
//! The store keeps two caches over a [`Collection`]:
//!
//! - a [`Snapshot`] of the whole collection, refreshed wholesale, and
//! - per-key entries filled by targeted lookups.
//!
//! Each is aged independently against the same freshness window. A
//! targeted lookup never makes the snapshot look fresher than it is.

use crate::collection::{Collection, DirCollection};
use crate::config::{DEFAULT_CACHE_TTL, StoreConfig};
use crate::content::parse_document;
use crate::core::Document;
use crate::error::Result;
use crate::store::clock::{Clock, SystemClock};
use crate::store::snapshot::Snapshot;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Neighbours of a document in snapshot order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adjacent {
    /// The document after the requested one.
    pub next: Option<Arc<Document>>,
    /// The document before the requested one.
    pub prev: Option<Arc<Document>>,
}

#[derive(Debug, Clone)]
struct CachedEntry {
    document: Arc<Document>,
    loaded_at: Instant,
}

/// Serves documents from a collection with bounded staleness.
///
/// The store is `Sync` and meant to be shared (for example behind an
/// `Arc`). Readers never block on a reload unless they need one; concurrent
/// callers that find the cache stale wait for a single reload and share
/// its result.
///
/// # Examples
///
/// ```
/// use casebook::collection::MemoryCollection;
/// use casebook::store::DocumentStore;
///
/// let collection = MemoryCollection::new()
///     .with_item("alpha", "---\ntitle: Alpha\n---\nA")
///     .with_item("bravo", "---\ntitle: Bravo\n---\nB");
/// let store = DocumentStore::new(collection);
///
/// assert_eq!(store.get_all(true).len(), 2);
/// let adjacent = store.get_adjacent("alpha");
/// assert_eq!(adjacent.next.unwrap().title, "Bravo");
/// assert!(adjacent.prev.is_none());
/// ```
#[derive(Debug)]
pub struct DocumentStore<C, K = SystemClock> {
    collection: C,
    clock: K,
    ttl: Duration,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    entries: RwLock<HashMap<String, CachedEntry>>,
    /// Serializes full reloads.
    reload_lock: Mutex<()>,
    /// Bumped by `invalidate`; loads started under an older value are
    /// not installed.
    generation: AtomicU64,
}

impl DocumentStore<DirCollection> {
    /// Creates a directory-backed store from configuration.
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        let collection =
            DirCollection::new(config.content_dir.clone()).with_extension(&config.extension);
        Self::new(collection).with_ttl(config.cache_ttl)
    }
}

impl<C: Collection> DocumentStore<C> {
    /// Creates a store with the system clock and the default window.
    #[must_use]
    pub fn new(collection: C) -> Self {
        Self::with_clock(collection, SystemClock)
    }
}

impl<C: Collection, K: Clock> DocumentStore<C, K> {
    /// Creates a store with an explicit clock.
    #[must_use]
    pub fn with_clock(collection: C, clock: K) -> Self {
        Self {
            collection,
            clock,
            ttl: DEFAULT_CACHE_TTL,
            snapshot: RwLock::new(None),
            entries: RwLock::new(HashMap::new()),
            reload_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Sets the freshness window.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the freshness window.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the backing collection.
    #[must_use]
    pub const fn collection(&self) -> &C {
        &self.collection
    }

    /// Returns every document in collection order.
    ///
    /// With `use_cache`, a fresh snapshot is returned as is. Otherwise the
    /// collection is reloaded. If the collection cannot be read the failure
    /// is logged and an empty list is returned; the previous snapshot stays
    /// in place.
    pub fn get_all(&self, use_cache: bool) -> Vec<Arc<Document>> {
        self.try_get_all(use_cache).unwrap_or_else(|e| {
            tracing::error!(
                collection = %self.collection.describe(),
                error = %e,
                "failed to load documents"
            );
            Vec::new()
        })
    }

    /// Like [`get_all`](Self::get_all), but reports backend failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be enumerated. Individual
    /// unreadable or malformed documents are skipped, not reported.
    pub fn try_get_all(&self, use_cache: bool) -> Result<Vec<Arc<Document>>> {
        if use_cache && let Some(snapshot) = self.fresh_snapshot() {
            return Ok(snapshot.documents().to_vec());
        }

        let _reload = self
            .reload_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another caller may have reloaded while we waited.
        if use_cache && let Some(snapshot) = self.fresh_snapshot() {
            tracing::debug!("reload already done by a concurrent caller");
            return Ok(snapshot.documents().to_vec());
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let snapshot = Arc::new(self.load_snapshot()?);
        self.install_snapshot(Arc::clone(&snapshot), generation);
        Ok(snapshot.documents().to_vec())
    }

    /// Returns the document with `key`, or `None` if it does not exist.
    ///
    /// With `use_cache`, a fresh copy from the snapshot or from an earlier
    /// lookup is returned without touching the collection. Read and parse
    /// failures are logged and reported as `None`.
    pub fn get_by_key(&self, key: &str, use_cache: bool) -> Option<Arc<Document>> {
        self.try_get_by_key(key, use_cache).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "failed to load document");
            None
        })
    }

    /// Like [`get_by_key`](Self::get_by_key), but distinguishes "not
    /// found" (`Ok(None)`) from failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the item cannot be read or its front matter is
    /// malformed.
    pub fn try_get_by_key(&self, key: &str, use_cache: bool) -> Result<Option<Arc<Document>>> {
        if use_cache && let Some(document) = self.cached(key) {
            return Ok(Some(document));
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let Some(raw) = self.collection.read(key)? else {
            tracing::debug!(key, "document not found");
            self.write_entries().remove(key);
            return Ok(None);
        };

        let document = Arc::new(parse_document(key, &raw)?);
        let loaded_at = self.clock.now();

        let mut entries = self.write_entries();
        if self.generation.load(Ordering::SeqCst) == generation {
            entries.insert(
                key.to_string(),
                CachedEntry {
                    document: Arc::clone(&document),
                    loaded_at,
                },
            );
        }
        Ok(Some(document))
    }

    /// Returns the neighbours of `key` in collection order.
    ///
    /// Both sides are `None` when `key` is not in the collection. There is
    /// no wraparound.
    pub fn get_adjacent(&self, key: &str) -> Adjacent {
        let documents = self.get_all(true);
        let Some(index) = documents.iter().position(|d| d.key == key) else {
            return Adjacent::default();
        };

        Adjacent {
            next: documents.get(index + 1).cloned(),
            prev: index
                .checked_sub(1)
                .and_then(|i| documents.get(i))
                .cloned(),
        }
    }

    /// Drops every cached document so the next access reloads.
    ///
    /// Safe to call at any time, including when nothing is cached. A
    /// reload already in progress completes but does not populate the
    /// cache.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.write_snapshot() = None;
        self.write_entries().clear();
        tracing::debug!(collection = %self.collection.describe(), "cache invalidated");
    }

    /// Returns `true` when a snapshot is cached and still fresh.
    pub fn is_fresh(&self) -> bool {
        self.fresh_snapshot().is_some()
    }

    fn fresh_snapshot(&self) -> Option<Arc<Snapshot>> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|s| s.is_fresh(self.clock.now(), self.ttl))
            .cloned()
    }

    /// Returns the most recently loaded fresh copy of `key`, preferring a
    /// targeted load over a snapshot copy of the same age.
    fn cached(&self, key: &str) -> Option<Arc<Document>> {
        let now = self.clock.now();
        let entry = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            entries
                .get(key)
                .filter(|e| now.saturating_duration_since(e.loaded_at) < self.ttl)
                .cloned()
        };

        let snapshot = self.fresh_snapshot();
        let from_snapshot = snapshot
            .as_ref()
            .and_then(|s| s.get(key).map(|doc| (Arc::clone(doc), s.loaded_at())));

        match (entry, from_snapshot) {
            (Some(entry), Some((_, snapshot_at))) if entry.loaded_at >= snapshot_at => {
                Some(entry.document)
            }
            (_, Some((document, _))) => Some(document),
            (Some(entry), None) => Some(entry.document),
            (None, None) => None,
        }
    }

    fn load_snapshot(&self) -> Result<Snapshot> {
        let keys = self.collection.list_keys()?;

        let documents: Vec<Document> = keys
            .par_iter()
            .filter_map(|key| self.load_listed(key))
            .collect();

        let loaded_at = self.clock.now();
        tracing::debug!(
            collection = %self.collection.describe(),
            listed = keys.len(),
            loaded = documents.len(),
            "reloaded documents"
        );
        Ok(Snapshot::new(documents, loaded_at))
    }

    /// Loads one listed key, skipping it on any failure.
    fn load_listed(&self, key: &str) -> Option<Document> {
        let raw = match self.collection.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key, "listed document vanished before read");
                return None;
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "skipping unreadable document");
                return None;
            }
        };

        match parse_document(key, &raw) {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::warn!(key, error = %e, "skipping malformed document");
                None
            }
        }
    }

    fn install_snapshot(&self, snapshot: Arc<Snapshot>, generation: u64) {
        let mut current = self.write_snapshot();
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("cache invalidated during reload, not installing");
            return;
        }
        *current = Some(snapshot);
        drop(current);
        self.write_entries().clear();
    }

    fn write_snapshot(&self) -> std::sync::RwLockWriteGuard<'_, Option<Arc<Snapshot>>> {
        self.snapshot.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, CachedEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
