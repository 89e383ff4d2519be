//! In-memory collection.
//!
//! Keeps items in insertion order and counts backing calls, which makes it
//! the collection of choice for exercising store caching behavior.

use crate::collection::traits::Collection;
use crate::error::{CollectionError, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

#[derive(Debug, Clone)]
struct MemoryItem {
    key: String,
    text: String,
    modified: SystemTime,
}

/// A mutable, insertion-ordered collection held in memory.
///
/// # Examples
///
/// ```
/// use casebook::collection::{Collection, MemoryCollection};
///
/// let collection = MemoryCollection::new()
///     .with_item("alpha", "---\ntitle: Alpha\n---\nbody")
///     .with_item("bravo", "body");
/// assert_eq!(collection.list_keys().unwrap(), vec!["alpha", "bravo"]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryCollection {
    items: RwLock<Vec<MemoryItem>>,
    unavailable: AtomicBool,
    list_calls: AtomicUsize,
    read_calls: AtomicUsize,
}

impl MemoryCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item while building.
    #[must_use]
    pub fn with_item(self, key: &str, text: &str) -> Self {
        self.insert(key, text);
        self
    }

    /// Inserts or replaces an item. A replaced item keeps its position.
    pub fn insert(&self, key: &str, text: &str) {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let now = SystemTime::now();
        if let Some(item) = items.iter_mut().find(|i| i.key == key) {
            item.text = text.to_string();
            item.modified = now;
        } else {
            items.push(MemoryItem {
                key: key.to_string(),
                text: text.to_string(),
                modified: now,
            });
        }
    }

    /// Removes an item. Returns `true` if it existed.
    pub fn remove(&self, key: &str) -> bool {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let before = items.len();
        items.retain(|i| i.key != key);
        items.len() != before
    }

    /// Overrides an item's modification time.
    pub fn set_modified(&self, key: &str, modified: SystemTime) {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(item) = items.iter_mut().find(|i| i.key == key) {
            item.modified = modified;
        }
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `list_keys` calls so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `read` calls so far.
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CollectionError::Unavailable("memory collection offline".to_string()).into());
        }
        Ok(())
    }
}

impl Collection for MemoryCollection {
    fn list_keys(&self) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items.iter().map(|i| i.key.clone()).collect())
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items.iter().find(|i| i.key == key).map(|i| i.text.clone()))
    }

    fn modified(&self, key: &str) -> Result<Option<SystemTime>> {
        self.check_available()?;
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items.iter().find(|i| i.key == key).map(|i| i.modified))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
