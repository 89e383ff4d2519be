//! Collection trait definition.
//!
//! Defines the interface the document store reads from, enabling pluggable
//! backing collections.

use crate::error::Result;
use std::sync::Arc;
use std::time::SystemTime;

/// A listable, keyed collection of raw text items.
///
/// Implementations must be `Send + Sync`: the store parses items in
/// parallel during a full reload. A missing item is reported as `Ok(None)`,
/// never as an error.
pub trait Collection: Send + Sync {
    /// Lists every key, in the collection's enumeration order.
    ///
    /// The order returned here becomes the snapshot order used for
    /// adjacency queries.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be enumerated.
    fn list_keys(&self) -> Result<Vec<String>>;

    /// Reads one item's raw text (front matter included).
    ///
    /// # Errors
    ///
    /// Returns an error if the item exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Reads one item's last-modified time.
    ///
    /// # Errors
    ///
    /// Returns an error if the item exists but its metadata cannot be read.
    fn modified(&self, key: &str) -> Result<Option<SystemTime>>;

    /// Short description used in log fields.
    fn describe(&self) -> String {
        "collection".to_string()
    }
}

impl<T: Collection + ?Sized> Collection for Arc<T> {
    fn list_keys(&self) -> Result<Vec<String>> {
        (**self).list_keys()
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn modified(&self, key: &str) -> Result<Option<SystemTime>> {
        (**self).modified(key)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
