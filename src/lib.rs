//! # Casebook
//!
//! Content layer for a case-study site.
//!
//! Casebook loads front-matter documents from a backing collection, keeps
//! them in a time-bounded cache, and splits their bodies into sections for
//! rendering. The store and the sectioner are independent: a page asks the
//! store for a document, then hands its body to the sectioner.
//!
//! ## Features
//!
//! - **Document Store**: full listings, lookups by key, and prev/next
//!   neighbours, cached for five minutes with on-demand invalidation
//! - **Sectioner**: `##` heading split with an intro and a notes side channel
//! - **Feed**: keys and modification times straight from the collection
//! - **Collections**: directory-backed and in-memory
//!
//! ## Example
//!
//! ```
//! use casebook::{DocumentStore, MemoryCollection, split_sections};
//!
//! let store = DocumentStore::new(
//!     MemoryCollection::new()
//!         .with_item("acme", "---\ntitle: Acme\n---\nHello\n## Results\nFaster"),
//! );
//! let doc = store.get_by_key("acme", true).unwrap();
//! let outline = split_sections(doc.body.as_str()).unwrap();
//! assert_eq!(outline.headings().collect::<Vec<_>>(), vec!["Results"]);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod collection;
pub mod config;
pub mod content;
pub mod control;
pub mod core;
pub mod error;
pub mod feed;
pub mod sectioning;
pub mod store;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{Document, DocumentMeta, DocumentSummary, Outline, Section, SectionKind};

// Re-export collection types
pub use collection::{Collection, DirCollection, MemoryCollection};

// Re-export store types
pub use config::StoreConfig;
pub use store::{Adjacent, DocumentStore};

// Re-export sectioning types
pub use sectioning::{Sectioner, split_sections};

// Re-export feed and control types
pub use control::{CacheControl, InvalidateResponse, invalidate_cache};
pub use feed::FeedEntry;
