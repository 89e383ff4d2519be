//! Cached access to the document collection.
//!
//! [`DocumentStore`] is the read path used by listing pages, detail pages
//! and the feed. It holds a whole-collection [`Snapshot`] and per-key
//! entries, both aged against a freshness window measured by a [`Clock`].

pub mod clock;
pub mod document_store;
pub mod snapshot;

pub use clock::{Clock, ManualClock, SystemClock};
pub use document_store::{Adjacent, DocumentStore};
pub use snapshot::Snapshot;
