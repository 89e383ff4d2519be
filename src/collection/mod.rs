//! Backing collections for casebook.
//!
//! The store depends on three calls only: list all keys, read one item,
//! and read one item's modification time. Two implementations ship:
//!
//! - **Directory**: one front-matter file per document, keyed by file stem
//! - **Memory**: insertion-ordered items, with failure injection

pub mod fs;
pub mod memory;
pub mod traits;

pub use fs::{DEFAULT_EXTENSION, DirCollection};
pub use memory::MemoryCollection;
pub use traits::Collection;
