//! Core domain models for casebook.
//!
//! This module contains the data structures shared by the store and the
//! sectioner: documents and the sections a body decomposes into. These are
//! pure domain models with no I/O dependencies.

pub mod document;
pub mod section;

pub use document::{Document, DocumentMeta, DocumentSummary};
pub use section::{Outline, Section, SectionKind};
