//! Content parsing for casebook.
//!
//! Turns the raw text of one backing item into a [`crate::core::Document`]
//! by separating the YAML front matter from the body.

pub mod frontmatter;

pub use frontmatter::{FENCE, parse_document, split_front_matter};
