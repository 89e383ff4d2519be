//! Sectioning of document bodies.
//!
//! A body is split at its second-level headings into an ordered stream of
//! intro and heading sections, with at most one notes section held aside:
//!
//! - **Intro**: text before the first heading, trimmed; dropped when blank
//! - **Section**: one heading title and the text under it
//! - **Notes**: the last heading whose title contains "notes" (any case)

pub mod sectioner;

pub use sectioner::{
    DEFAULT_HEADING_LEVEL, DEFAULT_NOTES_TOKEN, Sectioner, UNTITLED_SECTION, split_sections,
};
