//! Error types for casebook operations.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! backing collection, front-matter parsing, sectioning, and configuration.
//!
//! A missing document is never an error. Lookups report it as `None`, so
//! every variant here describes something that actually went wrong.

use thiserror::Error;

/// Result type alias for casebook operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The backing collection could not be enumerated or read.
    #[error("collection error: {0}")]
    Collection(#[from] CollectionError),

    /// A document's metadata header could not be parsed.
    #[error("content error: {0}")]
    Content(#[from] ContentError),

    /// Internal failure while splitting a body into sections.
    #[error("sectioning error: {0}")]
    Sectioning(#[from] SectioningError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

impl Error {
    /// Returns `true` when the error means the backing collection was
    /// unavailable, as opposed to a single document being malformed.
    #[must_use]
    pub const fn is_backend_failure(&self) -> bool {
        matches!(self, Self::Collection(_))
    }
}

/// Errors raised by a backing collection.
#[derive(Error, Debug)]
pub enum CollectionError {
    /// Listing the collection failed.
    #[error("failed to list collection: {location}: {reason}")]
    ListFailed {
        /// Directory or name of the collection.
        location: String,
        /// Reason for failure.
        reason: String,
    },

    /// Reading a single item failed.
    #[error("failed to read item: {key}: {reason}")]
    ReadFailed {
        /// Key of the item.
        key: String,
        /// Reason for failure.
        reason: String,
    },

    /// The collection is unavailable as a whole.
    #[error("collection unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while turning raw item text into a document.
#[derive(Error, Debug)]
pub enum ContentError {
    /// Opening `---` fence without a closing one.
    #[error("unterminated front matter in {key}")]
    UnterminatedFrontMatter {
        /// Key of the offending document.
        key: String,
    },

    /// Front matter present but not valid YAML for the metadata schema.
    #[error("invalid front matter in {key}: {reason}")]
    InvalidFrontMatter {
        /// Key of the offending document.
        key: String,
        /// Parser message.
        reason: String,
    },
}

/// Errors raised inside the sectioner. These never leave `split_sections`.
#[derive(Error, Debug)]
pub enum SectioningError {
    /// The heading pattern failed to compile.
    #[error("heading pattern error: {0}")]
    Pattern(String),

    /// A heading chunk did not have the expected shape.
    #[error("malformed heading chunk: {0}")]
    Malformed(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Collection(CollectionError::Unavailable(err.to_string()))
    }
}

impl From<regex::Error> for SectioningError {
    fn from(err: regex::Error) -> Self {
        Self::Pattern(err.to_string())
    }
}
