//! Section types produced by the sectioner.
//!
//! A body decomposes into an [`Outline`]: the main stream of intro and
//! heading sections in textual order, plus at most one notes section
//! kept aside.

use serde::{Deserialize, Serialize};

/// Kind tag of a [`Section`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Free text before the first heading.
    Intro,
    /// A heading and its body.
    Section,
    /// The side-channel notes section.
    Notes,
}

impl SectionKind {
    /// Returns the lowercase tag used in keys and serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Section => "section",
            Self::Notes => "notes",
        }
    }
}

/// One renderable piece of a document body.
///
/// # Examples
///
/// ```
/// use casebook::core::{Section, SectionKind};
///
/// let section = Section::heading(1, "Overview", "Some text");
/// assert_eq!(section.kind, SectionKind::Section);
/// assert_eq!(section.key(), "section-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section kind.
    #[serde(rename = "type")]
    pub kind: SectionKind,

    /// Position of the source chunk in the split body.
    pub index: usize,

    /// Heading title (`None` for intro sections).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Section text, trimmed.
    pub content: String,
}

impl Section {
    /// Creates an intro section.
    #[must_use]
    pub fn intro(index: usize, content: impl Into<String>) -> Self {
        Self {
            kind: SectionKind::Intro,
            index,
            heading: None,
            content: content.into(),
        }
    }

    /// Creates a heading section.
    #[must_use]
    pub fn heading(index: usize, heading: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: SectionKind::Section,
            index,
            heading: Some(heading.into()),
            content: content.into(),
        }
    }

    /// Creates a notes section.
    #[must_use]
    pub fn notes(index: usize, heading: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: SectionKind::Notes,
            index,
            heading: Some(heading.into()),
            content: content.into(),
        }
    }

    /// Stable key for rendering, e.g. `section-3`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}-{}", self.kind.as_str(), self.index)
    }

    /// Returns the heading title, or `""` for intro sections.
    #[must_use]
    pub fn title(&self) -> &str {
        self.heading.as_deref().unwrap_or_default()
    }
}

/// The structured decomposition of one body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Intro and heading sections in textual order.
    pub sections: Vec<Section>,

    /// The notes section, if any heading matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Section>,
}

impl Outline {
    /// Builds the fallback outline: the whole body as one intro section.
    #[must_use]
    pub fn unstructured(body: &str) -> Self {
        Self {
            sections: vec![Section::intro(0, body.trim())],
            notes: None,
        }
    }

    /// Number of sections in the main stream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` when the main stream has no sections.
    ///
    /// A notes-only document is empty by this measure.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Headings of the main stream, in order.
    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().filter_map(|s| s.heading.as_deref())
    }
}
