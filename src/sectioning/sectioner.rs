//! Heading-based sectioning.
//!
//! Splits a body at every second-level heading line, keeping each heading
//! with the text that follows it. Text before the first heading becomes an
//! intro section, and a heading whose title mentions "notes" is pulled out
//! into the outline's side channel.

use crate::core::{Outline, Section};
use crate::error::{Result, SectioningError};
use regex::Regex;
use std::sync::LazyLock;

/// Heading level used to split bodies (`##`).
pub const DEFAULT_HEADING_LEVEL: usize = 2;

/// Token that marks a heading as the notes section.
pub const DEFAULT_NOTES_TOKEN: &str = "notes";

/// Title given to headings with no text after the marker.
pub const UNTITLED_SECTION: &str = "Untitled Section";

/// Deepest heading level accepted.
const MAX_HEADING_LEVEL: usize = 6;

static DEFAULT_BOUNDARY: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| boundary_regex(DEFAULT_HEADING_LEVEL));

fn boundary_regex(level: usize) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?m)^[ \t]*#{{{level}}} "))
}

/// Splits document bodies into an [`Outline`].
///
/// The sectioner holds configuration only; splitting is a pure function of
/// its input, so the same body always yields the same outline.
///
/// # Examples
///
/// ```
/// use casebook::sectioning::Sectioner;
///
/// let outline = Sectioner::new()
///     .split("intro\n## Overview\nx\n## Notes\ny")
///     .unwrap();
/// assert_eq!(outline.len(), 2);
/// assert_eq!(outline.notes.unwrap().content, "y");
/// ```
#[derive(Debug, Clone)]
pub struct Sectioner {
    /// Heading level that starts a section.
    level: usize,
    /// Lowercased token identifying the notes heading.
    notes_token: String,
    /// Placeholder for empty heading titles.
    untitled: String,
}

impl Default for Sectioner {
    fn default() -> Self {
        Self::new()
    }
}

impl Sectioner {
    /// Creates a sectioner splitting on `##` headings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: DEFAULT_HEADING_LEVEL,
            notes_token: DEFAULT_NOTES_TOKEN.to_string(),
            untitled: UNTITLED_SECTION.to_string(),
        }
    }

    /// Sets the heading level, clamped to `1..=6`.
    #[must_use]
    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level.clamp(1, MAX_HEADING_LEVEL);
        self
    }

    /// Sets the token that marks the notes heading. Matching ignores case.
    #[must_use]
    pub fn notes_token(mut self, token: &str) -> Self {
        self.notes_token = token.to_lowercase();
        self
    }

    /// Sets the placeholder title for empty headings.
    #[must_use]
    pub fn untitled_title(mut self, title: &str) -> Self {
        self.untitled = title.to_string();
        self
    }

    /// Returns the configured heading marker, e.g. `##`.
    #[must_use]
    pub fn marker(&self) -> String {
        "#".repeat(self.level)
    }

    /// Splits a body into an outline.
    ///
    /// Returns `None` when there is nothing to parse: the body is missing,
    /// empty, or whitespace only. A body that parses into zero main
    /// sections (for example, one that is entirely notes) still returns
    /// `Some`.
    ///
    /// Internal failures never escape: the whole body comes back as a
    /// single intro section instead.
    pub fn split<'a>(&self, body: impl Into<Option<&'a str>>) -> Option<Outline> {
        let body = body.into()?;
        if body.trim().is_empty() {
            return None;
        }

        Some(or_unstructured(body, self.try_split(body)))
    }

    /// Splits a non-empty body, reporting internal failures.
    ///
    /// # Errors
    ///
    /// Returns a [`SectioningError`] when the heading pattern cannot be
    /// built or a heading chunk is malformed.
    pub fn try_split(&self, body: &str) -> Result<Outline> {
        let boundary = self.boundary()?;
        let marker = self.marker();

        let mut outline = Outline::default();
        for (index, chunk) in split_at_boundaries(body, &boundary).into_iter().enumerate() {
            if chunk.trim().is_empty() {
                continue;
            }

            let Some(after_marker) = strip_marker(chunk, &marker) else {
                // Only the piece before the first boundary can lack a heading.
                if index > 0 {
                    return Err(SectioningError::Malformed(format!(
                        "piece {index} does not open with {marker}"
                    ))
                    .into());
                }
                outline.sections.push(Section::intro(index, chunk.trim()));
                continue;
            };

            let (heading_line, rest) = after_marker.split_once('\n').unwrap_or((after_marker, ""));
            let title = heading_line.trim();
            let title = if title.is_empty() {
                self.untitled.as_str()
            } else {
                title
            };
            let content = rest.trim();

            if title.to_lowercase().contains(&self.notes_token) {
                if let Some(previous) = outline.notes.replace(Section::notes(index, title, content)) {
                    tracing::debug!(
                        discarded = previous.title(),
                        kept = title,
                        "multiple notes headings, keeping the last"
                    );
                }
            } else {
                outline.sections.push(Section::heading(index, title, content));
            }
        }

        Ok(outline)
    }

    fn boundary(&self) -> Result<Regex> {
        if self.level == DEFAULT_HEADING_LEVEL {
            return DEFAULT_BOUNDARY
                .as_ref()
                .map(Clone::clone)
                .map_err(|e| SectioningError::Pattern(e.to_string()).into());
        }
        boundary_regex(self.level).map_err(|e| SectioningError::from(e).into())
    }
}

/// Falls back to the whole body as one intro section when splitting failed.
fn or_unstructured(body: &str, result: Result<Outline>) -> Outline {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "sectioning failed, using unstructured body");
        Outline::unstructured(body)
    })
}

/// Splits `body` immediately before every boundary match.
///
/// Each piece after the first starts with its heading line. A match at
/// offset zero does not produce an empty leading piece.
fn split_at_boundaries<'a>(body: &'a str, boundary: &Regex) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for m in boundary.find_iter(body) {
        if m.start() > start {
            pieces.push(&body[start..m.start()]);
            start = m.start();
        }
    }
    pieces.push(&body[start..]);
    pieces
}

/// Returns the text after `marker` and its trailing space, if `chunk`
/// opens with a heading line.
fn strip_marker<'a>(chunk: &'a str, marker: &str) -> Option<&'a str> {
    chunk
        .trim_start_matches([' ', '\t'])
        .strip_prefix(marker)?
        .strip_prefix(' ')
}

/// Splits `body` with the default [`Sectioner`].
///
/// Returns `None` for an empty or whitespace-only body.
///
/// # Examples
///
/// ```
/// use casebook::core::Section;
/// use casebook::sectioning::split_sections;
///
/// let outline = split_sections("intro text\n## Alpha\nbody1\n## Beta\nbody2").unwrap();
/// assert_eq!(
///     outline.sections,
///     vec![
///         Section::intro(0, "intro text"),
///         Section::heading(1, "Alpha", "body1"),
///         Section::heading(2, "Beta", "body2"),
///     ]
/// );
/// assert!(outline.notes.is_none());
/// assert!(split_sections("").is_none());
/// ```
pub fn split_sections<'a>(body: impl Into<Option<&'a str>>) -> Option<Outline> {
    Sectioner::new().split(body)
}
