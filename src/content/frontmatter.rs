//! Front-matter extraction.
//!
//! Raw items look like:
//!
//! ```text
//! ---
//! title: Alpha
//! tags: [rust, cache]
//! ---
//! Intro text
//! ## Overview
//! ```
//!
//! The YAML block between the `---` fences becomes [`DocumentMeta`]; the
//! rest is the body, kept byte-for-byte.

use crate::core::{Document, DocumentMeta};
use crate::core::document::lenient_string;
use crate::error::{ContentError, Result};
use serde::Deserialize;

/// Front-matter fence line.
pub const FENCE: &str = "---";

const BOM: char = '\u{feff}';

/// Front matter as written, before the key fallback for the title.
#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,

    #[serde(flatten)]
    meta: DocumentMeta,
}

/// Splits raw text into its YAML header (if any) and body.
///
/// Text that does not open with a fence line has no header, and the whole
/// text is the body.
///
/// # Errors
///
/// Returns [`ContentError::UnterminatedFrontMatter`] when the opening fence
/// has no matching closing fence.
pub fn split_front_matter<'a>(key: &str, raw: &'a str) -> Result<(Option<&'a str>, &'a str)> {
    let text = raw.strip_prefix(BOM).unwrap_or(raw);

    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
    if first.trim_end() != FENCE {
        return Ok((None, text));
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Ok((Some(&rest[..offset]), &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(ContentError::UnterminatedFrontMatter {
        key: key.to_string(),
    }
    .into())
}

/// Parses one raw backing item into a [`Document`].
///
/// # Errors
///
/// Returns a [`ContentError`] when the header is unterminated or is not a
/// YAML mapping matching the metadata schema.
///
/// # Examples
///
/// ```
/// use casebook::content::parse_document;
///
/// let doc = parse_document("alpha", "---\ntitle: Alpha\n---\n## One\ntext").unwrap();
/// assert_eq!(doc.title, "Alpha");
/// assert_eq!(doc.body, "## One\ntext");
/// ```
pub fn parse_document(key: &str, raw: &str) -> Result<Document> {
    let (header, body) = split_front_matter(key, raw)?;

    let front = match header {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str::<Option<FrontMatter>>(yaml)
            .map_err(|e| ContentError::InvalidFrontMatter {
                key: key.to_string(),
                reason: e.to_string(),
            })?
            .unwrap_or_default(),
        _ => FrontMatter::default(),
    };

    Ok(Document {
        key: key.to_string(),
        title: front
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| key.to_string()),
        description: front.description,
        body: body.to_string(),
        meta: front.meta,
    })
}
