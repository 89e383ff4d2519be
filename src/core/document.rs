//! Document representation for casebook.
//!
//! A document is one case study: its key, the well-known front-matter
//! fields, the raw heading-delimited body, and any extra metadata the
//! front matter carried.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single case study loaded from the backing collection.
///
/// # Examples
///
/// ```
/// use casebook::core::Document;
///
/// let doc = Document::new("alpha", "Alpha", "## Overview\nText");
/// assert_eq!(doc.key, "alpha");
/// assert!(doc.description.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique key derived from the backing item's identity.
    pub key: String,

    /// Title from front matter, or the key when none was given.
    pub title: String,

    /// Optional short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Raw body text with the front matter removed.
    pub body: String,

    /// Remaining metadata fields.
    #[serde(flatten)]
    pub meta: DocumentMeta,
}

/// Open metadata bag read from front matter.
///
/// The schema is permissive: scalars are accepted where strings are
/// expected, a single tag is accepted in place of a list, and unknown
/// fields land in [`DocumentMeta::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    /// Publication date as written in front matter.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,

    /// Author name.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub author: Option<String>,

    /// Tags.
    #[serde(
        default,
        deserialize_with = "lenient_tags",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,

    /// Cover image path (`coverImage` in front matter).
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<String>,

    /// Unknown fields, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A document without its body, for listing views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    /// Document key.
    pub key: String,
    /// Document title.
    pub title: String,
    /// Optional short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Remaining metadata fields.
    #[serde(flatten)]
    pub meta: DocumentMeta,
}

impl Document {
    /// Creates a document with empty metadata.
    #[must_use]
    pub fn new(key: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            description: None,
            body: body.into(),
            meta: DocumentMeta::default(),
        }
    }

    /// Returns `true` when the body holds nothing but whitespace.
    #[must_use]
    pub fn has_empty_body(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Looks up an extra front-matter field by name.
    #[must_use]
    pub fn extra(&self, name: &str) -> Option<&Value> {
        self.meta.extra.get(name)
    }

    /// Returns the listing view of this document.
    #[must_use]
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            key: self.key.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            meta: self.meta.clone(),
        }
    }
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        doc.summary()
    }
}

/// Accepts any scalar and renders it as a string. `null` maps to `None`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_to_string))
}

/// Accepts a list of scalars or a single scalar.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.into_iter().filter_map(scalar_to_string).collect(),
        Some(other) => scalar_to_string(other).into_iter().collect(),
        None => Vec::new(),
    })
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
