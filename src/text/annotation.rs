//! Annotation records: a typed payload attached to a code-point range.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AnnoError, Result};

/// Opaque unique identifier of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(Uuid);

impl AnnotationId {
    /// Generate a fresh random id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AnnotationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Annotation kind tag.
///
/// Annotations of the same kind must not overlap; annotations of different
/// kinds may overlap freely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnnotationKind {
    /// Phonetic gloss displayed above the text
    Ruby,
    /// Dictionary head word
    Lemma,
    /// Learner highlight belonging to a highlight set
    Highlight,
    /// Any other kind, carried through untouched
    Custom(String),
}

impl AnnotationKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ruby => "ruby",
            Self::Lemma => "lemma",
            Self::Highlight => "highlight",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for AnnotationKind {
    fn from(name: &str) -> Self {
        match name {
            "ruby" => Self::Ruby,
            "lemma" => Self::Lemma,
            "highlight" => Self::Highlight,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for AnnotationKind {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<AnnotationKind> for String {
    fn from(kind: AnnotationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference from a text range to an external highlight set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightMark {
    /// When the highlight was made (epoch milliseconds on the wire)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Id of the highlight set; the set itself lives outside this crate
    pub set_id: String,
}

impl HighlightMark {
    #[must_use]
    pub fn new(set_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            set_id: set_id.into(),
        }
    }
}

/// Kind-specific payload. The variant *is* the kind, so payload shape and
/// kind cannot disagree.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationData {
    /// Ruby text to display over the range
    Ruby(String),
    /// Dictionary head word for the range
    Lemma(String),
    Highlight(HighlightMark),
    /// Kinds this crate does not interpret. `kind` should not be one of
    /// the built-in names, or the portable form will not round-trip.
    Custom {
        kind: String,
        value: serde_json::Value,
    },
}

impl AnnotationData {
    #[must_use]
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Self::Ruby(_) => AnnotationKind::Ruby,
            Self::Lemma(_) => AnnotationKind::Lemma,
            Self::Highlight(_) => AnnotationKind::Highlight,
            Self::Custom { kind, .. } => AnnotationKind::Custom(kind.clone()),
        }
    }

    /// Split into the `(kind, data)` pair of the portable representation
    pub(crate) fn to_portable(&self) -> Result<(String, serde_json::Value)> {
        let value = match self {
            Self::Ruby(text) | Self::Lemma(text) => serde_json::Value::String(text.clone()),
            Self::Highlight(mark) => serde_json::to_value(mark)?,
            Self::Custom { value, .. } => value.clone(),
        };
        Ok((self.kind().as_str().to_string(), value))
    }

    pub(crate) fn from_portable(kind: &str, value: serde_json::Value) -> Result<Self> {
        match AnnotationKind::from(kind) {
            AnnotationKind::Ruby => Ok(Self::Ruby(expect_string(kind, value)?)),
            AnnotationKind::Lemma => Ok(Self::Lemma(expect_string(kind, value)?)),
            AnnotationKind::Highlight => Ok(Self::Highlight(serde_json::from_value(value)?)),
            AnnotationKind::Custom(kind) => Ok(Self::Custom { kind, value }),
        }
    }
}

fn expect_string(kind: &str, value: serde_json::Value) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(s),
        other => Err(AnnoError::Portable(format!(
            "{kind} annotation data must be a string, got {other}"
        ))),
    }
}

/// A typed fact attached to the half-open code-point range `[cp_begin, cp_end)`
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: AnnotationId,
    pub cp_begin: usize,
    pub cp_end: usize,
    pub data: AnnotationData,
}

impl Annotation {
    /// Create an annotation with a fresh id. Range is not validated here;
    /// [`AnnotatedText::insert_annotation`](super::AnnotatedText::insert_annotation) does that.
    #[must_use]
    pub fn new(cp_begin: usize, cp_end: usize, data: AnnotationData) -> Self {
        Self {
            id: AnnotationId::new(),
            cp_begin,
            cp_end,
            data,
        }
    }

    #[must_use]
    pub fn kind(&self) -> AnnotationKind {
        self.data.kind()
    }

    /// Open-interval overlap with `[begin, end)`
    #[must_use]
    pub fn overlaps(&self, begin: usize, end: usize) -> bool {
        self.cp_begin < end && self.cp_end > begin
    }

    /// Whether this annotation's range strictly contains `other`'s
    #[must_use]
    pub fn strictly_contains(&self, other: &Annotation) -> bool {
        self.cp_begin <= other.cp_begin
            && self.cp_end >= other.cp_end
            && (self.cp_begin, self.cp_end) != (other.cp_begin, other.cp_end)
    }
}
