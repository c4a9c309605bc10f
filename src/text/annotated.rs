use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::annotation::{Annotation, AnnotationData, AnnotationId, AnnotationKind, HighlightMark};
use super::codepoint::CodepointText;
use crate::error::{AnnoError, Result};

/// Text plus a collection of ranged annotations.
///
/// Values are never mutated in place. Every editing operation returns a new
/// `AnnotatedText` and the caller decides whether to swap its reference. The
/// underlying text is shared between revisions since edits never change it.
///
/// Same-kind annotations must not overlap. This is a caller contract, not
/// something [`add_annotation`](Self::add_annotation) checks: clear the kind
/// over the range first (see [`set_ruby`](Self::set_ruby)).
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedText {
    text: Arc<CodepointText>,
    annotations: Vec<Annotation>,
}

impl AnnotatedText {
    /// Create an annotated text with no annotations
    #[must_use]
    pub fn new(text: impl Into<CodepointText>) -> Self {
        Self {
            text: Arc::new(text.into()),
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &CodepointText {
        &self.text
    }

    /// Length of the text in code points
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// All annotations in insertion order
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    #[must_use]
    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Every annotation intersecting `[begin, end)`, ordered by
    /// `(cp_begin, cp_end)` with insertion order breaking ties.
    #[must_use]
    pub fn get_in_range(&self, begin: usize, end: usize) -> Vec<&Annotation> {
        self.collect_sorted(|a| a.overlaps(begin, end))
    }

    /// Like [`get_in_range`](Self::get_in_range), restricted to one kind
    #[must_use]
    pub fn get_kind_in_range(&self, kind: &AnnotationKind, begin: usize, end: usize) -> Vec<&Annotation> {
        self.collect_sorted(|a| a.overlaps(begin, end) && a.kind() == *kind)
    }

    /// Annotations of `kind` covering the code point at `index`
    #[must_use]
    pub fn get_kind_at_index(&self, kind: &AnnotationKind, index: usize) -> Vec<&Annotation> {
        self.get_kind_in_range(kind, index, index.saturating_add(1))
    }

    fn collect_sorted(&self, keep: impl Fn(&Annotation) -> bool) -> Vec<&Annotation> {
        let mut hits: Vec<&Annotation> = self.annotations.iter().filter(|a| keep(a)).collect();
        hits.sort_by_key(|a| (a.cp_begin, a.cp_end));
        hits
    }

    /// Add an annotation with a fresh id over `[begin, end)`.
    ///
    /// Fails with [`AnnoError::OutOfRange`] if the range does not fit the
    /// text. Does not check for same-kind overlap.
    pub fn add_annotation(&self, begin: usize, end: usize, data: AnnotationData) -> Result<Self> {
        self.insert_annotation(Annotation::new(begin, end, data))
    }

    /// Add a pre-built annotation, keeping its id. Useful when the caller
    /// needs to know the id up front.
    pub fn insert_annotation(&self, annotation: Annotation) -> Result<Self> {
        self.check_range(annotation.cp_begin, annotation.cp_end)?;
        let mut next = self.clone();
        next.annotations.push(annotation);
        Ok(next)
    }

    /// Add several annotations at once. Either all are added or, if any range
    /// is invalid, none are.
    pub fn insert_annotations(&self, batch: impl IntoIterator<Item = Annotation>) -> Result<Self> {
        let mut next = self.clone();
        for annotation in batch {
            self.check_range(annotation.cp_begin, annotation.cp_end)?;
            next.annotations.push(annotation);
        }
        Ok(next)
    }

    /// Remove every annotation of `kind` intersecting `[begin, end)`.
    ///
    /// Partially overlapping annotations are dropped whole, never trimmed.
    #[must_use]
    pub fn clear_kind_in_range(&self, begin: usize, end: usize, kind: &AnnotationKind) -> Self {
        Self {
            text: Arc::clone(&self.text),
            annotations: self
                .annotations
                .iter()
                .filter(|a| !(a.overlaps(begin, end) && a.kind() == *kind))
                .cloned()
                .collect(),
        }
    }

    /// Remove one annotation by id.
    ///
    /// An unknown id is reported as [`AnnoError::AnnotationNotFound`]; the
    /// receiver is untouched either way.
    pub fn delete_annotation(&self, id: AnnotationId) -> Result<Self> {
        let pos = self
            .annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or(AnnoError::AnnotationNotFound(id))?;
        let mut next = self.clone();
        next.annotations.remove(pos);
        Ok(next)
    }

    /// Replace the ruby over `[begin, end)` with `ruby_text`. Existing ruby
    /// touching the range is removed first; an empty (after trimming)
    /// `ruby_text` only clears.
    pub fn set_ruby(&self, begin: usize, end: usize, ruby_text: &str) -> Result<Self> {
        self.check_range(begin, end)?;
        let cleared = self.clear_kind_in_range(begin, end, &AnnotationKind::Ruby);
        let ruby_text = ruby_text.trim();
        if ruby_text.is_empty() {
            return Ok(cleared);
        }
        cleared.add_annotation(begin, end, AnnotationData::Ruby(ruby_text.to_string()))
    }

    /// Tag `[begin, end)` with a lemma. An empty (after trimming) lemma is a
    /// no-op.
    pub fn set_lemma(&self, begin: usize, end: usize, lemma: &str) -> Result<Self> {
        let lemma = lemma.trim();
        if lemma.is_empty() {
            self.check_range(begin, end)?;
            return Ok(self.clone());
        }
        self.add_annotation(begin, end, AnnotationData::Lemma(lemma.to_string()))
    }

    /// Mark `[begin, end)` as belonging to highlight set `set_id`
    pub fn add_highlight(
        &self,
        begin: usize,
        end: usize,
        set_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        self.add_annotation(
            begin,
            end,
            AnnotationData::Highlight(HighlightMark::new(set_id, timestamp)),
        )
    }

    fn check_range(&self, begin: usize, end: usize) -> Result<()> {
        if self.text.contains_range(begin, end) {
            Ok(())
        } else {
            Err(AnnoError::OutOfRange {
                begin,
                end,
                len: self.text.len(),
            })
        }
    }

    /// Flatten into the portable representation
    pub fn to_portable(&self) -> Result<PortableAnnotatedText> {
        let annotations = self
            .annotations
            .iter()
            .map(|a| {
                let (kind, data) = a.data.to_portable()?;
                Ok(PortableAnnotation {
                    id: a.id,
                    cp_begin: a.cp_begin,
                    cp_end: a.cp_end,
                    kind,
                    data,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PortableAnnotatedText {
            text: self.text.to_string(),
            annotations,
        })
    }

    /// Rebuild from the portable representation, validating every range
    pub fn from_portable(portable: PortableAnnotatedText) -> Result<Self> {
        let text = CodepointText::new(&portable.text);
        let annotations = portable
            .annotations
            .into_iter()
            .map(|p| {
                if !text.contains_range(p.cp_begin, p.cp_end) {
                    return Err(AnnoError::OutOfRange {
                        begin: p.cp_begin,
                        end: p.cp_end,
                        len: text.len(),
                    });
                }
                Ok(Annotation {
                    id: p.id,
                    cp_begin: p.cp_begin,
                    cp_end: p.cp_end,
                    data: AnnotationData::from_portable(&p.kind, p.data)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            text: Arc::new(text),
            annotations,
        })
    }
}

/// Wire form of an [`AnnotatedText`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableAnnotatedText {
    pub text: String,
    #[serde(default)]
    pub annotations: Vec<PortableAnnotation>,
}

/// Wire form of an [`Annotation`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortableAnnotation {
    pub id: AnnotationId,
    pub cp_begin: usize,
    pub cp_end: usize,
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}
