//! Annotated text engine.
//!
//! A text unit (one subtitle line, a video title, ...) is stored as a
//! [`CodepointText`] with any number of ranged [`Annotation`]s on top.
//!
//! - **Code-point addressing** - offsets never fall inside a character
//! - **Copy-on-write** - every edit returns a new [`AnnotatedText`]
//! - **Cross-kind overlap** - a highlight may span two lemma-tagged words
//!
//! # Example
//!
//! ```rust
//! use glosstrack::text::{AnnotatedText, AnnotationData, AnnotationKind};
//!
//! let text = AnnotatedText::new("食べる")
//!     .add_annotation(0, 3, AnnotationData::Lemma("食べる".into()))?;
//! assert_eq!(text.get_kind_at_index(&AnnotationKind::Lemma, 1).len(), 1);
//! # Ok::<(), glosstrack::AnnoError>(())
//! ```

mod annotated;
mod annotation;
mod codepoint;

pub use annotated::{AnnotatedText, PortableAnnotatedText, PortableAnnotation};
pub use annotation::{Annotation, AnnotationData, AnnotationId, AnnotationKind, HighlightMark};
pub use codepoint::{codepoint_len, CodepointText};
