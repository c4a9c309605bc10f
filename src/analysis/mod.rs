//! Auto-annotation from morphological analyzer output.
//!
//! The analyzer itself (kuromoji, MeCab, ...) is an external collaborator
//! behind the [`Analyzer`] trait. This module only turns its tokens into
//! ruby annotations:
//!
//! - **Alignment** - each token's surface form must match the text at its
//!   offset, tokens must be in order and non-overlapping, and only whitespace
//!   may go untokenized. Any violation fails the whole batch.
//! - **Filtering** - symbols, tokens without a basic form, and tokens whose
//!   reading adds nothing over the surface form produce no annotation.
//! - **Readiness** - analyzers are loaded asynchronously by the host and
//!   handed over through an [`AnalyzerSlot`]; using an empty slot is an
//!   [`AnnoError::AnalyzerNotReady`] error.

pub mod kana;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AnnoError, Result};
use crate::text::{codepoint_len, AnnotatedText, Annotation, AnnotationData, CodepointText};

use kana::{hira_to_kata, kata_to_hira};

/// How an analyzer numbers token positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionBase {
    #[default]
    Zero,
    /// kuromoji's `word_position` is 1-based
    One,
}

/// One token as reported by the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Code-point start offset in the analyzer's own base
    pub position: usize,
    pub surface_form: String,
    /// Dictionary form, `None` or a placeholder when unknown
    pub basic_form: Option<String>,
    /// Phonetic reading (katakana for Japanese analyzers)
    pub reading: Option<String>,
    pub part_of_speech: String,
}

/// A morphological analyzer for a single language
pub trait Analyzer: Send + Sync {
    /// Language code the analyzer handles (e.g. `"ja"`)
    fn language(&self) -> &str;

    fn position_base(&self) -> PositionBase;

    /// Tokenize the whole of `text`, in order
    fn tokenize(&self, text: &str) -> Result<Vec<Token>>;
}

/// Holder for an analyzer that becomes available once loading finishes.
///
/// Filled at most once; readers get [`AnnoError::AnalyzerNotReady`] until
/// then.
#[derive(Debug)]
pub struct AnalyzerSlot<A> {
    cell: OnceCell<A>,
}

impl<A> AnalyzerSlot<A> {
    /// An empty slot, waiting for [`install`](Self::install)
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// A slot that is ready immediately
    #[must_use]
    pub fn ready(analyzer: A) -> Self {
        Self {
            cell: OnceCell::with_value(analyzer),
        }
    }

    /// Install the loaded analyzer. Gives it back if the slot is already full.
    pub fn install(&self, analyzer: A) -> std::result::Result<(), A> {
        self.cell.set(analyzer)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Result<&A> {
        self.cell.get().ok_or(AnnoError::AnalyzerNotReady)
    }
}

impl<A> Default for AnalyzerSlot<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Token filtering policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Part-of-speech tags that never get ruby (punctuation, symbols)
    pub skip_parts_of_speech: Vec<String>,
    /// Analyzer's "no information" value for basic form and reading
    pub placeholder: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            skip_parts_of_speech: vec!["記号".to_string(), "補助記号".to_string()],
            placeholder: "*".to_string(),
        }
    }
}

impl MapperConfig {
    fn is_informative(&self, value: Option<&str>) -> bool {
        value.is_some_and(|v| !v.is_empty() && v != self.placeholder)
    }
}

/// Turn `tokens` into ruby annotations over `text`.
///
/// Validates the whole batch before returning anything: a single misaligned
/// or out-of-order token fails the call.
pub fn map_tokens(
    text: &CodepointText,
    tokens: &[Token],
    base: PositionBase,
    config: &MapperConfig,
) -> Result<Vec<Annotation>> {
    let mut annotations = Vec::new();
    let mut previous_end = 0;

    for token in tokens {
        let cp_begin = match base {
            PositionBase::Zero => token.position,
            PositionBase::One => token.position.checked_sub(1).ok_or_else(|| {
                AnnoError::Analyzer("token position 0 from a 1-based analyzer".to_string())
            })?,
        };
        if cp_begin < previous_end {
            return Err(AnnoError::TokenOrder {
                cp_begin,
                previous_end,
            });
        }

        let Some(cp_end) = cp_begin.checked_add(codepoint_len(&token.surface_form)) else {
            return Err(AnnoError::Misaligned {
                cp_begin,
                expected: token.surface_form.clone(),
                found: String::new(),
            });
        };
        let found = text.slice(cp_begin, cp_end);
        if cp_end > text.len() || found != token.surface_form {
            return Err(AnnoError::Misaligned {
                cp_begin,
                expected: token.surface_form.clone(),
                found,
            });
        }
        ensure_whitespace_gap(text, previous_end, cp_begin)?;
        previous_end = cp_end;

        if config.skip_parts_of_speech.contains(&token.part_of_speech)
            || !config.is_informative(token.basic_form.as_deref())
            || !config.is_informative(token.reading.as_deref())
        {
            continue;
        }

        let Some(reading) = token.reading.as_deref() else {
            continue;
        };
        if hira_to_kata(reading) == hira_to_kata(&token.surface_form) {
            continue;
        }

        annotations.push(Annotation::new(
            cp_begin,
            cp_end,
            AnnotationData::Ruby(kata_to_hira(reading)),
        ));
    }

    ensure_whitespace_gap(text, previous_end, text.len())?;
    Ok(annotations)
}

fn ensure_whitespace_gap(text: &CodepointText, from: usize, to: usize) -> Result<()> {
    if text.chars()[from..to].iter().all(|c| c.is_whitespace()) {
        Ok(())
    } else {
        Err(AnnoError::TokenOrder {
            cp_begin: to,
            previous_end: from,
        })
    }
}

/// Runs an analyzer over text units and attaches the resulting ruby
pub struct AutoAnnotator<'a> {
    analyzer: &'a dyn Analyzer,
    config: MapperConfig,
}

impl<'a> AutoAnnotator<'a> {
    #[must_use]
    pub fn new(analyzer: &'a dyn Analyzer, config: MapperConfig) -> Self {
        Self { analyzer, config }
    }

    /// Borrow the analyzer out of `slot`, failing if it is not loaded yet
    pub fn from_slot<A: Analyzer>(slot: &'a AnalyzerSlot<A>, config: MapperConfig) -> Result<Self> {
        let analyzer: &'a dyn Analyzer = slot.get()?;
        Ok(Self::new(analyzer, config))
    }

    #[must_use]
    pub fn language(&self) -> &str {
        self.analyzer.language()
    }

    /// Compute the ruby batch for `text` in `language`
    pub fn ruby_for(&self, text: &CodepointText, language: &str) -> Result<Vec<Annotation>> {
        if self.analyzer.language() != language {
            return Err(AnnoError::UnsupportedLanguage {
                analyzer: self.analyzer.language().to_string(),
                requested: language.to_string(),
            });
        }
        let tokens = self.analyzer.tokenize(&text.to_string())?;
        map_tokens(text, &tokens, self.analyzer.position_base(), &self.config)
    }

    /// Add auto-generated ruby to `text`. All-or-nothing.
    pub fn annotate(&self, text: &AnnotatedText, language: &str) -> Result<AnnotatedText> {
        let batch = self.ruby_for(text.text(), language)?;
        debug!("Auto-annotation produced {} ruby entries", batch.len());
        text.insert_annotations(batch)
    }

    /// Create an annotated text for `raw`, falling back to no annotations
    /// if analysis fails. The failure is logged, never swallowed silently.
    #[must_use]
    pub fn annotate_or_plain(&self, raw: &str, language: &str) -> AnnotatedText {
        let plain = AnnotatedText::new(raw);
        match self.annotate(&plain, language) {
            Ok(annotated) => annotated,
            Err(e) => {
                warn!("Auto-annotation failed for {:?}: {}", raw, e);
                plain
            }
        }
    }
}
