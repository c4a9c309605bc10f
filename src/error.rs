//! Error taxonomy shared by the text, chunk and analysis engines.

use thiserror::Error;

use crate::chunk::ChunkId;
use crate::text::AnnotationId;

/// Errors raised by the annotation and chunk engines
#[derive(Error, Debug)]
pub enum AnnoError {
    /// Code-point range outside `[0, len]` or with `begin > end`
    #[error("range [{begin}, {end}) is invalid for text of length {len}")]
    OutOfRange { begin: usize, end: usize, len: usize },

    #[error("annotation {0} not found")]
    AnnotationNotFound(AnnotationId),

    #[error("chunk {0} not found")]
    ChunkNotFound(ChunkId),

    #[error("duplicate chunk id {0}")]
    DuplicateChunk(ChunkId),

    #[error("invalid time range [{begin}, {end})")]
    InvalidTimeRange { begin: f64, end: f64 },

    #[error("analyzer is not ready")]
    AnalyzerNotReady,

    #[error("analyzer for {analyzer:?} cannot analyze {requested:?} text")]
    UnsupportedLanguage { analyzer: String, requested: String },

    /// Token surface form does not match the source text at its offset
    #[error("token at code point {cp_begin} is {expected:?} but text has {found:?}")]
    Misaligned {
        cp_begin: usize,
        expected: String,
        found: String,
    },

    /// Tokens overlap, run backwards, or skip non-whitespace text
    #[error("token at code point {cp_begin} does not follow previous token ending at {previous_end}")]
    TokenOrder { cp_begin: usize, previous_end: usize },

    #[error("analyzer error: {0}")]
    Analyzer(String),

    #[error("invalid portable data: {0}")]
    Portable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnnoError>;
