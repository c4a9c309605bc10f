//! `glosstrack` - Annotated transcript text for language-learning players
//!
//! # Features
//!
//! - **Annotated text**: immutable code-point text with ruby, lemma, highlight
//!   and custom annotations over half-open ranges
//! - **Rendering**: overlapping annotations resolved into a well-nested tree,
//!   plain text or HTML
//! - **Auto-annotation**: morphological analyzer tokens mapped to ruby
//! - **Time chunks**: subtitle lines indexed by whole second for O(1) playback
//!   lookup
//! - **Ingestion**: SRT parsing and language detection
//!
//! # Example
//!
//! ```rust
//! use glosstrack::{load_subtitle_track, render, render_plain};
//!
//! let srt = "1\n00:00:01,000 --> 00:00:03,500\nこんにちは\n\n";
//! let track = load_subtitle_track(srt, None, None)?;
//! for chunk in track.chunk_set.get_chunks_at_time(1.5) {
//!     println!("{}", render_plain(&render(chunk.anno_text())));
//! }
//! # Ok::<(), glosstrack::AnnoError>(())
//! ```

pub mod analysis;
pub mod chunk;
pub mod config;
pub mod error;
pub mod lookup;
pub mod render;
pub mod subtitle;
pub mod text;

pub use analysis::{Analyzer, AnalyzerSlot, AutoAnnotator, MapperConfig, PositionBase, Token};
pub use chunk::{ChunkId, ChunkSet, PortableChunkSet, TimeRange, TimeRangeChunk};
pub use config::Config;
pub use error::{AnnoError, Result};
pub use lookup::{lemma_links, DictionarySite, LemmaLinks};
pub use render::{render, render_plain, KindPriority, RenderNode, Renderer};
pub use subtitle::{detect_language, load_subtitle_track, parse_srt, SubtitleRecord, SubtitleTrack};
pub use text::{
    AnnotatedText, Annotation, AnnotationData, AnnotationId, AnnotationKind, CodepointText,
    HighlightMark, PortableAnnotatedText,
};

/// Version of glosstrack
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
