//! Subtitle ingestion for glosstrack
//!
//! Turns subtitle files into time-indexed annotated text.
//!
//! # Features
//!
//! - **SRT parsing** - best-effort, CRLF tolerant, malformed blocks skipped
//! - **Language detection** - script-count heuristic over supported languages
//! - **Track loading** - one auto-annotated chunk per subtitle block
//!
//! # Example
//!
//! ```rust
//! use glosstrack::subtitle::load_subtitle_track;
//!
//! let srt = "1\n00:00:01,000 --> 00:00:03,500\nこんにちは\n\n";
//! let track = load_subtitle_track(srt, None, None)?;
//! assert_eq!(track.language, "ja");
//! assert_eq!(track.chunk_set.get_chunks_at_time(2.0).len(), 1);
//! # Ok::<(), glosstrack::AnnoError>(())
//! ```

pub mod srt;
pub mod track;

pub use srt::{parse_srt, SubtitleRecord};
pub use track::{detect_language, load_subtitle_track, SubtitleTrack, SUPPORTED_LANGUAGES};
