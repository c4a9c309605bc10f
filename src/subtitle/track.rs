//! Subtitle track ingestion: SRT text in, indexed chunk set out.

use tracing::{debug, info};

use super::srt::parse_srt;
use crate::analysis::kana::is_kana;
use crate::analysis::AutoAnnotator;
use crate::chunk::{ChunkSet, TimeRangeChunk};
use crate::error::Result;
use crate::text::AnnotatedText;

/// Languages [`detect_language`] can report
pub const SUPPORTED_LANGUAGES: &[&str] = &["ja", "en"];

/// A loaded subtitle track
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleTrack {
    /// Language code, detected or given
    pub language: String,
    pub chunk_set: ChunkSet,
}

/// Guess the language of `text` among [`SUPPORTED_LANGUAGES`].
///
/// Counts Japanese characters (kana and CJK ideographs) against Latin
/// letters. Japanese wins only with a strict majority; empty or
/// letter-free text is reported as English.
#[must_use]
pub fn detect_language(text: &str) -> &'static str {
    let (mut japanese, mut latin) = (0usize, 0usize);
    for c in text.chars() {
        if is_kana(c) || is_cjk_ideograph(c) {
            japanese += 1;
        } else if c.is_ascii_alphabetic() {
            latin += 1;
        }
    }
    if japanese > latin {
        "ja"
    } else {
        "en"
    }
}

fn is_cjk_ideograph(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}

/// Parse `content` as SRT and build a chunk set with one chunk per block.
///
/// `language` overrides detection. When an `annotator` for the track's
/// language is given, each line gets auto-generated ruby; a line whose
/// analysis fails is kept with no annotations.
pub fn load_subtitle_track(
    content: &str,
    language: Option<&str>,
    annotator: Option<&AutoAnnotator<'_>>,
) -> Result<SubtitleTrack> {
    let records = parse_srt(content);

    let language = match language {
        Some(lang) => lang.to_string(),
        None => {
            let combined: String = records.iter().map(|r| r.lines.as_str()).collect();
            detect_language(&combined).to_string()
        }
    };

    let annotator = annotator.filter(|a| a.language() == language);
    if annotator.is_none() {
        debug!("No analyzer for {language}, ingesting without auto-annotation");
    }

    let chunks = records
        .into_iter()
        .map(|record| {
            let anno_text = match annotator {
                Some(a) => a.annotate_or_plain(&record.lines, &language),
                None => AnnotatedText::new(record.lines.as_str()),
            };
            TimeRangeChunk::new(record.begin, record.end, anno_text)
        })
        .collect::<Result<Vec<_>>>()?;

    let chunk_set = ChunkSet::new(chunks)?;
    info!(
        "Loaded subtitle track: {} chunks, language {}",
        chunk_set.len(),
        language
    );

    Ok(SubtitleTrack {
        language,
        chunk_set,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analyzer, MapperConfig, PositionBase, Token};
    use crate::text::AnnotationKind;

    /// Treats every run of CJK ideographs as a word read "カンジ"
    struct IdeographAnalyzer;

    impl Analyzer for IdeographAnalyzer {
        fn language(&self) -> &str {
            "ja"
        }

        fn position_base(&self) -> PositionBase {
            PositionBase::Zero
        }

        fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
            let mut tokens = Vec::new();
            for (position, c) in text.chars().enumerate() {
                if c.is_whitespace() {
                    continue;
                }
                let reading = if is_cjk_ideograph(c) {
                    "カンジ".to_string()
                } else {
                    c.to_string()
                };
                tokens.push(Token {
                    position,
                    surface_form: c.to_string(),
                    basic_form: Some(c.to_string()),
                    reading: Some(reading),
                    part_of_speech: "名詞".to_string(),
                });
            }
            Ok(tokens)
        }
    }

    const JA_SRT: &str = "1\n00:00:01,000 --> 00:00:03,500\nこんにちは\n\n\
        2\n00:00:04,000 --> 00:00:06,000\n漢字です\n\n";

    #[test]
    fn detects_languages() {
        assert_eq!(detect_language("こんにちは、世界"), "ja");
        assert_eq!(detect_language("Hello there"), "en");
        assert_eq!(detect_language(""), "en");
        assert_eq!(detect_language("OK、行こう"), "ja");
    }

    #[test]
    fn ingests_plain_track() {
        let track = load_subtitle_track(JA_SRT, None, None).unwrap();
        assert_eq!(track.language, "ja");
        assert_eq!(track.chunk_set.len(), 2);

        let hits = track.chunk_set.get_chunks_at_time(2.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].anno_text().text().to_string(), "こんにちは\n");
        assert!(track.chunk_set.get_chunks_at_time(3.75).is_empty());
    }

    #[test]
    fn ingests_with_auto_annotation() {
        let analyzer = IdeographAnalyzer;
        let annotator = AutoAnnotator::new(&analyzer, MapperConfig::default());
        let track = load_subtitle_track(JA_SRT, None, Some(&annotator)).unwrap();

        let chunk = track.chunk_set.get_last_chunk_at_time(5.0).unwrap();
        let ruby = chunk
            .anno_text()
            .get_kind_in_range(&AnnotationKind::Ruby, 0, 4);
        assert_eq!(ruby.len(), 2);
    }

    #[test]
    fn language_override_skips_mismatched_analyzer() {
        let analyzer = IdeographAnalyzer;
        let annotator = AutoAnnotator::new(&analyzer, MapperConfig::default());
        let track = load_subtitle_track(JA_SRT, Some("en"), Some(&annotator)).unwrap();
        assert_eq!(track.language, "en");
        assert!(track
            .chunk_set
            .iter()
            .all(|c| c.anno_text().annotations().is_empty()));
    }
}
