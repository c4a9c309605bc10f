//! `SubRip` (.srt) parsing.
//!
//! Best-effort: blocks that do not match the expected shape are skipped
//! rather than failing the whole file, since partial or hand-edited subtitle
//! files are common.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One parsed subtitle block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleRecord {
    /// Start time in seconds
    pub begin: f64,
    /// End time in seconds
    pub end: f64,
    /// Text lines, each terminated by `\n`
    pub lines: String,
}

/// `index`, `HH:MM:SS,mmm --> HH:MM:SS,mmm`, then one or more non-empty lines
static SRT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([0-9]+)\n([0-9]{2}):([0-9]{2}):([0-9]{2}),([0-9]{3}) --> ([0-9]{2}):([0-9]{2}):([0-9]{2}),([0-9]{3})\n((?:.+\n)+)",
    )
    .unwrap()
});

/// Parse SRT content into records, in file order.
///
/// CRLF and LF line endings are both accepted. A final block missing its
/// trailing newline is still recognised. Blocks whose end precedes their
/// begin are dropped like any other malformed block.
#[must_use]
pub fn parse_srt(content: &str) -> Vec<SubtitleRecord> {
    let mut normalized = content.replace("\r\n", "\n");
    if !normalized.ends_with('\n') {
        normalized.push('\n');
    }

    let mut records = Vec::new();
    for caps in SRT_BLOCK.captures_iter(&normalized) {
        let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        let (Some(begin), Some(end)) = (
            parse_time(field(2), field(3), field(4), field(5)),
            parse_time(field(6), field(7), field(8), field(9)),
        ) else {
            debug!("Skipping SRT block {} with unreadable timestamps", field(1));
            continue;
        };

        if end < begin {
            debug!("Skipping SRT block {}: ends before it begins", field(1));
            continue;
        }

        records.push(SubtitleRecord {
            begin,
            end,
            lines: field(10).to_string(),
        });
    }

    debug!("Parsed {} SRT blocks", records.len());
    records
}

/// `3600*H + 60*M + S + ms/1000` in seconds; minutes and seconds must be below 60
fn parse_time(hours: &str, minutes: &str, seconds: &str, millis: &str) -> Option<f64> {
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    let millis: u32 = millis.parse().ok()?;
    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    Some(
        f64::from(hours) * 3600.0
            + f64::from(minutes) * 60.0
            + f64::from(seconds)
            + f64::from(millis) / 1000.0,
    )
}
