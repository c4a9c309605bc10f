//! Text addressed by Unicode code point rather than UTF-8 byte.

use std::fmt;

/// An immutable sequence of code points.
///
/// All offsets used elsewhere in the crate index into this sequence, so a
/// range boundary can never split a multi-byte character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CodepointText {
    chars: Vec<char>,
}

impl CodepointText {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    /// Number of code points
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Code point at `index`, if any
    #[must_use]
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Whether `[begin, end)` is a valid half-open range into this text
    #[must_use]
    pub fn contains_range(&self, begin: usize, end: usize) -> bool {
        begin <= end && end <= self.chars.len()
    }

    /// Collect `[begin, end)` into a `String`, clamping to the text bounds
    #[must_use]
    pub fn slice(&self, begin: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let begin = begin.min(end);
        self.chars[begin..end].iter().collect()
    }
}

impl fmt::Display for CodepointText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.chars {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl From<&str> for CodepointText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for CodepointText {
    fn from(text: String) -> Self {
        Self::new(&text)
    }
}

/// Length of `s` in code points
#[must_use]
pub fn codepoint_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_code_points() {
        // "🎬" is 4 bytes and 1 code point
        let text = CodepointText::new("a🎬食べる");
        assert_eq!(text.len(), 5);
        assert_eq!(text.char_at(1), Some('🎬'));
        assert_eq!(text.slice(2, 5), "食べる");
    }

    #[test]
    fn slice_clamps() {
        let text = CodepointText::new("abc");
        assert_eq!(text.slice(1, 10), "bc");
        assert_eq!(text.slice(5, 10), "");
    }

    #[test]
    fn range_check() {
        let text = CodepointText::new("abc");
        assert!(text.contains_range(0, 3));
        assert!(text.contains_range(3, 3));
        assert!(!text.contains_range(2, 1));
        assert!(!text.contains_range(0, 4));
    }

    #[test]
    fn display_round_trips() {
        let s = "こんにちは\n世界";
        assert_eq!(CodepointText::new(s).to_string(), s);
        assert_eq!(codepoint_len(s), 8);
    }
}
