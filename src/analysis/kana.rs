//! Hiragana / katakana normalisation.
//!
//! Both syllabaries occupy parallel Unicode blocks 0x60 apart, so conversion
//! is a per-character offset. Everything outside the convertible range
//! (kanji, the long-vowel mark, Latin, ...) passes through unchanged.

const KANA_OFFSET: u32 = 0x60;

fn is_convertible_hiragana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{3096}' | '\u{309D}'..='\u{309E}')
}

fn is_convertible_katakana(c: char) -> bool {
    matches!(c, '\u{30A1}'..='\u{30F6}' | '\u{30FD}'..='\u{30FE}')
}

fn shift(c: char, up: bool) -> char {
    let code = if up {
        u32::from(c) + KANA_OFFSET
    } else {
        u32::from(c) - KANA_OFFSET
    };
    char::from_u32(code).unwrap_or(c)
}

/// Convert hiragana in `s` to katakana
#[must_use]
pub fn hira_to_kata(s: &str) -> String {
    s.chars()
        .map(|c| if is_convertible_hiragana(c) { shift(c, true) } else { c })
        .collect()
}

/// Convert katakana in `s` to hiragana
#[must_use]
pub fn kata_to_hira(s: &str) -> String {
    s.chars()
        .map(|c| if is_convertible_katakana(c) { shift(c, false) } else { c })
        .collect()
}

/// Whether `c` is hiragana or katakana (including the prolonged sound mark)
#[must_use]
pub fn is_kana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}')
}
