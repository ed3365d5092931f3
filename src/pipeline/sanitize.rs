//! Text sanitisation: fold arbitrary Unicode into the single-byte repertoire
//! the standard PDF fonts can draw, and pre-split runaway tokens.
//!
//! The report uses the 14 standard Type 1 fonts (Helvetica family) with
//! `WinAnsiEncoding`, so only code points up to U+00FF are renderable.
//! Typographic punctuation that models love to emit is folded to ASCII first;
//! everything else outside Latin-1 (emoji, CJK, Cyrillic, …) is dropped.
//! That loss is accepted: an unreadable glyph box is worse than a missing one.

/// Typographic characters folded to ASCII before the Latin-1 filter.
const REPLACEMENTS: [(char, char); 6] = [
    ('\u{2013}', '-'), // en dash
    ('\u{2014}', '-'), // em dash
    ('\u{2212}', '-'), // minus sign
    ('\u{2022}', '-'), // bullet
    ('\u{00B7}', '-'), // middle dot
    ('\u{00A0}', ' '), // non-breaking space
];

/// Default token length for [`soft_wrap_tokens`].
pub const DEFAULT_SOFT_WRAP_LEN: usize = 60;

/// Normalise `text` into the Latin-1 repertoire.
///
/// 1. The six characters in the replacement table map to `-` or a space.
/// 2. Any remaining character above U+00FF is discarded, not substituted.
///
/// Total and pure: empty input yields an empty string.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| {
            REPLACEMENTS
                .iter()
                .find(|(from, _)| *from == c)
                .map_or(c, |(_, to)| *to)
        })
        .filter(|c| u32::from(*c) <= 0xFF)
        .collect()
}

/// Insert line breaks inside space-delimited tokens longer than `max_len`
/// characters so the word-wrapping layout can still fit them.
///
/// Chunking is by character count, not word-aware. A token that already
/// contains `\n` is measured per line segment, which makes the function
/// idempotent: once every segment is at most `max_len`, nothing changes.
/// `max_len == 0` returns the text unchanged.
pub fn soft_wrap_tokens(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return text.to_string();
    }
    text.split(' ')
        .map(|token| {
            token
                .split('\n')
                .map(|segment| chunk_segment(segment, max_len))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn chunk_segment(segment: &str, max_len: usize) -> String {
    if segment.chars().count() <= max_len {
        return segment.to_string();
    }
    let chars: Vec<char> = segment.chars().collect();
    chars
        .chunks(max_len)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
