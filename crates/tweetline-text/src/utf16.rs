//! UTF-16 addressing helpers for display offsets.

use tweetline_types::DisplayOffset;

/// UTF-16 indices of every high surrogate that starts a surrogate pair in
/// `text`, ascending. One entry per supplementary-plane character.
pub fn surrogate_pair_indices(text: &str) -> Vec<usize> {
    let mut indices = Vec::new();
    let mut unit = 0;
    for c in text.chars() {
        if c.len_utf16() == 2 {
            indices.push(unit);
        }
        unit += c.len_utf16();
    }
    indices
}

pub fn len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// `text[start..end)` addressed in UTF-16 units.
///
/// `None` for negative, reversed or out-of-range bounds. A bound that splits
/// a surrogate pair yields a lossy replacement character instead of failing.
pub fn slice(text: &str, start: DisplayOffset, end: DisplayOffset) -> Option<String> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let (s, e) = (start.to_index()?, end.to_index()?);
    if s > e || e > units.len() {
        return None;
    }
    Some(String::from_utf16_lossy(&units[s..e]))
}
