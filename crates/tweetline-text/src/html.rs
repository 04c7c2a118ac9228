//! HTML character reference unescaping with span recording.
//!
//! The server escapes `&`, `<`, `>` (and occasionally other characters) in
//! item text while its entity indices still count the escaped form. Every
//! reference we collapse is recorded as an [`EscapeSpan`] so the reconciler
//! can shift entity offsets afterwards.
//!
//! Decoding of each candidate `&...;` is delegated to `html_escape`, which
//! knows the HTML named set plus decimal `&#34;` and hex `&#x22;` forms. A
//! candidate counts only when it collapses to exactly one character. Anything
//! else (`&#;`, `&amp` with no terminator, unknown names, out-of-range code
//! points) is copied through verbatim and records nothing.

use tweetline_types::RawOffset;

/// Longest reference body we scan for between `&` and `;`. The longest
/// named reference (`CounterClockwiseContourIntegral`) is 31 characters.
const MAX_REFERENCE_LEN: usize = 32;

/// A collapsed reference in the *raw* text. `end` is inclusive (the `;`).
///
/// The reference shrank by `end - start` characters: `&amp;` at `[0, 4]`
/// became one `&`, shrinking by 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscapeSpan {
    pub start: RawOffset,
    pub end: RawOffset,
}

impl EscapeSpan {
    pub fn shrinkage(&self) -> i64 {
        self.end - self.start
    }
}

/// Result of [`unescape`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unescaped {
    pub text: String,
    /// Collapsed references in ascending order.
    pub spans: Vec<EscapeSpan>,
}

/// Unescape `raw`, recording the raw-text span of each reference collapsed.
pub fn unescape(raw: &str) -> Unescaped {
    let chars: Vec<char> = raw.chars().collect();
    let mut text = String::with_capacity(raw.len());
    let mut spans = Vec::new();

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != '&' {
            text.push(c);
            i += 1;
            continue;
        }

        match parse_reference(&chars, i) {
            Some((decoded, semi)) => {
                text.push(decoded);
                spans.push(EscapeSpan {
                    start: RawOffset(i as i64),
                    end: RawOffset(semi as i64),
                });
                i = semi + 1;
            }
            None => {
                text.push('&');
                i += 1;
            }
        }
    }

    Unescaped { text, spans }
}

/// Try to decode the reference starting at `chars[amp] == '&'`.
///
/// Returns the decoded char and the index of the terminating `;`.
fn parse_reference(chars: &[char], amp: usize) -> Option<(char, usize)> {
    let body_start = amp + 1;
    let limit = chars.len().min(body_start + MAX_REFERENCE_LEN + 1);

    let semi = (body_start..limit)
        .take_while(|&j| chars[j] != '&' && !chars[j].is_whitespace())
        .find(|&j| chars[j] == ';')?;

    let candidate: String = chars[amp..=semi].iter().collect();
    let decoded = html_escape::decode_html_entities(&candidate);
    let mut out = decoded.chars();
    match (out.next(), out.next()) {
        // invalid code points come back as U+FFFD
        (Some(c), None) if c != char::REPLACEMENT_CHARACTER => Some((c, semi)),
        _ => None,
    }
}
