//! Entity text reconciler.
//!
//! Turns a raw [`Tweet`](tweetline_types::Tweet) into display text whose
//! entity spans index correctly into it, and optionally into [`RichText`]
//! with clickable link spans.
//!
//! ```text
//! format_tweet_text ─▶ FormattedText ─▶ linkify_urls ─▶ RichText
//!   (unescape, shift)                   (merge, splice, strip photo)
//! ```
//!
//! Nothing here fails: malformed references pass through verbatim and
//! out-of-range entities are skipped at render time.

pub mod entity;
pub mod format;
pub mod html;
pub mod linkify;
pub mod utf16;

pub use entity::{EntityKind, FormattedEntity, FormattedText};
pub use format::{
    adjust_entities_with_offsets, adjust_indices_for_escaped_chars,
    adjust_indices_for_supplementary_chars, convert_entities, format, format_tweet_text,
};
pub use html::{EscapeSpan, Unescaped, unescape};
pub use linkify::{LinkClickListener, LinkSpan, RichText, linkify_urls, merge_and_sort_entities};
