//! Raw item text + raw entities → display text + display-space entities.
//!
//! # Pipeline
//!
//! ```text
//! Tweet ──convert_entities──▶ FormattedText<RawOffset>   (server offsets)
//!        ──format──┬─ html::unescape            text unescaped, escape spans recorded
//!                  ├─ adjust_indices_for_escaped_chars     still RawOffset (chars)
//!                  └─ adjust_entities_with_offsets         RawOffset → DisplayOffset (UTF-16)
//!                                                ▼
//!                                      FormattedText<DisplayOffset>
//! ```
//!
//! Formatting is deterministic but allocates and walks the text several
//! times; callers cache the result per item instead of formatting on every
//! render.

use tracing::trace;
use tweetline_types::{DisplayOffset, RawOffset, Tweet};

use crate::entity::{FormattedEntity, FormattedText};
use crate::html::{self, EscapeSpan};
use crate::utf16;

/// Format an item for display. `None` in, `None` out.
pub fn format_tweet_text(tweet: Option<&Tweet>) -> Option<FormattedText> {
    let tweet = tweet?;
    let mut staged = FormattedText::<RawOffset>::default();
    convert_entities(&mut staged, tweet);
    Some(format(staged, tweet))
}

/// Append one formatted entity per raw url and media entity, in source order.
pub fn convert_entities(staged: &mut FormattedText<RawOffset>, tweet: &Tweet) {
    let Some(entities) = tweet.entities.as_ref() else {
        return;
    };
    staged.url_entities.extend(entities.urls().iter().map(FormattedEntity::from_url));
    staged.media_entities.extend(entities.media().iter().map(FormattedEntity::from_media));
}

/// Unescape the item text and move the staged entities into display space.
///
/// An item with empty or absent text leaves `staged.text` as it was; its
/// entities cross into display space with no shift, since there is nothing
/// to reconcile them against.
pub fn format(staged: FormattedText<RawOffset>, tweet: &Tweet) -> FormattedText {
    let FormattedText {
        text,
        mut url_entities,
        mut media_entities,
    } = staged;

    let raw = tweet.raw_text();
    if raw.is_empty() {
        return FormattedText {
            text,
            url_entities: adjust_entities_with_offsets(url_entities, &[]),
            media_entities: adjust_entities_with_offsets(media_entities, &[]),
        };
    }

    let unescaped = html::unescape(raw);
    adjust_indices_for_escaped_chars(&mut url_entities, &unescaped.spans);
    adjust_indices_for_escaped_chars(&mut media_entities, &unescaped.spans);

    let pairs = utf16::surrogate_pair_indices(&unescaped.text);
    trace!(
        tweet_id = tweet.id,
        escapes = unescaped.spans.len(),
        surrogate_pairs = pairs.len(),
        "reconciled entity offsets"
    );

    FormattedText {
        url_entities: adjust_entities_with_offsets(url_entities, &pairs),
        media_entities: adjust_entities_with_offsets(media_entities, &pairs),
        text: unescaped.text,
    }
}

/// Shift entity offsets left by the shrinkage of collapsed references.
///
/// Escapes ending before `entity.start` shift both bounds; escapes ending
/// inside `[start, end)` shrink only `end`. Entities must be sorted by
/// `start`: a marker advances through `escapes` so each prior escape is
/// accumulated once for the whole sweep.
pub fn adjust_indices_for_escaped_chars(
    entities: &mut [FormattedEntity<RawOffset>],
    escapes: &[EscapeSpan],
) {
    if escapes.is_empty() {
        return;
    }

    let mut marker = 0;
    let mut diff = 0;
    for entity in entities.iter_mut() {
        let mut in_diff = 0;
        for escape in &escapes[marker..] {
            if escape.end < entity.start {
                diff += escape.shrinkage();
                marker += 1;
            } else if escape.end < entity.end {
                in_diff += escape.shrinkage();
            }
        }
        entity.start = entity.start - diff;
        entity.end = entity.end - (diff + in_diff);
    }
}

/// Move entities from server char offsets to UTF-16 offsets into `text`,
/// the already-unescaped display text.
pub fn adjust_indices_for_supplementary_chars(
    entities: Vec<FormattedEntity<RawOffset>>,
    text: &str,
) -> Vec<FormattedEntity<DisplayOffset>> {
    adjust_entities_with_offsets(entities, &utf16::surrogate_pair_indices(text))
}

/// Move entities from server char offsets to UTF-16 display offsets.
///
/// `pair_indices` are the UTF-16 positions of surrogate pairs in the display
/// text. Each pair at or before the entity's start (in char terms) pushes
/// both bounds right by one unit; the scan stops at the first pair past it.
pub fn adjust_entities_with_offsets(
    entities: Vec<FormattedEntity<RawOffset>>,
    pair_indices: &[usize],
) -> Vec<FormattedEntity<DisplayOffset>> {
    entities
        .into_iter()
        .map(|entity| {
            let start = entity.start.get();
            let mut offset = 0i64;
            for &index in pair_indices {
                if (index as i64).saturating_sub(offset) <= start {
                    offset += 1;
                } else {
                    break;
                }
            }
            entity.map_offsets(|o| DisplayOffset((o + offset).get()))
        })
        .collect()
}
