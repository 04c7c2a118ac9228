//! Display text → rich text with clickable link spans.
//!
//! [`linkify_urls`] walks the merged entity list left to right over a UTF-16
//! buffer, swapping each short url for its display form and recording a
//! [`LinkSpan`] over the replacement. Every splice changes the buffer length,
//! so a running offset maps later entities from [`FormattedText`] coordinates
//! onto the buffer being edited.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tracing::trace;
use tweetline_types::DisplayOffset;

use crate::entity::{FormattedEntity, FormattedText};
use crate::utf16;

/// Receives the target url when a [`LinkSpan`] is activated.
pub trait LinkClickListener: Send + Sync {
    fn on_url_clicked(&self, url: &str);
}

impl<F> LinkClickListener for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_url_clicked(&self, url: &str) {
        self(url)
    }
}

/// A clickable region of [`RichText`], in UTF-16 units.
#[derive(Clone)]
pub struct LinkSpan {
    pub start: DisplayOffset,
    pub end: DisplayOffset,
    pub url: String,
    pub link_color: u32,
    listener: Option<Arc<dyn LinkClickListener>>,
}

impl LinkSpan {
    pub fn is_clickable(&self) -> bool {
        self.listener.is_some()
    }

    /// Dispatch the span's url to its listener. No-op without one.
    pub fn click(&self) {
        if let Some(listener) = &self.listener {
            listener.on_url_clicked(&self.url);
        }
    }
}

impl fmt::Debug for LinkSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkSpan")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("url", &self.url)
            .field("link_color", &self.link_color)
            .field("clickable", &self.is_clickable())
            .finish()
    }
}

/// Text plus the link spans laid over it.
#[derive(Clone, Debug, Default)]
pub struct RichText {
    pub text: String,
    pub spans: Vec<LinkSpan>,
}

impl RichText {
    pub fn slice(&self, start: DisplayOffset, end: DisplayOffset) -> Option<String> {
        utf16::slice(&self.text, start, end)
    }

    /// Spans overlapping `[start, end)`.
    pub fn spans_in(&self, start: DisplayOffset, end: DisplayOffset) -> Vec<&LinkSpan> {
        self.spans
            .iter()
            .filter(|s| s.start < end && start < s.end)
            .collect()
    }
}

/// Combine url and media entities into one list ordered by `start`.
///
/// With no media the url list comes back borrowed as-is. Otherwise media is
/// laid down first and the stable sort keeps it ahead of a url sharing its
/// start.
pub fn merge_and_sort_entities<'a>(
    urls: &'a [FormattedEntity],
    media: Option<&[FormattedEntity]>,
) -> Cow<'a, [FormattedEntity]> {
    let Some(media) = media else {
        return Cow::Borrowed(urls);
    };
    let mut combined = Vec::with_capacity(urls.len() + media.len());
    combined.extend_from_slice(media);
    combined.extend_from_slice(urls);
    combined.sort_by_key(|e| e.start);
    Cow::Owned(combined)
}

/// Render `formatted` as rich text.
///
/// Entities with out-of-range or reversed bounds are skipped and their text
/// left plain. With `strip_last_photo`, the last photo entity is cut out of
/// the text entirely since the caller shows it as an inline image. Trailing
/// whitespace is trimmed from the result.
pub fn linkify_urls(
    formatted: Option<&FormattedText>,
    listener: Option<Arc<dyn LinkClickListener>>,
    strip_last_photo: bool,
    link_color: u32,
) -> RichText {
    let Some(formatted) = formatted else {
        return RichText::default();
    };
    if formatted.text.is_empty() {
        return RichText {
            text: formatted.text.clone(),
            spans: Vec::new(),
        };
    }

    let mut buf: Vec<u16> = formatted.text.encode_utf16().collect();
    let mut spans = Vec::new();
    let strip_target = strip_last_photo
        .then(|| formatted.last_photo_entity())
        .flatten();

    let entities = merge_and_sort_entities(&formatted.url_entities, Some(&formatted.media_entities));
    let mut offset = 0i64;
    for entity in entities.iter() {
        let start = entity.start.get().saturating_sub(offset);
        let end = entity.end.get().saturating_sub(offset);
        if start < 0 || end > buf.len() as i64 || start > end {
            trace!(
                start = entity.start.get(),
                end = entity.end.get(),
                len = buf.len(),
                "skipping entity outside text"
            );
            continue;
        }
        let (s, e) = (start as usize, end as usize);

        if strip_target.is_some_and(|photo| entity.is_photo() && entity.start == photo.start) {
            buf.drain(s..e);
            offset += end - start;
            continue;
        }

        // without a display form the span stays over the original text
        let new_end = match entity.display_url.as_deref().filter(|d| !d.is_empty()) {
            Some(display) => {
                let replacement: Vec<u16> = display.encode_utf16().collect();
                let new_end = start + replacement.len() as i64;
                buf.splice(s..e, replacement);
                new_end
            }
            None => end,
        };
        spans.push(LinkSpan {
            start: DisplayOffset(start),
            end: DisplayOffset(new_end),
            url: entity.url.clone(),
            link_color,
            listener: listener.clone(),
        });
        offset += end - new_end;
    }

    let text = String::from_utf16_lossy(&buf).trim_end().to_owned();
    let len = utf16::len(&text) as i64;
    spans.retain_mut(|span| {
        span.end = span.end.min(DisplayOffset(len));
        span.start < span.end
    });

    RichText { text, spans }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tweetline_types::{MediaEntity, RawOffset, UrlEntity};

    const BASE_TEXT: &str = "just setting up my twttr";

    fn display(e: FormattedEntity<RawOffset>) -> FormattedEntity {
        e.map_offsets(|o| DisplayOffset(o.get()))
    }

    fn url_entity(url: &str, display_url: &str, start: i64, end: i64) -> FormattedEntity {
        display(FormattedEntity::from_url(&UrlEntity::new(
            url,
            None,
            Some(display_url.into()),
            start,
            end,
        )))
    }

    fn media_entity(display_url: &str, start: i64, end: i64, kind: &str) -> FormattedEntity {
        display(FormattedEntity::from_media(&MediaEntity::new(
            "http://t.co/PFHCdlr4i0",
            Some(display_url.into()),
            start,
            end,
            kind,
        )))
    }

    fn one_url_text() -> FormattedText {
        let full = format!("{BASE_TEXT} http://t.co/foo");
        let start = BASE_TEXT.len() as i64 + 1;
        FormattedText {
            url_entities: vec![url_entity("http://t.co/foo", "dev.twitter.com", start, start + 15)],
            text: full,
            media_entities: Vec::new(),
        }
    }

    fn pic_twitter_text() -> FormattedText {
        FormattedText {
            text: "first link is a pictwitter http://t.co/PFHCdlr4i0 http://t.co/V3hLRdFdeN final text"
                .into(),
            url_entities: vec![url_entity("http://t.co/PFHCdlr4i0", "example.com", 50, 72)],
            media_entities: vec![media_entity("pic.twitter.com/abc", 27, 49, "photo")],
        }
    }

    #[test]
    fn test_linkify_none_and_empty() {
        let rich = linkify_urls(None, None, false, 0);
        assert!(rich.text.is_empty());
        assert!(rich.spans.is_empty());

        let rich = linkify_urls(Some(&FormattedText::default()), None, false, 0);
        assert!(rich.text.is_empty());
    }

    #[test]
    fn test_linkify_one_url_entity() {
        let formatted = one_url_text();
        let e = &formatted.url_entities[0];
        let rich = linkify_urls(Some(&formatted), None, false, 0);
        assert_eq!(rich.slice(e.start, e.end).as_deref(), Some("dev.twitter.com"));
        assert_eq!(rich.spans.len(), 1);
        assert_eq!(rich.spans[0].url, "http://t.co/foo");
        assert!(!rich.spans[0].is_clickable());
    }

    #[test]
    fn test_linkify_invalid_entity_on_empty_text() {
        let formatted = FormattedText {
            text: String::new(),
            url_entities: vec![url_entity("x z", "z", -1, 30)],
            media_entities: Vec::new(),
        };
        assert_eq!(linkify_urls(Some(&formatted), None, false, 0).text, "");
    }

    #[test]
    fn test_linkify_skips_bad_bounds_keeps_text() {
        let formatted = FormattedText {
            text: "keep this text".into(),
            url_entities: vec![
                url_entity("a", "A", -1, 3),
                url_entity("b", "B", 5, 99),
                url_entity("c", "C", 9, 4),
            ],
            media_entities: Vec::new(),
        };
        let rich = linkify_urls(Some(&formatted), None, false, 0);
        assert_eq!(rich.text, "keep this text");
        assert!(rich.spans.is_empty());
    }

    #[test]
    fn test_linkify_click_listener() {
        let clicked = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&clicked);
        let listener: Arc<dyn LinkClickListener> =
            Arc::new(move |url: &str| sink.lock().unwrap().push(url.to_owned()));

        let formatted = one_url_text();
        let e = &formatted.url_entities[0];
        let rich = linkify_urls(Some(&formatted), Some(listener), false, 0x1DA1F2);

        let hits = rich.spans_in(e.start, e.end);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].is_clickable());
        assert_eq!(hits[0].link_color, 0x1DA1F2);
        hits[0].click();
        assert_eq!(*clicked.lock().unwrap(), vec!["http://t.co/foo".to_string()]);
    }

    #[test]
    fn test_linkify_strip_photo_url_true() {
        let formatted = pic_twitter_text();
        let photo = &formatted.media_entities[0];
        assert!(photo.is_photo());

        let rich = linkify_urls(Some(&formatted), None, true, 0);
        assert!(!rich.text.contains("pic.twitter.com/abc"));
        assert_eq!(rich.text, "first link is a pictwitter  example.com final text");
        assert_eq!(rich.spans.len(), 1);
        let span = &rich.spans[0];
        assert_eq!(rich.slice(span.start, span.end).as_deref(), Some("example.com"));
    }

    #[test]
    fn test_linkify_strip_photo_url_false() {
        let formatted = pic_twitter_text();
        let rich = linkify_urls(Some(&formatted), None, false, 0);
        assert!(rich.text.contains("pic.twitter.com/abc"));
        assert_eq!(rich.spans.len(), 2);
        let texts: Vec<_> = rich
            .spans
            .iter()
            .map(|s| rich.slice(s.start, s.end).unwrap())
            .collect();
        assert_eq!(texts, vec!["pic.twitter.com/abc", "example.com"]);
    }

    #[test]
    fn test_linkify_strip_only_targets_photos() {
        let mut formatted = pic_twitter_text();
        formatted.media_entities = vec![media_entity("video.example/v", 27, 49, "video")];
        let rich = linkify_urls(Some(&formatted), None, true, 0);
        assert!(rich.text.contains("video.example/v"));
    }

    #[test]
    fn test_linkify_missing_display_url_keeps_text() {
        let mut entity = url_entity("http://t.co/x", "", 4, 17);
        entity.display_url = None;
        let formatted = FormattedText {
            text: "see http://t.co/x now".into(),
            url_entities: vec![entity],
            media_entities: Vec::new(),
        };
        let rich = linkify_urls(Some(&formatted), None, false, 0);
        assert_eq!(rich.text, "see http://t.co/x now");
        assert_eq!((rich.spans[0].start, rich.spans[0].end), (DisplayOffset(4), DisplayOffset(17)));
    }

    #[test]
    fn test_linkify_trims_trailing_whitespace() {
        let formatted = FormattedText {
            text: "see http://t.co/x  \n".into(),
            url_entities: vec![url_entity("http://t.co/x", "x.com", 4, 17)],
            media_entities: Vec::new(),
        };
        let rich = linkify_urls(Some(&formatted), None, false, 0);
        assert_eq!(rich.text, "see x.com");
        assert_eq!(rich.spans[0].end, DisplayOffset(9));
    }

    #[test]
    fn test_linkify_utf16_positions() {
        // 😀 occupies two units before the link
        let formatted = FormattedText {
            text: "😀 http://t.co/x".into(),
            url_entities: vec![url_entity("http://t.co/x", "x.com", 3, 16)],
            media_entities: Vec::new(),
        };
        let rich = linkify_urls(Some(&formatted), None, false, 0);
        assert_eq!(rich.text, "😀 x.com");
        let span = &rich.spans[0];
        assert_eq!((span.start, span.end), (DisplayOffset(3), DisplayOffset(8)));
    }

    #[test]
    fn test_merge_and_sort_null_media() {
        let urls = vec![url_entity("u", "d", 2, 5)];
        let merged = merge_and_sort_entities(&urls, None);
        assert!(matches!(merged, Cow::Borrowed(_)));
        assert_eq!(merged.as_ref(), urls.as_slice());
    }

    #[test]
    fn test_merge_and_sort_urls_and_media() {
        let url = url_entity("u", "d", 2, 5);
        let photo = media_entity("p", 1, 5, "photo");
        let urls = vec![url.clone()];
        let media = vec![photo.clone()];
        let merged = merge_and_sort_entities(&urls, Some(&media));
        assert_eq!(merged.as_ref(), &[photo, url]);
    }

    #[test]
    fn test_merge_and_sort_media_wins_ties() {
        let urls = vec![url_entity("u1", "d", 3, 6), url_entity("u0", "d", 0, 2)];
        let media = vec![media_entity("m", 3, 6, "photo")];
        let merged = merge_and_sort_entities(&urls, Some(&media));
        let order: Vec<_> = merged.iter().map(|e| (e.start.get(), e.is_media())).collect();
        assert_eq!(order, vec![(0, false), (3, true), (3, false)]);
    }
}
