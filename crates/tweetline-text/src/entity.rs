//! Formatted entities: the reconciler's working and output representation.
//!
//! A single tagged type covers both link and media spans; code that only
//! cares about the link shape ignores [`EntityKind`], code that cares about
//! media matches on it. The offset space is a type parameter so staged
//! (raw) and reconciled (display) entities can't be mixed up.

use serde::Serialize;
use tweetline_types::{DisplayOffset, MediaEntity, PHOTO_TYPE, RawOffset, UrlEntity};

/// What a [`FormattedEntity`] points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKind {
    Url,
    Media {
        id: i64,
        media_type: Option<String>,
        media_url_https: Option<String>,
    },
}

/// A span of text plus its link payload, in offset space `O`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FormattedEntity<O = DisplayOffset> {
    pub start: O,
    pub end: O,
    /// Target handed to click listeners.
    pub url: String,
    pub display_url: Option<String>,
    pub expanded_url: Option<String>,
    pub kind: EntityKind,
}

impl FormattedEntity<RawOffset> {
    pub fn from_url(entity: &UrlEntity) -> Self {
        Self {
            start: entity.start(),
            end: entity.end(),
            url: entity.url.clone(),
            display_url: entity.display_url.clone(),
            expanded_url: entity.expanded_url.clone(),
            kind: EntityKind::Url,
        }
    }

    pub fn from_media(entity: &MediaEntity) -> Self {
        Self {
            start: entity.start(),
            end: entity.end(),
            url: entity.url.clone(),
            display_url: entity.display_url.clone(),
            expanded_url: entity.expanded_url.clone(),
            kind: EntityKind::Media {
                id: entity.id,
                media_type: entity.media_type.clone(),
                media_url_https: entity.media_url_https.clone(),
            },
        }
    }
}

impl<O: Copy> FormattedEntity<O> {
    pub fn is_media(&self) -> bool {
        matches!(self.kind, EntityKind::Media { .. })
    }

    pub fn is_photo(&self) -> bool {
        matches!(&self.kind, EntityKind::Media { media_type: Some(t), .. } if t == PHOTO_TYPE)
    }

    /// Move the entity into another offset space.
    pub(crate) fn map_offsets<P>(self, f: impl Fn(O) -> P) -> FormattedEntity<P> {
        FormattedEntity {
            start: f(self.start),
            end: f(self.end),
            url: self.url,
            display_url: self.display_url,
            expanded_url: self.expanded_url,
            kind: self.kind,
        }
    }
}

/// Display text and its entities.
///
/// `FormattedText<RawOffset>` is the staging form filled by
/// [`convert_entities`](crate::convert_entities); [`format`](crate::format)
/// turns it into the reconciled `FormattedText` (display offsets).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FormattedText<O = DisplayOffset> {
    pub text: String,
    pub url_entities: Vec<FormattedEntity<O>>,
    pub media_entities: Vec<FormattedEntity<O>>,
}

impl<O> Default for FormattedText<O> {
    fn default() -> Self {
        Self {
            text: String::new(),
            url_entities: Vec::new(),
            media_entities: Vec::new(),
        }
    }
}

impl FormattedText {
    /// The last photo-typed media entity, the one callers show inline.
    pub fn last_photo_entity(&self) -> Option<&FormattedEntity> {
        self.media_entities.iter().rev().find(|e| e.is_photo())
    }

    pub fn has_photo(&self) -> bool {
        self.last_photo_entity().is_some()
    }

    /// Text between two display offsets, `None` if the range is invalid.
    pub fn slice(&self, start: DisplayOffset, end: DisplayOffset) -> Option<String> {
        crate::utf16::slice(&self.text, start, end)
    }
}
