//! Raw entity spans as delivered by the REST transport.
//!
//! Every entity carries `indices: [start, end]` in [`RawOffset`] space against
//! the *escaped* server text. List fields on [`TweetEntities`] are optional on
//! the wire; an absent list is treated the same as an empty one everywhere.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::offsets::RawOffset;

/// The `type` string of a media entity that is rendered as an inline image.
pub const PHOTO_TYPE: &str = "photo";

/// Known media types. Unknown strings stay unparsed on [`MediaEntity::media_type`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum MediaType {
    Photo,
    Video,
    AnimatedGif,
}

/// A hyperlink span.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntity {
    /// The wrapped (t.co) URL as it appears in the text.
    pub url: String,
    #[serde(default)]
    pub expanded_url: Option<String>,
    /// Human-readable form shown in place of `url`.
    #[serde(default)]
    pub display_url: Option<String>,
    pub indices: [RawOffset; 2],
}

impl UrlEntity {
    pub fn new(
        url: impl Into<String>,
        expanded_url: Option<String>,
        display_url: Option<String>,
        start: i64,
        end: i64,
    ) -> Self {
        Self {
            url: url.into(),
            expanded_url,
            display_url,
            indices: [RawOffset(start), RawOffset(end)],
        }
    }

    pub fn start(&self) -> RawOffset {
        self.indices[0]
    }

    pub fn end(&self) -> RawOffset {
        self.indices[1]
    }
}

/// A media span. Shares the link fields of [`UrlEntity`] and adds the media
/// id, the image location and the media `type`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntity {
    pub url: String,
    #[serde(default)]
    pub expanded_url: Option<String>,
    #[serde(default)]
    pub display_url: Option<String>,
    pub indices: [RawOffset; 2],
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub media_url_https: Option<String>,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
}

impl MediaEntity {
    pub fn new(url: impl Into<String>, display_url: Option<String>, start: i64, end: i64, media_type: &str) -> Self {
        Self {
            url: url.into(),
            display_url,
            indices: [RawOffset(start), RawOffset(end)],
            media_type: Some(media_type.to_string()),
            ..Default::default()
        }
    }

    pub fn start(&self) -> RawOffset {
        self.indices[0]
    }

    pub fn end(&self) -> RawOffset {
        self.indices[1]
    }

    /// Exact match against `"photo"`; no case folding.
    pub fn is_photo(&self) -> bool {
        self.media_type.as_deref() == Some(PHOTO_TYPE)
    }

    /// The parsed media type, if the `type` string is one we know.
    pub fn kind(&self) -> Option<MediaType> {
        self.media_type.as_deref().and_then(|t| MediaType::from_str(t).ok())
    }
}

/// A `#hashtag` span. Carried through but not linkified.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagEntity {
    pub text: String,
    pub indices: [RawOffset; 2],
}

/// An `@mention` span. Carried through but not linkified.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionEntity {
    pub screen_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: i64,
    pub indices: [RawOffset; 2],
}

/// Entity lists attached to an item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetEntities {
    #[serde(default)]
    pub urls: Option<Vec<UrlEntity>>,
    #[serde(default)]
    pub media: Option<Vec<MediaEntity>>,
    #[serde(default)]
    pub hashtags: Option<Vec<HashtagEntity>>,
    #[serde(default)]
    pub user_mentions: Option<Vec<MentionEntity>>,
}

impl TweetEntities {
    pub fn with_urls(urls: Vec<UrlEntity>) -> Self {
        Self { urls: Some(urls), ..Default::default() }
    }

    pub fn with_media(media: Vec<MediaEntity>) -> Self {
        Self { media: Some(media), ..Default::default() }
    }

    pub fn urls(&self) -> &[UrlEntity] {
        self.urls.as_deref().unwrap_or_default()
    }

    pub fn media(&self) -> &[MediaEntity] {
        self.media.as_deref().unwrap_or_default()
    }

    /// The last media entity typed `"photo"`, scanning from the end.
    ///
    /// This is the photo shown inline next to the text.
    pub fn last_photo(&self) -> Option<&MediaEntity> {
        self.media().iter().rev().find(|m| m.is_photo())
    }

    pub fn has_photo(&self) -> bool {
        self.last_photo().is_some()
    }
}

/// [`TweetEntities::last_photo`] over an optional entity payload.
pub fn last_photo_entity(entities: Option<&TweetEntities>) -> Option<&MediaEntity> {
    entities?.last_photo()
}

/// True when [`last_photo_entity`] finds a photo.
pub fn has_photo_url(entities: Option<&TweetEntities>) -> bool {
    last_photo_entity(entities).is_some()
}
