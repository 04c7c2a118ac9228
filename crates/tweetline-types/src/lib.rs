//! Raw timeline item and entity types for tweetline.
//!
//! This crate is the data foundation: the item shape delivered by the REST
//! transport, its entity spans, and the two offset coordinate spaces those
//! spans live in. It has **no internal tweetline dependencies**: a pure leaf
//! crate that the text reconciler and the timeline delegate build on.
//!
//! # Coordinate Spaces
//!
//! ```text
//! server text  "&lt;3 http://t.co/x"      entity indices: RawOffset (chars, escaped)
//!      │  html unescape + span shift
//!      ▼
//! unescaped    "<3 http://t.co/x"          still RawOffset (chars, unescaped)
//!      │  supplementary-char shift
//!      ▼
//! display      UTF-16 code units           DisplayOffset
//! ```
//!
//! # Key Types
//!
//! |-------------------|----------------------------------------------|
//! | Type              | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | [`Tweet`]         | Raw item: id, escaped text, entities         |
//! | [`TweetEntities`] | Optional url/media/hashtag/mention lists     |
//! | [`UrlEntity`]     | Link span with display and expanded forms    |
//! | [`MediaEntity`]   | Media span, typed (`photo`, `video`, ...)    |
//! | [`RawOffset`]     | Server-convention offset                     |
//! | [`DisplayOffset`] | UTF-16 offset into display text              |
//! | [`Identifiable`]  | Stable numeric identity for timeline items   |
//! |-------------------|----------------------------------------------|

pub mod entities;
pub mod offsets;
pub mod tweet;

pub use entities::{
    HashtagEntity, MediaEntity, MediaType, MentionEntity, PHOTO_TYPE, TweetEntities, UrlEntity,
    has_photo_url, last_photo_entity,
};
pub use offsets::{DisplayOffset, RawOffset};
pub use tweet::{Tweet, TweetBuilder, User};

/// An item with a stable numeric identity.
///
/// Timelines order items by this id (newest first) and derive their page
/// cursors from it.
pub trait Identifiable {
    fn id(&self) -> i64;
}

impl<T: Identifiable> Identifiable for &T {
    fn id(&self) -> i64 {
        (*self).id()
    }
}
