//! The raw timeline item.

use serde::{Deserialize, Serialize};

use crate::Identifiable;
use crate::entities::TweetEntities;

/// Author of a tweet. Only the fields timelines display.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub screen_name: Option<String>,
}

/// A raw item as the transport delivers it.
///
/// `text` is HTML-escaped and entity indices are [`RawOffset`](crate::RawOffset)s
/// into it. Use the reconciler before showing either to a user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Option<TweetEntities>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Tweet {
    pub fn builder() -> TweetBuilder {
        TweetBuilder::default()
    }

    /// Text as sent by the server, or `""` when absent.
    pub fn raw_text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

impl Identifiable for Tweet {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Builder for [`Tweet`], mostly for fixtures.
///
/// ```
/// # use tweetline_types::*;
/// let tweet = Tweet::builder()
///     .id(20)
///     .text("&lt;3 http://t.co/x")
///     .entities(TweetEntities::with_urls(vec![
///         UrlEntity::new("http://t.co/x", None, Some("example.com".into()), 6, 18),
///     ]))
///     .build();
/// assert_eq!(tweet.raw_text(), "&lt;3 http://t.co/x");
/// ```
#[derive(Default)]
pub struct TweetBuilder {
    tweet: Tweet,
}

impl TweetBuilder {
    pub fn id(mut self, id: i64) -> Self {
        self.tweet.id = id;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.tweet.text = Some(text.into());
        self
    }

    pub fn entities(mut self, entities: TweetEntities) -> Self {
        self.tweet.entities = Some(entities);
        self
    }

    pub fn user(mut self, user: User) -> Self {
        self.tweet.user = Some(user);
        self
    }

    pub fn created_at(mut self, created_at: impl Into<String>) -> Self {
        self.tweet.created_at = Some(created_at.into());
        self
    }

    pub fn build(self) -> Tweet {
        self.tweet
    }
}
