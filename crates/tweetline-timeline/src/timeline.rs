//! Timeline source trait.

use async_trait::async_trait;

use crate::cursor::TimelineResult;
use crate::error::TimelineError;

/// A paged source of items, newest first.
///
/// Positions are item ids. Implementations report failures as
/// [`TimelineError::Transport`]; the delegate forwards them untouched.
#[async_trait]
pub trait Timeline<T>: Send + Sync {
    /// Items newer than `since_position`, or the newest page for `None`.
    async fn next(&self, since_position: Option<i64>) -> Result<TimelineResult<T>, TimelineError>;

    /// Items older than `max_position` (exclusive), or the newest page for
    /// `None`.
    async fn previous(&self, max_position: Option<i64>) -> Result<TimelineResult<T>, TimelineError>;

    /// Short name of the source, used in logs.
    fn timeline_type(&self) -> &str;
}
