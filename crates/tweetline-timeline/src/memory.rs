//! In-memory timeline source.
//!
//! Used by the CLI and for testing. Mirrors REST paging: `since` is
//! exclusive, the max bound is inclusive on the wire, so `previous`
//! decrements it first.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;
use tweetline_types::Identifiable;

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::cursor::{TimelineResult, decrement_max_id};
use crate::error::TimelineError;
use crate::timeline::Timeline;

/// Timeline over a fixed set of items held newest first.
///
/// Thread-safe via internal `RwLock`, so new items can be published while a
/// delegate is paging.
#[derive(Debug)]
pub struct MemoryTimeline<T> {
    items: RwLock<Vec<T>>,
    page_size: usize,
}

impl<T: Identifiable + Clone> MemoryTimeline<T> {
    /// Build from items in any order; they are sorted newest first.
    pub fn new(mut items: Vec<T>) -> Self {
        items.sort_by_key(|item| std::cmp::Reverse(item.id()));
        Self {
            items: RwLock::new(items),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Publish a new item at the head of the timeline.
    pub fn push_newest(&self, item: T) {
        let mut items = self.items.write();
        let at = items.partition_point(|existing| existing.id() > item.id());
        items.insert(at, item);
    }

    /// Newest `page_size` items with `since_id < id <= max_id`.
    fn query(&self, since_id: Option<i64>, max_id: Option<i64>) -> TimelineResult<T> {
        let items = self.items.read();
        let page: Vec<T> = items
            .iter()
            .filter(|item| max_id.is_none_or(|max| item.id() <= max))
            .filter(|item| since_id.is_none_or(|since| item.id() > since))
            .take(self.page_size)
            .cloned()
            .collect();
        trace!(?since_id, ?max_id, returned = page.len(), "memory timeline query");
        TimelineResult::from_items(page)
    }
}

#[async_trait]
impl<T> Timeline<T> for MemoryTimeline<T>
where
    T: Identifiable + Clone + Send + Sync,
{
    async fn next(&self, since_position: Option<i64>) -> Result<TimelineResult<T>, TimelineError> {
        Ok(self.query(since_position, None))
    }

    async fn previous(&self, max_position: Option<i64>) -> Result<TimelineResult<T>, TimelineError> {
        Ok(self.query(None, decrement_max_id(max_position)))
    }

    fn timeline_type(&self) -> &str {
        "memory"
    }
}
