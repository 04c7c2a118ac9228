//! Page cursors and fetch results.

use serde::{Deserialize, Serialize};
use tweetline_types::Identifiable;

/// Position boundaries of a fetched page.
///
/// `max_position` is the newest id seen (where the next page starts);
/// `min_position` the oldest (where the previous page ends).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimelineCursor {
    pub min_position: Option<i64>,
    pub max_position: Option<i64>,
}

impl TimelineCursor {
    pub fn new(min_position: Option<i64>, max_position: Option<i64>) -> Self {
        Self {
            min_position,
            max_position,
        }
    }

    /// Cursor spanning a newest-first page: max is the first item's id,
    /// min the last's. Both `None` for an empty page.
    pub fn from_items<T: Identifiable>(items: &[T]) -> Self {
        Self {
            min_position: items.last().map(|item| item.id()),
            max_position: items.first().map(|item| item.id()),
        }
    }
}

/// One page returned by a [`Timeline`](crate::Timeline) source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineResult<T> {
    pub cursor: TimelineCursor,
    pub items: Vec<T>,
}

impl<T> TimelineResult<T> {
    pub fn new(cursor: TimelineCursor, items: Vec<T>) -> Self {
        Self { cursor, items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Identifiable> TimelineResult<T> {
    /// Page with a cursor derived from its own items.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            cursor: TimelineCursor::from_items(&items),
            items,
        }
    }
}

/// Turn an exclusive max id into the inclusive bound REST endpoints take.
pub fn decrement_max_id(max_id: Option<i64>) -> Option<i64> {
    max_id.map(|id| id.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(i64);

    impl Identifiable for Item {
        fn id(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_from_items() {
        let cursor = TimelineCursor::from_items(&[Item(9), Item(7), Item(3)]);
        assert_eq!(cursor, TimelineCursor::new(Some(3), Some(9)));
        assert_eq!(TimelineCursor::from_items::<Item>(&[]), TimelineCursor::default());
    }

    #[test]
    fn test_decrement_max_id() {
        assert_eq!(decrement_max_id(None), None);
        assert_eq!(decrement_max_id(Some(1234)), Some(1233));
        assert_eq!(decrement_max_id(Some(i64::MIN)), Some(i64::MIN));
    }
}
