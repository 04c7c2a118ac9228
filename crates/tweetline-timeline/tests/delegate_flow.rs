//! End-to-end paging through a delegate backed by an in-memory timeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tweetline_timeline::{
    DataSetEvent, DelegateConfig, EdgeState, MemoryTimeline, Timeline, TimelineDelegate,
    TimelineError, TimelineResult, on_complete,
};
use tweetline_types::Tweet;

fn tweets(range: std::ops::RangeInclusive<i64>) -> Vec<Tweet> {
    range
        .map(|id| Tweet::builder().id(id).text(format!("tweet {id}")).build())
        .collect()
}

fn ids(delegate: &TimelineDelegate<Tweet>) -> Vec<i64> {
    delegate.items().iter().map(|t| t.id).collect()
}

fn last_index(delegate: &TimelineDelegate<Tweet>) -> usize {
    delegate.get_count() - 1
}

#[tokio::test]
async fn test_scroll_to_end_then_pick_up_new_items() {
    let source = Arc::new(MemoryTimeline::new(tweets(1..=70)).with_page_size(30));
    let mut delegate = TimelineDelegate::<Tweet>::builder()
        .shared_timeline(source.clone())
        .build()
        .unwrap();

    delegate.refresh(None);
    delegate.settle().await;
    assert_eq!(delegate.get_count(), 30);
    assert_eq!(delegate.get_item_id(0), Some(70));
    assert_eq!(delegate.state().position_for_previous(), Some(41));

    // scroll: every time the last row shows, ask for more
    let mut fetches = 0;
    while delegate.request_more_if_needed(last_index(&delegate)) {
        delegate.settle().await;
        fetches += 1;
    }
    // two pages with items, then one empty page marks the end
    assert_eq!(fetches, 3);
    assert_eq!(delegate.get_count(), 70);
    assert_eq!(ids(&delegate), (1..=70).rev().collect::<Vec<_>>());
    assert_eq!(delegate.state().previous_edge(), EdgeState::Exhausted);

    source.push_newest(Tweet::builder().id(71).build());
    source.push_newest(Tweet::builder().id(72).build());
    delegate.next(None);
    delegate.settle().await;
    assert_eq!(&ids(&delegate)[..3], &[72, 71, 70]);
    assert_eq!(delegate.state().position_for_next(), Some(72));

    // nothing newer
    delegate.next(None);
    delegate.settle().await;
    assert_eq!(delegate.get_count(), 72);
    assert_eq!(delegate.state().next_edge(), EdgeState::Exhausted);
}

#[tokio::test]
async fn test_capacity_from_config_stops_scrolling() {
    let config = DelegateConfig::from_ron_str("(capacity: 100, page_size: 30)").unwrap();
    let source = MemoryTimeline::new(tweets(1..=500)).with_page_size(config.page_size);
    let mut delegate = TimelineDelegate::<Tweet>::builder()
        .timeline(source)
        .config(config)
        .build()
        .unwrap();

    delegate.refresh(None);
    delegate.settle().await;
    while delegate.request_more_if_needed(last_index(&delegate)) {
        delegate.settle().await;
    }
    assert_eq!(delegate.get_count(), 120);
    assert!(!delegate.within_max_capacity());

    let rejected = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&rejected);
    delegate.next(on_complete(move |result: Result<&TimelineResult<Tweet>, &TimelineError>| {
        if matches!(result, Err(TimelineError::CapacityReached)) {
            seen.fetch_add(1, Ordering::SeqCst);
        }
    }));
    assert_eq!(rejected.load(Ordering::SeqCst), 1);

    // refresh is allowed and shrinks the list back to one page
    delegate.refresh(None);
    delegate.settle().await;
    assert_eq!(delegate.get_count(), 30);
    assert_eq!(delegate.get_item_id(0), Some(500));
}

/// Fails the first request, then serves from memory.
struct FlakyTimeline {
    inner: MemoryTimeline<Tweet>,
    calls: AtomicUsize,
}

#[async_trait]
impl Timeline<Tweet> for FlakyTimeline {
    async fn next(&self, since: Option<i64>) -> Result<TimelineResult<Tweet>, TimelineError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(TimelineError::transport("connection reset"));
        }
        self.inner.next(since).await
    }

    async fn previous(&self, max: Option<i64>) -> Result<TimelineResult<Tweet>, TimelineError> {
        self.inner.previous(max).await
    }

    fn timeline_type(&self) -> &str {
        "flaky"
    }
}

#[tokio::test]
async fn test_transport_failure_then_recovery() {
    let mut delegate = TimelineDelegate::<Tweet>::builder()
        .timeline(FlakyTimeline {
            inner: MemoryTimeline::new(tweets(1..=5)),
            calls: AtomicUsize::new(0),
        })
        .build()
        .unwrap();
    let mut events = delegate.subscribe();

    let error = Arc::new(parking_lot::Mutex::new(None));
    let sink = Arc::clone(&error);
    delegate.refresh(on_complete(move |result: Result<&TimelineResult<Tweet>, &TimelineError>| {
        *sink.lock() = result.err().map(ToString::to_string);
    }));
    delegate.settle().await;
    assert_eq!(error.lock().as_deref(), Some("transport error: connection reset"));
    assert_eq!(delegate.get_count(), 0);
    assert!(!delegate.state().is_request_in_flight());
    assert!(events.try_recv().is_err());

    delegate.refresh(None);
    delegate.settle().await;
    assert_eq!(delegate.get_count(), 5);
    assert_eq!(events.try_recv().unwrap(), DataSetEvent::Changed);
}

#[tokio::test]
async fn test_page_size_belongs_to_the_source() {
    let config = DelegateConfig::default().with_page_size(5);
    let mut delegate = TimelineDelegate::<Tweet>::builder()
        .timeline(MemoryTimeline::new(tweets(1..=50)).with_page_size(30))
        .config(config)
        .build()
        .unwrap();

    delegate.refresh(None);
    delegate.settle().await;
    assert_eq!(delegate.get_count(), 30);
}
