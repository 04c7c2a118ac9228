//! Data-set change notification.
//!
//! Two ways to hear about item-list changes:
//!
//! - registered [`DataSetObserver`]s, called synchronously on the notifying
//!   thread (list adapters)
//! - a tokio broadcast of [`DataSetEvent`] for async consumers, via
//!   [`DataSetObservable::subscribe`]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use strum::Display;
use tokio::sync::broadcast;
use tracing::trace;

use crate::constants::EVENT_CHANNEL_CAPACITY;

/// Receives item-list change notifications.
pub trait DataSetObserver: Send + Sync {
    /// The item list changed; re-read it.
    fn on_changed(&self);

    /// The item list is no longer valid.
    fn on_invalidated(&self) {}
}

/// Handle returned by [`DataSetObservable::register_observer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DataSetEvent {
    Changed,
    Invalidated,
}

/// Observer registry plus event broadcast.
///
/// Cheap to share behind an `Arc`; registration and notification take
/// `&self`.
pub struct DataSetObservable {
    observers: RwLock<Vec<(ObserverId, Arc<dyn DataSetObserver>)>>,
    next_id: AtomicU64,
    events: broadcast::Sender<DataSetEvent>,
}

impl Default for DataSetObservable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DataSetObservable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSetObservable")
            .field("observers", &self.observer_count())
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl DataSetObservable {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            observers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
            events,
        }
    }

    pub fn register_observer(&self, observer: Arc<dyn DataSetObserver>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.write().push((id, observer));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unregister_observer(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|(registered, _)| *registered != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DataSetEvent> {
        self.events.subscribe()
    }

    pub fn notify_changed(&self) {
        self.notify(DataSetEvent::Changed);
    }

    pub fn notify_invalidated(&self) {
        self.notify(DataSetEvent::Invalidated);
    }

    fn notify(&self, event: DataSetEvent) {
        // snapshot so observers may (un)register from inside the callback
        let observers: Vec<_> = self.observers.read().iter().map(|(_, o)| Arc::clone(o)).collect();
        trace!(%event, observers = observers.len(), "notifying data set observers");
        for observer in observers {
            match event {
                DataSetEvent::Changed => observer.on_changed(),
                DataSetEvent::Invalidated => observer.on_invalidated(),
            }
        }
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}
