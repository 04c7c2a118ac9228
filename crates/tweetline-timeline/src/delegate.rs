//! Timeline delegate: the owner of a paged, capacity-bounded item list.
//!
//! The delegate lives on one owner context (a UI loop, a CLI task). Fetches
//! run as spawned tokio tasks and report back over an mpsc channel; their
//! results touch the item list only when the owner drains that channel with
//! [`process_completions`](TimelineDelegate::process_completions) or
//! [`settle`](TimelineDelegate::settle).
//!
//! ```text
//!   owner                                   spawned fetch
//!   ┌──────────────────────────┐  spawn    ┌───────────────────────┐
//!   │ refresh / next / previous│ ────────▶ │ Timeline::next/previous│
//!   │   pre-flight checks      │           └──────────┬────────────┘
//!   │                          │   mpsc (id, result)  │
//!   │ process_completions()    │ ◀────────────────────┘
//!   │   merge page, cursors,   │
//!   │   notify, callback       │
//!   └──────────────────────────┘
//! ```
//!
//! # Merge rules
//!
//! | request  | non-empty page                         | empty page                |
//! |----------|----------------------------------------|---------------------------|
//! | refresh  | replace list, set next cursor, notify  | nothing; next edge ends   |
//! | next     | prepend page, set next cursor, notify  | nothing; next edge ends   |
//! | previous | append page, set previous cursor, notify | nothing; previous edge ends |
//!
//! The in-flight flag clears on every completion, success or failure.

use std::collections::HashMap;
use std::sync::Arc;

use strum::Display;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use tweetline_types::Identifiable;

use crate::config::{DelegateConfig, RefreshPolicy};
use crate::cursor::TimelineResult;
use crate::error::TimelineError;
use crate::observable::{DataSetEvent, DataSetObservable, DataSetObserver, ObserverId};
use crate::state::{EdgeState, TimelineStateHolder};
use crate::timeline::Timeline;

/// Completion callback for a delegate request, run on the owner context.
pub type TimelineCallback<T> =
    Box<dyn FnOnce(Result<&TimelineResult<T>, &TimelineError>) + Send>;

/// Wrap a closure as a request callback.
pub fn on_complete<T, F>(f: F) -> Option<TimelineCallback<T>>
where
    F: FnOnce(Result<&TimelineResult<T>, &TimelineError>) + Send + 'static,
{
    Some(Box::new(f))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RequestKind {
    Refresh,
    Next,
    Previous,
}

struct PendingRequest<T> {
    kind: RequestKind,
    callback: Option<TimelineCallback<T>>,
}

struct Completion<T> {
    id: u64,
    result: Result<TimelineResult<T>, TimelineError>,
}

pub struct TimelineDelegate<T> {
    timeline: Arc<dyn Timeline<T>>,
    observable: Arc<DataSetObservable>,
    items: Vec<T>,
    state: TimelineStateHolder,
    config: DelegateConfig,
    pending: HashMap<u64, PendingRequest<T>>,
    next_request_id: u64,
    completion_tx: mpsc::UnboundedSender<Completion<T>>,
    completion_rx: mpsc::UnboundedReceiver<Completion<T>>,
}

impl<T> std::fmt::Debug for TimelineDelegate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineDelegate")
            .field("timeline", &self.timeline.timeline_type())
            .field("items", &self.items.len())
            .field("state", &self.state)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<T> TimelineDelegate<T>
where
    T: Identifiable + Clone + Send + 'static,
{
    pub fn builder() -> TimelineDelegateBuilder<T> {
        TimelineDelegateBuilder::default()
    }

    /// Delegate over `timeline` with an empty list and default config.
    pub fn new(timeline: impl Timeline<T> + 'static) -> Self {
        Self::from_parts(
            Arc::new(timeline),
            Arc::new(DataSetObservable::new()),
            Vec::new(),
            TimelineStateHolder::new(),
            DelegateConfig::default(),
        )
    }

    fn from_parts(
        timeline: Arc<dyn Timeline<T>>,
        observable: Arc<DataSetObservable>,
        items: Vec<T>,
        state: TimelineStateHolder,
        config: DelegateConfig,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            timeline,
            observable,
            items,
            state,
            config,
            pending: HashMap::new(),
            next_request_id: 0,
            completion_tx,
            completion_rx,
        }
    }

    // ── Requests ─────────────────────────────────────────────────────────

    /// Reset both cursors and fetch the newest page, replacing the list.
    ///
    /// Never capacity-gated. Under [`RefreshPolicy::Gated`] an outstanding
    /// fetch rejects it with `RequestInFlight` and leaves the cursors alone.
    /// Must be called from within a tokio runtime.
    pub fn refresh(&mut self, callback: Option<TimelineCallback<T>>) {
        let started = self.state.start_timeline_request();
        if !started && self.config.refresh_policy == RefreshPolicy::Gated {
            self.reject(RequestKind::Refresh, TimelineError::RequestInFlight, callback);
            return;
        }
        self.state.reset_cursors();
        info!(
            timeline = self.timeline.timeline_type(),
            racing = !started,
            "refreshing timeline"
        );
        self.dispatch(RequestKind::Refresh, None, callback);
    }

    /// Fetch items newer than the next cursor and prepend them.
    ///
    /// Must be called from within a tokio runtime.
    pub fn next(&mut self, callback: Option<TimelineCallback<T>>) {
        if let Err(err) = self.preflight() {
            self.reject(RequestKind::Next, err, callback);
            return;
        }
        let position = self.state.position_for_next();
        self.dispatch(RequestKind::Next, position, callback);
    }

    /// Fetch items older than the previous cursor and append them.
    ///
    /// Must be called from within a tokio runtime.
    pub fn previous(&mut self, callback: Option<TimelineCallback<T>>) {
        if let Err(err) = self.preflight() {
            self.reject(RequestKind::Previous, err, callback);
            return;
        }
        let position = self.state.position_for_previous();
        self.dispatch(RequestKind::Previous, position, callback);
    }

    /// Load older items when `position` is the last row being shown.
    ///
    /// Dispatches `previous` only if `position` is the last index, the list
    /// is under capacity, nothing is in flight and the older end of the
    /// timeline has not been reached. Returns whether a fetch was issued.
    pub fn request_more_if_needed(&mut self, position: usize) -> bool {
        if !self.is_last_position(position)
            || !self.within_max_capacity()
            || self.state.is_request_in_flight()
            || self.state.previous_edge() == EdgeState::Exhausted
        {
            return false;
        }
        self.previous(None);
        true
    }

    /// Capacity first, then the single-flight gate.
    fn preflight(&mut self) -> Result<(), TimelineError> {
        if !self.within_max_capacity() {
            return Err(TimelineError::CapacityReached);
        }
        if !self.state.start_timeline_request() {
            return Err(TimelineError::RequestInFlight);
        }
        Ok(())
    }

    fn reject(&self, kind: RequestKind, err: TimelineError, callback: Option<TimelineCallback<T>>) {
        warn!(%kind, items = self.items.len(), "timeline request rejected: {err}");
        if let Some(callback) = callback {
            callback(Err(&err));
        }
    }

    fn dispatch(
        &mut self,
        kind: RequestKind,
        position: Option<i64>,
        callback: Option<TimelineCallback<T>>,
    ) {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.pending.insert(id, PendingRequest { kind, callback });
        debug!(id, %kind, ?position, "dispatching timeline request");

        let timeline = Arc::clone(&self.timeline);
        let fetch = tokio::spawn(async move {
            match kind {
                RequestKind::Refresh | RequestKind::Next => timeline.next(position).await,
                RequestKind::Previous => timeline.previous(position).await,
            }
        });
        // a panicking source still completes its request
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = fetch.await.unwrap_or_else(|e| Err(TimelineError::transport(e)));
            let _ = tx.send(Completion { id, result });
        });
    }

    // ── Completions ──────────────────────────────────────────────────────

    /// Apply every completion that has already arrived. Never blocks.
    ///
    /// Returns the number applied.
    pub fn process_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply_completion(completion);
            applied += 1;
        }
        applied
    }

    /// Wait until every outstanding request has completed and been applied.
    pub async fn settle(&mut self) {
        while !self.pending.is_empty() {
            let Some(completion) = self.completion_rx.recv().await else {
                break;
            };
            self.apply_completion(completion);
        }
    }

    fn apply_completion(&mut self, completion: Completion<T>) {
        let Completion { id, result } = completion;
        let Some(PendingRequest { kind, callback }) = self.pending.remove(&id) else {
            warn!(id, "completion for unknown timeline request");
            return;
        };

        match &result {
            Ok(page) => self.apply_page(kind, page),
            Err(err) => warn!(id, %kind, "timeline request failed: {err}"),
        }
        self.state.finish_timeline_request();

        if let Some(callback) = callback {
            callback(result.as_ref());
        }
    }

    fn apply_page(&mut self, kind: RequestKind, page: &TimelineResult<T>) {
        debug!(%kind, received = page.items.len(), cursor = ?page.cursor, "timeline page arrived");
        if page.is_empty() {
            match kind {
                RequestKind::Refresh | RequestKind::Next => self.state.set_next_edge(EdgeState::Exhausted),
                RequestKind::Previous => self.state.set_previous_edge(EdgeState::Exhausted),
            }
            return;
        }

        match kind {
            RequestKind::Refresh => {
                self.items.clear();
                self.items.extend(page.items.iter().cloned());
                self.state.set_next_cursor(Some(page.cursor));
                self.state.set_next_edge(EdgeState::HasMore);
            }
            RequestKind::Next => {
                self.items.splice(0..0, page.items.iter().cloned());
                self.state.set_next_cursor(Some(page.cursor));
                self.state.set_next_edge(EdgeState::HasMore);
            }
            RequestKind::Previous => {
                self.items.extend(page.items.iter().cloned());
                self.state.set_previous_cursor(Some(page.cursor));
                self.state.set_previous_edge(EdgeState::HasMore);
            }
        }
        self.observable.notify_changed();
    }

    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }
}

impl<T: Identifiable> TimelineDelegate<T> {
    // ── Queries ──────────────────────────────────────────────────────────

    pub fn get_count(&self) -> usize {
        self.items.len()
    }

    /// Item at `position`. Pure; see
    /// [`request_more_if_needed`](Self::request_more_if_needed) for loading.
    pub fn get_item(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    pub fn get_item_id(&self, position: usize) -> Option<i64> {
        self.items.get(position).map(|item| item.id())
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn within_max_capacity(&self) -> bool {
        self.items.len() < self.config.capacity
    }

    pub fn is_last_position(&self, position: usize) -> bool {
        self.items.len().checked_sub(1) == Some(position)
    }

    pub fn state(&self) -> &TimelineStateHolder {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TimelineStateHolder {
        &mut self.state
    }

    pub fn config(&self) -> &DelegateConfig {
        &self.config
    }

    pub fn timeline(&self) -> &Arc<dyn Timeline<T>> {
        &self.timeline
    }

    // ── Observers ────────────────────────────────────────────────────────

    pub fn observable(&self) -> &Arc<DataSetObservable> {
        &self.observable
    }

    pub fn register_observer(&self, observer: Arc<dyn DataSetObserver>) -> ObserverId {
        self.observable.register_observer(observer)
    }

    pub fn unregister_observer(&self, id: ObserverId) -> bool {
        self.observable.unregister_observer(id)
    }

    pub fn notify_changed(&self) {
        self.observable.notify_changed();
    }

    pub fn notify_invalidated(&self) {
        self.observable.notify_invalidated();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DataSetEvent> {
        self.observable.subscribe()
    }
}

/// Builder for [`TimelineDelegate`]. A timeline source is required.
pub struct TimelineDelegateBuilder<T> {
    timeline: Option<Arc<dyn Timeline<T>>>,
    observable: Option<Arc<DataSetObservable>>,
    items: Vec<T>,
    state: TimelineStateHolder,
    config: DelegateConfig,
}

impl<T> Default for TimelineDelegateBuilder<T> {
    fn default() -> Self {
        Self {
            timeline: None,
            observable: None,
            items: Vec::new(),
            state: TimelineStateHolder::new(),
            config: DelegateConfig::default(),
        }
    }
}

impl<T> TimelineDelegateBuilder<T>
where
    T: Identifiable + Clone + Send + 'static,
{
    pub fn timeline(mut self, timeline: impl Timeline<T> + 'static) -> Self {
        self.timeline = Some(Arc::new(timeline));
        self
    }

    /// Use a source the caller keeps a handle to.
    pub fn shared_timeline(mut self, timeline: Arc<dyn Timeline<T>>) -> Self {
        self.timeline = Some(timeline);
        self
    }

    /// Share an observer registry, e.g. with a list adapter.
    pub fn observable(mut self, observable: Arc<DataSetObservable>) -> Self {
        self.observable = Some(observable);
        self
    }

    /// Initial items, newest first.
    pub fn items(mut self, items: Vec<T>) -> Self {
        self.items = items;
        self
    }

    /// Resume with existing cursors.
    pub fn state(mut self, state: TimelineStateHolder) -> Self {
        self.state = state;
        self
    }

    pub fn config(mut self, config: DelegateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<TimelineDelegate<T>, TimelineError> {
        let timeline = self.timeline.ok_or(TimelineError::MissingTimeline)?;
        Ok(TimelineDelegate::from_parts(
            timeline,
            self.observable.unwrap_or_default(),
            self.items,
            self.state,
            self.config,
        ))
    }
}
