//! Cursor and single-flight bookkeeping for a timeline delegate.
//!
//! # State Machine
//!
//! ```text
//!              start_timeline_request() == true
//!   +------+  ─────────────────────────────────▶  +-----------------+
//!   | Idle |                                       | RequestInFlight |
//!   +------+  ◀─────────────────────────────────  +-----------------+
//!              finish_timeline_request()
//! ```
//!
//! Cursors and edge states are independent of flight status; only
//! [`reset_cursors`](TimelineStateHolder::reset_cursors) clears them.

use serde::Serialize;
use strum::{Display, EnumString};

use crate::cursor::TimelineCursor;

/// What is known about one end of the timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EdgeState {
    /// Not fetched in this direction since the last reset.
    #[default]
    Unknown,
    /// The last fetch in this direction returned items.
    HasMore,
    /// The last fetch in this direction returned nothing.
    Exhausted,
}

#[derive(Clone, Debug, Default)]
pub struct TimelineStateHolder {
    next_cursor: Option<TimelineCursor>,
    previous_cursor: Option<TimelineCursor>,
    next_edge: EdgeState,
    previous_edge: EdgeState,
    in_flight: bool,
}

impl TimelineStateHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from known cursors.
    pub fn with_cursors(
        next_cursor: Option<TimelineCursor>,
        previous_cursor: Option<TimelineCursor>,
    ) -> Self {
        Self {
            next_cursor,
            previous_cursor,
            ..Self::default()
        }
    }

    /// Lower bound for the next (newer) fetch.
    pub fn position_for_next(&self) -> Option<i64> {
        self.next_cursor.and_then(|c| c.max_position)
    }

    /// Upper bound for the previous (older) fetch.
    pub fn position_for_previous(&self) -> Option<i64> {
        self.previous_cursor.and_then(|c| c.min_position)
    }

    pub fn next_cursor(&self) -> Option<TimelineCursor> {
        self.next_cursor
    }

    pub fn previous_cursor(&self) -> Option<TimelineCursor> {
        self.previous_cursor
    }

    /// Set the next cursor, also seeding the previous one if unset.
    pub fn set_next_cursor(&mut self, cursor: Option<TimelineCursor>) {
        self.next_cursor = cursor;
        self.set_cursors_if_null(cursor);
    }

    /// Set the previous cursor, also seeding the next one if unset.
    pub fn set_previous_cursor(&mut self, cursor: Option<TimelineCursor>) {
        self.previous_cursor = cursor;
        self.set_cursors_if_null(cursor);
    }

    /// Fill whichever cursor is still `None`. A first page bounds both
    /// directions.
    pub fn set_cursors_if_null(&mut self, cursor: Option<TimelineCursor>) {
        if self.next_cursor.is_none() {
            self.next_cursor = cursor;
        }
        if self.previous_cursor.is_none() {
            self.previous_cursor = cursor;
        }
    }

    /// Forget both cursors and both edges.
    pub fn reset_cursors(&mut self) {
        self.next_cursor = None;
        self.previous_cursor = None;
        self.next_edge = EdgeState::Unknown;
        self.previous_edge = EdgeState::Unknown;
    }

    /// Enter `RequestInFlight`. Returns false, changing nothing, if a request
    /// is already in flight.
    pub fn start_timeline_request(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Return to `Idle` unconditionally.
    pub fn finish_timeline_request(&mut self) {
        self.in_flight = false;
    }

    pub fn is_request_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn next_edge(&self) -> EdgeState {
        self.next_edge
    }

    pub fn previous_edge(&self) -> EdgeState {
        self.previous_edge
    }

    pub fn set_next_edge(&mut self, edge: EdgeState) {
        self.next_edge = edge;
    }

    pub fn set_previous_edge(&mut self, edge: EdgeState) {
        self.previous_edge = edge;
    }
}
