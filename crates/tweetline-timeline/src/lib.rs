//! Paginated timeline delegate.
//!
//! A [`TimelineDelegate`] keeps a capacity-bounded, newest-first list of
//! items fed by a [`Timeline`] source, pages it in both directions with
//! cursors, allows one fetch at a time, and tells observers when the list
//! changes.
//!
//! # Key Types
//!
//! |-------------------------|---------------------------------------------|
//! | Type                    | Purpose                                     |
//! |-------------------------|---------------------------------------------|
//! | [`TimelineDelegate`]    | Owns the list; refresh / next / previous    |
//! | [`TimelineStateHolder`] | Cursors, edge states, single-flight flag    |
//! | [`Timeline`]            | Async page source                           |
//! | [`MemoryTimeline`]      | In-memory source                            |
//! | [`DataSetObservable`]   | Observer registry + broadcast of changes    |
//! | [`DelegateConfig`]      | Capacity, refresh policy, page size (RON)   |
//! |-------------------------|---------------------------------------------|

pub mod config;
pub mod constants;
pub mod cursor;
pub mod delegate;
pub mod error;
pub mod memory;
pub mod observable;
pub mod state;
pub mod timeline;

pub use config::{DelegateConfig, RefreshPolicy};
pub use constants::CAPACITY;
pub use cursor::{TimelineCursor, TimelineResult, decrement_max_id};
pub use delegate::{
    RequestKind, TimelineCallback, TimelineDelegate, TimelineDelegateBuilder, on_complete,
};
pub use error::{ConfigError, TimelineError};
pub use memory::MemoryTimeline;
pub use observable::{DataSetEvent, DataSetObservable, DataSetObserver, ObserverId};
pub use state::{EdgeState, TimelineStateHolder};
pub use timeline::Timeline;
