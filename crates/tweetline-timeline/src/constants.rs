//! Delegate defaults.
//!
//! Centralizes the tuning values a [`DelegateConfig`](crate::DelegateConfig)
//! falls back to.

/// Hard ceiling on the number of items a delegate holds. `next` and
/// `previous` are rejected at or above it; `refresh` is not.
pub const CAPACITY: usize = 200;

/// Items per page requested from a source that takes a count.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Buffered data-set events per broadcast subscriber before it lags.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
