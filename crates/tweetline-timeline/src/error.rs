//! Error types for timeline operations.

use thiserror::Error;

/// Errors surfaced to timeline request callbacks.
///
/// Capacity and in-flight rejections are synthesized by the delegate before
/// any fetch is issued; `Transport` carries whatever the source reported.
#[derive(Error, Debug)]
pub enum TimelineError {
    /// Delegate built without a timeline source.
    #[error("Timeline must not be null")]
    MissingTimeline,

    /// Item list is at or above capacity.
    #[error("Max capacity reached")]
    CapacityReached,

    /// Another fetch has not completed yet.
    #[error("Request already in flight")]
    RequestInFlight,

    /// Failure reported by the timeline source.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TimelineError {
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }

    /// Rejected locally, without contacting the source.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::CapacityReached | Self::RequestInFlight)
    }
}

/// Errors loading a [`DelegateConfig`](crate::DelegateConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}
