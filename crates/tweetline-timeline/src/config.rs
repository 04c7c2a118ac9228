//! Delegate configuration, loadable from RON.
//!
//! ```ron
//! (
//!     capacity: 200,
//!     refresh_policy: Gated,
//!     page_size: 30,
//! )
//! ```
//!
//! Every field is optional in the file; missing ones take the defaults in
//! [`constants`](crate::constants).

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::constants::{CAPACITY, DEFAULT_PAGE_SIZE};
use crate::error::ConfigError;

/// Whether `refresh` honours the single-flight gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum RefreshPolicy {
    /// Refresh is rejected with `RequestInFlight` while a fetch is outstanding.
    #[default]
    Gated,
    /// Refresh always dispatches and may race an outstanding next/previous.
    Ungated,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegateConfig {
    /// Item ceiling for `next`/`previous`.
    pub capacity: usize,
    pub refresh_policy: RefreshPolicy,
    /// Page size handed to the source when the caller builds it, e.g.
    /// [`MemoryTimeline::with_page_size`](crate::MemoryTimeline::with_page_size).
    /// The delegate itself never reads it: pages are merged whole, whatever
    /// size the source returns.
    pub page_size: usize,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            capacity: CAPACITY,
            refresh_policy: RefreshPolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DelegateConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path)?;
        Ok(ron::de::from_bytes(&bytes)?)
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}
