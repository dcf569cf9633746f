//! Per-category tally state.

use serde::{Deserialize, Serialize};

/// A tracked event category: the store key prefix and the display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
}

impl Category {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    /// Store key holding this category's running count.
    pub fn count_key(&self) -> String {
        format!("{}_count", self.key)
    }

    /// Store key holding this category's last-reset stamp (epoch ms).
    pub fn last_reset_key(&self) -> String {
        format!("{}_last_reset_time", self.key)
    }
}

/// Running tally for one category.
///
/// `last_reset_ms` doubles as the last-action stamp: both a press and a
/// rollover move it forward. Zero means never touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyState {
    pub count: u32,
    pub last_reset_ms: i64,
}

impl TallyState {
    /// A press: count grows by one and the stamp moves to now.
    pub fn record(&mut self, now_ms: i64) {
        self.count = self.count.saturating_add(1);
        self.last_reset_ms = now_ms;
    }

    /// A rollover: count zeroes and the stamp moves to now.
    pub fn reset(&mut self, now_ms: i64) {
        self.count = 0;
        self.last_reset_ms = now_ms;
    }
}
