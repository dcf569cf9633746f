//! Daily tally rollover.
//!
//! A category's count zeroes once per day after a fixed local time-of-day
//! threshold (09:00 by default). The check is a load-time consistency pass,
//! not a live clock watcher: it runs once per category when the screen
//! loads, and stamping `last_reset` at or after the threshold makes every
//! further check that day a no-op.

use chrono::{DateTime, Local, LocalResult};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Local wall-clock time of day at which tallies reset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResetPolicy {
    #[serde(default = "default_hour")]
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
    #[serde(default)]
    pub second: u32,
}

fn default_hour() -> u32 {
    9
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self {
            hour: default_hour(),
            minute: 0,
            second: 0,
        }
    }
}

impl ResetPolicy {
    /// The threshold instant on `now`'s calendar date.
    ///
    /// A wall time made ambiguous by a DST transition resolves to its
    /// earliest mapping; one swallowed by a DST gap falls back to `now`.
    pub fn threshold_for(&self, now: DateTime<Local>) -> DateTime<Local> {
        let wall = now
            .date_naive()
            .and_hms_opt(self.hour, self.minute, self.second)
            .unwrap_or_else(|| now.naive_local());
        match wall.and_local_timezone(Local) {
            LocalResult::Single(t) => t,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => now,
        }
    }

    /// Threshold as epoch milliseconds, for comparison against stored stamps.
    pub fn threshold_ms_for(&self, now: DateTime<Local>) -> i64 {
        self.threshold_for(now).timestamp_millis()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hour > 23 {
            return Err(ConfigError::InvalidValue {
                key: "rollover.hour".into(),
                message: format!("{} is not a valid hour", self.hour),
            });
        }
        if self.minute > 59 || self.second > 59 {
            return Err(ConfigError::InvalidValue {
                key: "rollover".into(),
                message: "minute and second must be below 60".into(),
            });
        }
        Ok(())
    }
}

/// Whether a tally must reset now.
///
/// Due when the threshold has passed, the tally has not been stamped since,
/// and there is anything to clear. A zero count never triggers a write, so
/// repeated evaluation within the same day stays idempotent.
pub fn reset_due(now_ms: i64, threshold_ms: i64, last_reset_ms: i64, count: u32) -> bool {
    count > 0 && now_ms >= threshold_ms && last_reset_ms < threshold_ms
}
