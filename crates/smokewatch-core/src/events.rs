use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::CountdownState;

/// Every externally visible state change produces an Event.
/// One-shot CLI commands print them as JSON; the watch screen renders
/// from snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A category's action was pressed and its tally persisted.
    SmokeRecorded {
        category: String,
        count: u32,
        at: DateTime<Utc>,
    },
    /// The shared countdown was (re)armed by a press.
    TimerRestarted {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero and paused itself.
    TimerExpired { at: DateTime<Utc> },
    /// A tally was zeroed by the daily rollover at load time.
    CounterRolledOver {
        category: String,
        previous_count: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: CountdownState,
        remaining_secs: u64,
        display: String,
        counts: Vec<CategoryCount>,
        at: DateTime<Utc>,
    },
}

/// One category's tally as rendered in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    pub key: String,
    pub label: String,
    pub count: u32,
}
