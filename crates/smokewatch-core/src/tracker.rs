//! Screen-level state: the shared countdown plus per-category tallies.
//!
//! `Tracker` is what a frontend owns. Loading reads every tally from the
//! store and applies the daily rollover before anything renders; a press
//! mutates the tally in memory, persists exactly that category's key pair,
//! then restarts the shared countdown. All of it runs on the frontend's
//! single logical thread, so the store only ever sees interleaved, never
//! concurrent, writes.

use chrono::{DateTime, Local, Utc};
use tracing::{debug, info};

use crate::error::{CoreError, Result};
use crate::events::{CategoryCount, Event};
use crate::rollover::reset_due;
use crate::storage::{Config, Database};
use crate::tally::{Category, TallyState};
use crate::timer::{format_hms, CountdownEngine};

struct Slot {
    category: Category,
    tally: TallyState,
}

pub struct Tracker {
    engine: CountdownEngine,
    slots: Vec<Slot>,
    db: Database,
}

impl Tracker {
    /// Load screen state from the store and apply the daily rollover.
    ///
    /// Rolled-over categories are persisted before this returns, so the
    /// first render never shows a stale count. Returns the rollover events
    /// alongside the tracker.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn load(db: Database, config: &Config) -> Result<(Self, Vec<Event>)> {
        Self::load_at(db, config, Local::now())
    }

    /// Injectable-clock variant of [`load`](Self::load); frontends normally
    /// call `load`.
    pub fn load_at(
        db: Database,
        config: &Config,
        now: DateTime<Local>,
    ) -> Result<(Self, Vec<Event>)> {
        let now_ms = now.timestamp_millis();
        let threshold_ms = config.rollover.threshold_ms_for(now);

        let mut slots = Vec::with_capacity(config.categories.len());
        let mut events = Vec::new();
        for category in &config.categories {
            let raw_count = db.kv_get(&category.count_key())?;
            let mut tally = TallyState {
                count: raw_count.clamp(0, i64::from(u32::MAX)) as u32,
                last_reset_ms: db.kv_get(&category.last_reset_key())?,
            };
            if reset_due(now_ms, threshold_ms, tally.last_reset_ms, tally.count) {
                let previous = tally.count;
                tally.reset(now_ms);
                db.kv_set(&category.count_key(), 0)?;
                db.kv_set(&category.last_reset_key(), now_ms)?;
                info!(category = %category.key, previous, "daily rollover reset");
                events.push(Event::CounterRolledOver {
                    category: category.key.clone(),
                    previous_count: previous,
                    at: Utc::now(),
                });
            }
            slots.push(Slot {
                category: category.clone(),
                tally,
            });
        }

        let engine = CountdownEngine::new(config.timer.initial_seconds);
        Ok((Self { engine, slots, db }, events))
    }

    /// Press a category's action: tally += 1, stamp, persist the key pair,
    /// restart the shared countdown. The write lands before the caller can
    /// render the returned events.
    ///
    /// # Errors
    /// Returns an error for an untracked category or a failed write.
    pub fn press(&mut self, key: &str) -> Result<Vec<Event>> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.category.key == key)
            .ok_or_else(|| CoreError::UnknownCategory(key.to_string()))?;

        let now_ms = Utc::now().timestamp_millis();
        slot.tally.record(now_ms);
        self.db
            .kv_set(&slot.category.count_key(), i64::from(slot.tally.count))?;
        self.db.kv_set(&slot.category.last_reset_key(), now_ms)?;
        debug!(category = %slot.category.key, count = slot.tally.count, "press recorded");

        let recorded = Event::SmokeRecorded {
            category: slot.category.key.clone(),
            count: slot.tally.count,
            at: Utc::now(),
        };
        let restarted = self.engine.restart();
        Ok(vec![recorded, restarted])
    }

    /// Advance the countdown one second.
    pub fn tick(&mut self) -> Option<Event> {
        self.engine.tick()
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    /// The tracked categories and their tallies, in config order.
    pub fn slots(&self) -> impl Iterator<Item = (&Category, &TallyState)> {
        self.slots.iter().map(|s| (&s.category, &s.tally))
    }

    /// Full-state snapshot for rendering or `status` output.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.engine.state(),
            remaining_secs: self.engine.remaining_secs(),
            display: format_hms(self.engine.remaining_secs()),
            counts: self
                .slots
                .iter()
                .map(|s| CategoryCount {
                    key: s.category.key.clone(),
                    label: s.category.label.clone(),
                    count: s.tally.count,
                })
                .collect(),
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn memory_tracker() -> Tracker {
        let db = Database::open_memory().unwrap();
        let (tracker, events) = Tracker::load(db, &Config::default()).unwrap();
        assert!(events.is_empty());
        tracker
    }

    #[test]
    fn fresh_load_starts_paused_at_initial() {
        let tracker = memory_tracker();
        assert!(!tracker.engine().is_running());
        assert_eq!(tracker.engine().remaining_secs(), 4500);
        for (_, tally) in tracker.slots() {
            assert_eq!(*tally, TallyState::default());
        }
    }

    #[test]
    fn press_records_persists_and_restarts() {
        let mut tracker = memory_tracker();
        let events = tracker.press("cig").unwrap();

        assert!(matches!(
            events[0],
            Event::SmokeRecorded { ref category, count: 1, .. } if category == "cig"
        ));
        assert!(matches!(
            events[1],
            Event::TimerRestarted { remaining_secs: 4500, .. }
        ));
        assert!(tracker.engine().is_running());

        // The pressed category's pair is in the store, the other untouched.
        assert_eq!(tracker.db.kv_get("cig_count").unwrap(), 1);
        assert!(tracker.db.kv_get("cig_last_reset_time").unwrap() > 0);
        assert_eq!(tracker.db.kv_get("weed_count").unwrap(), 0);
        assert_eq!(tracker.db.kv_get("weed_last_reset_time").unwrap(), 0);
    }

    #[test]
    fn any_press_clobbers_a_running_countdown() {
        let mut tracker = memory_tracker();
        tracker.press("cig").unwrap();
        tracker.tick();
        tracker.tick();
        assert_eq!(tracker.engine().remaining_secs(), 4498);

        // Last press wins, whichever category it came from.
        tracker.press("weed").unwrap();
        assert_eq!(tracker.engine().remaining_secs(), 4500);
        assert!(tracker.engine().is_running());
    }

    #[test]
    fn press_unknown_category_is_an_error() {
        let mut tracker = memory_tracker();
        let err = tracker.press("pipe").unwrap_err();
        assert!(matches!(err, CoreError::UnknownCategory(_)));
    }

    #[test]
    fn load_applies_rollover_before_first_snapshot() {
        let db = Database::open_memory().unwrap();
        let config = Config::default();

        // Stale state: five presses, last stamped the previous afternoon.
        let now = Local.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap();
        let stale = Local.with_ymd_and_hms(2025, 6, 14, 16, 30, 0).unwrap();
        db.kv_set("cig_count", 5).unwrap();
        db.kv_set("cig_last_reset_time", stale.timestamp_millis()).unwrap();

        let (tracker, events) = Tracker::load_at(db, &config, now).unwrap();

        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Event::CounterRolledOver { ref category, previous_count: 5, .. } if category == "cig"
        ));
        let Event::StateSnapshot { counts, .. } = tracker.snapshot() else {
            panic!("expected StateSnapshot");
        };
        assert_eq!(counts[0].count, 0);
        assert_eq!(counts[1].count, 0);

        // The zeroed pair was persisted at load time.
        assert_eq!(tracker.db.kv_get("cig_count").unwrap(), 0);
        assert_eq!(tracker.db.kv_get("cig_last_reset_time").unwrap(), now.timestamp_millis());
    }

    #[test]
    fn rollover_skips_zero_counts() {
        let db = Database::open_memory().unwrap();
        let now = Local.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap();

        let (tracker, events) = Tracker::load_at(db, &Config::default(), now).unwrap();

        // Nothing to clear, nothing stamped.
        assert!(events.is_empty());
        assert_eq!(tracker.db.kv_get("cig_last_reset_time").unwrap(), 0);
        assert_eq!(tracker.db.kv_get("weed_last_reset_time").unwrap(), 0);
    }

    #[test]
    fn same_day_reload_does_not_roll_over_again() {
        let db = Database::open_memory().unwrap();
        let config = Config::default();
        let now = Local.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap();
        db.kv_set("weed_count", 2).unwrap();
        db.kv_set("weed_last_reset_time", 1).unwrap();

        let (mut tracker, events) = Tracker::load_at(db, &config, now).unwrap();
        assert_eq!(events.len(), 1);

        // Press after the reset, then reload later the same day.
        tracker.press("weed").unwrap();
        let later = Local.with_ymd_and_hms(2025, 6, 15, 22, 15, 0).unwrap();
        let (tracker, events) = Tracker::load_at(tracker.db, &config, later).unwrap();
        assert!(events.is_empty());
        let Event::StateSnapshot { counts, .. } = tracker.snapshot() else {
            panic!("expected StateSnapshot");
        };
        assert_eq!(counts[1].count, 1);
    }
}
