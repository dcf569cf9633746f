//! Persistence behavior across simulated process restarts.
//!
//! Counts must survive a restart; the countdown must not.

use chrono::Local;
use smokewatch_core::{Config, Database, Event, Tracker};
use tempfile::TempDir;

fn open_db(dir: &TempDir) -> Database {
    Database::open_at(&dir.path().join("smokewatch.db")).unwrap()
}

fn counts_of(tracker: &Tracker) -> Vec<(String, u32)> {
    let Event::StateSnapshot { counts, .. } = tracker.snapshot() else {
        panic!("expected StateSnapshot");
    };
    counts.into_iter().map(|c| (c.key, c.count)).collect()
}

#[test]
fn counts_survive_restart_and_countdown_does_not() {
    let dir = TempDir::new().unwrap();
    let config = Config::default();

    let db = open_db(&dir);
    let (mut tracker, _) = Tracker::load(db, &config).unwrap();
    tracker.press("cig").unwrap();
    tracker.press("weed").unwrap();
    tracker.press("cig").unwrap();
    assert!(tracker.engine().is_running());
    drop(tracker);

    // Simulated restart: fresh process, same database file.
    let db = open_db(&dir);
    let (tracker, rollovers) = Tracker::load(db, &config).unwrap();
    assert!(rollovers.is_empty());
    assert_eq!(
        counts_of(&tracker),
        vec![("cig".to_string(), 2), ("weed".to_string(), 1)]
    );
    assert!(!tracker.engine().is_running());
    assert_eq!(tracker.engine().remaining_secs(), 4500);
}

#[test]
fn stale_counts_roll_over_at_load() {
    let dir = TempDir::new().unwrap();
    // A midnight threshold makes yesterday's stamp stale at any test time.
    let mut config = Config::default();
    config.rollover.hour = 0;
    config.rollover.minute = 0;
    config.rollover.second = 0;

    let db = open_db(&dir);
    let yesterday = Local::now() - chrono::Duration::days(1);
    db.kv_set("cig_count", 4).unwrap();
    db.kv_set("cig_last_reset_time", yesterday.timestamp_millis()).unwrap();
    drop(db);

    let db = open_db(&dir);
    let (tracker, events) = Tracker::load(db, &config).unwrap();

    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        Event::CounterRolledOver { ref category, previous_count: 4, .. } if category == "cig"
    ));
    assert_eq!(
        counts_of(&tracker),
        vec![("cig".to_string(), 0), ("weed".to_string(), 0)]
    );
    drop(tracker);

    // The zeroed pair is durable, and the next load has nothing left to do.
    let db = open_db(&dir);
    assert_eq!(db.kv_get("cig_count").unwrap(), 0);
    assert!(db.kv_get("cig_last_reset_time").unwrap() > yesterday.timestamp_millis());
    let (_, events) = Tracker::load(db, &config).unwrap();
    assert!(events.is_empty());
}
