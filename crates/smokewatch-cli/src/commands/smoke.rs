use smokewatch_core::{Config, Database, Tracker};

/// One-shot press: load (which applies the daily rollover), record the
/// event, and print everything that happened as JSON. The countdown
/// restart applies to this process's engine only - timer state is never
/// persisted.
pub fn run(category: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let (mut tracker, rollovers) = Tracker::load(db, &config)?;
    let events = tracker.press(category)?;
    for event in rollovers.iter().chain(&events) {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}
