use smokewatch_core::{Config, Database, Tracker};

/// Print rollover events (if the load triggered any) and a full snapshot.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let (tracker, rollovers) = Tracker::load(db, &config)?;
    for event in &rollovers {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    println!("{}", serde_json::to_string_pretty(&tracker.snapshot())?);
    Ok(())
}
