//! The interactive screen: a live countdown line plus per-category tallies.
//!
//! One cooperative task owns everything, on a current-thread runtime. A
//! `select!` interleaves the 1-second countdown cadence with stdin lines;
//! the interval is rebuilt whenever a press bumps the engine's generation,
//! so the cadence phase restarts even when the countdown was already
//! running. Presses persist before the render that follows them.

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use smokewatch_core::{format_hms, Config, Database, Event, Tracker};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch_loop())
}

async fn watch_loop() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let (mut tracker, rollovers) = Tracker::load(db, &config)?;

    for event in &rollovers {
        if let Event::CounterRolledOver { category, previous_count, .. } = event {
            println!("{category}: daily reset (was {previous_count})");
        }
    }
    let keys = tracker
        .slots()
        .map(|(category, _)| format!("{} = {}", category.key, category.label))
        .collect::<Vec<_>>()
        .join(", ");
    println!("type a category key and Enter to record ({keys}); q quits");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = arm_ticker();
    let mut generation = tracker.engine().generation();

    render(&tracker, &config);
    loop {
        tokio::select! {
            _ = ticker.tick(), if tracker.engine().is_running() => {
                let expired = tracker.tick();
                render(&tracker, &config);
                if expired.is_some() {
                    println!();
                    println!("countdown finished");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = line.trim().to_lowercase();
                if input.is_empty() {
                    render(&tracker, &config);
                    continue;
                }
                if input == "q" || input == "quit" {
                    break;
                }
                println!();
                match find_category(&tracker, &input) {
                    Some(key) => {
                        for event in tracker.press(&key)? {
                            if let Event::SmokeRecorded { category, count, .. } = event {
                                println!("{category} recorded (count {count})");
                            }
                        }
                    }
                    None => println!("unknown input: {input}"),
                }
                if tracker.engine().generation() != generation {
                    generation = tracker.engine().generation();
                    ticker = arm_ticker();
                }
                render(&tracker, &config);
            }
        }
    }
    println!();
    Ok(())
}

/// A fresh 1-second cadence whose first tick lands a full second from now.
fn arm_ticker() -> Interval {
    let mut ticker = time::interval_at(
        Instant::now() + Duration::from_secs(1),
        Duration::from_secs(1),
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Match typed input against a category key or its leading characters.
fn find_category(tracker: &Tracker, input: &str) -> Option<String> {
    tracker.slots().find_map(|(category, _)| {
        (category.key == input || category.key.starts_with(input))
            .then(|| category.key.clone())
    })
}

fn render(tracker: &Tracker, config: &Config) {
    let remaining = tracker.engine().remaining_secs();
    let marker = if !tracker.engine().is_running() {
        '-'
    } else if remaining <= config.timer.low_warn_seconds {
        '!'
    } else {
        ' '
    };
    let counts = tracker
        .slots()
        .map(|(category, tally)| format!("{} {}", category.label, tally.count))
        .collect::<Vec<_>>()
        .join("  ");
    print!("\r{marker} {}   {counts}  ", format_hms(remaining));
    let _ = std::io::stdout().flush();
}
