//! # Smokewatch Core Library
//!
//! Core logic for smokewatch, a countdown-and-tally tracker. Recording a
//! "smoked" event bumps that category's persistent tally and restarts a
//! single shared countdown; tallies zero themselves once per day after a
//! configurable local time-of-day threshold.
//!
//! The library is CLI-first: every operation is reachable through the
//! `smokewatch` binary, and any GUI shell would be a thin layer over the
//! same types.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: a tick-driven state machine; the frontend calls
//!   `tick()` once per elapsed second while it is running
//! - **Tracker**: screen-level controller gluing tallies, the daily
//!   rollover check, and persistence
//! - **Storage**: SQLite-backed key-value store and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: shared countdown state machine
//! - [`Tracker`]: load/press/tick/snapshot surface for frontends
//! - [`Database`]: per-category count and last-reset persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod rollover;
pub mod storage;
pub mod tally;
pub mod timer;
pub mod tracker;

pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::{CategoryCount, Event};
pub use rollover::{reset_due, ResetPolicy};
pub use storage::{data_dir, Config, Database, TimerConfig};
pub use tally::{Category, TallyState};
pub use timer::{format_hms, CountdownEngine, CountdownState};
pub use tracker::Tracker;
