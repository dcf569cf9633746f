//! Countdown engine implementation.
//!
//! The engine is a tick-driven state machine. It owns no clock and spawns
//! no threads - the frontend calls `tick()` once per elapsed second while
//! the countdown is running.
//!
//! ## State Transitions
//!
//! ```text
//! Running --(tick, remaining > 1)--> Running
//! Running --(tick, remaining == 1)--> Paused    (expiry, automatic)
//! Paused|Running --(restart)--> Running         (remaining := initial)
//! ```
//!
//! There is no user-facing pause or cancel; the only external transition is
//! the restart that accompanies a press. The countdown is never persisted -
//! every screen load begins at `{initial, Paused}`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Paused,
    Running,
}

/// The shared countdown.
///
/// `remaining_secs` never exceeds `initial_secs` and never goes negative;
/// the state flips to `Paused` on exactly the tick that reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownEngine {
    initial_secs: u64,
    remaining_secs: u64,
    state: CountdownState,
    /// Bumped on every restart. The driving loop keys its 1-second cadence
    /// on this value, so a press while already running still restarts the
    /// cadence phase.
    generation: u64,
}

impl CountdownEngine {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            initial_secs,
            remaining_secs: initial_secs,
            state: CountdownState::Paused,
            generation: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn initial_secs(&self) -> u64 {
        self.initial_secs
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Restart from a button press. Any category's press lands here: the
    /// countdown is shared and the last press wins.
    pub fn restart(&mut self) -> Event {
        self.remaining_secs = self.initial_secs;
        self.state = CountdownState::Running;
        self.generation += 1;
        Event::TimerRestarted {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance one second. Returns the expiry event on the tick that
    /// reaches zero; a tick while paused is a no-op.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != CountdownState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = CountdownState::Paused;
            return Some(Event::TimerExpired { at: Utc::now() });
        }
        None
    }
}
