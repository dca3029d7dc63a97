//! Post-send cooldown countdown.
//!
//! Counts down whole seconds from the moment it starts. Time is passed in
//! explicitly so the UI drives it from the frame clock and tests from a
//! fixed `Instant`.

use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Default)]
pub struct Cooldown {
    remaining: u32,
    next_tick: Option<Instant>,
}

impl Cooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the countdown at `seconds`
    pub fn start(&mut self, seconds: u32, now: Instant) {
        self.remaining = seconds;
        self.next_tick = if seconds > 0 { Some(now + TICK) } else { None };
    }

    /// Advance to `now`. Several elapsed ticks are applied at once.
    pub fn tick(&mut self, now: Instant) {
        while let Some(deadline) = self.next_tick {
            if now < deadline {
                break;
            }
            self.remaining = self.remaining.saturating_sub(1);
            self.next_tick = if self.remaining > 0 { Some(deadline + TICK) } else { None };
        }
    }

    /// Whole seconds left
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// When the next decrement is due, for scheduling a repaint
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    pub fn cancel(&mut self) {
        self.remaining = 0;
        self.next_tick = None;
    }
}
