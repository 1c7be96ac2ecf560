//! Simulation-clock timers
//!
//! All times are integer microseconds of simulated time so that repeating
//! schedules line up exactly with the countdown.

use serde::{Deserialize, Serialize};

use crate::millis_to_micros;

/// Repeating timer that fires every `period`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalTimer {
    period_us: u64,
    elapsed_us: u64,
    running: bool,
}

impl IntervalTimer {
    /// A stopped timer with the given period
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_us: millis_to_micros(period_ms).max(1),
            elapsed_us: 0,
            running: false,
        }
    }

    /// Start (or restart) from zero
    pub fn start(&mut self) {
        self.elapsed_us = 0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed_us = 0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `dt_us`, returning how many periods elapsed
    pub fn advance(&mut self, dt_us: u64) -> u32 {
        if !self.running {
            return 0;
        }
        self.elapsed_us += dt_us;
        let fires = self.elapsed_us / self.period_us;
        self.elapsed_us %= self.period_us;
        fires as u32
    }
}

/// Result of advancing the countdown by one simulation tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownTick {
    /// Whole seconds left, set on display ticks only
    pub display_secs: Option<u32>,
    /// True exactly once: on the first tick that found no time left
    pub expired: bool,
}

/// Round countdown
///
/// Only the start time and duration are stored; remaining time is always
/// derived from the clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownTimer {
    started_at_us: u64,
    duration_ms: u64,
    display: IntervalTimer,
    ended: bool,
}

impl CountdownTimer {
    pub fn start(now_us: u64, duration_ms: u64, display_tick_ms: u64) -> Self {
        let mut display = IntervalTimer::new(display_tick_ms);
        display.start();
        Self {
            started_at_us: now_us,
            duration_ms,
            display,
            ended: false,
        }
    }

    pub fn started_at_us(&self) -> u64 {
        self.started_at_us
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// Microseconds left at `now_us`, never negative
    pub fn remaining_us(&self, now_us: u64) -> u64 {
        let elapsed = now_us.saturating_sub(self.started_at_us);
        millis_to_micros(self.duration_ms).saturating_sub(elapsed)
    }

    /// Milliseconds left, rounded up
    pub fn remaining_ms(&self, now_us: u64) -> u64 {
        self.remaining_us(now_us).div_ceil(1_000)
    }

    /// Whole seconds left, rounded up (what the HUD shows)
    pub fn remaining_secs(&self, now_us: u64) -> u32 {
        self.remaining_us(now_us).div_ceil(1_000_000) as u32
    }

    /// Advance the display tick and check for expiry. `now_us` is the clock
    /// after this tick's step.
    ///
    /// Expiry does not wait for a display tick; the tick that runs out the
    /// clock also reports `display_secs` so the HUD lands on zero.
    pub fn advance(&mut self, now_us: u64, dt_us: u64) -> CountdownTick {
        let display_due = self.display.advance(dt_us) > 0;
        let expired = !self.ended && self.remaining_us(now_us) == 0;
        if expired {
            self.ended = true;
        }
        if !display_due && !expired {
            return CountdownTick::default();
        }
        CountdownTick {
            display_secs: Some(self.remaining_secs(now_us)),
            expired,
        }
    }
}
