//! Difficulty ramp
//!
//! A fall-speed multiplier that climbs a fixed step on a fixed interval while
//! a round is playing. Only new spawns read it.

use serde::{Deserialize, Serialize};

use super::timer::IntervalTimer;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyRamp {
    multiplier: f32,
    step: f32,
    timer: IntervalTimer,
}

impl DifficultyRamp {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            multiplier: 1.0,
            step: tuning.ramp_step.max(0.0),
            timer: IntervalTimer::new(tuning.ramp_interval_ms),
        }
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn start(&mut self) {
        self.timer.start();
    }

    /// Stop climbing; the current multiplier is kept
    pub fn stop(&mut self) {
        self.timer.stop();
    }

    /// Stop and return to 1.0
    pub fn reset(&mut self) {
        self.timer.stop();
        self.multiplier = 1.0;
    }

    /// Advance the interval. Returns the new multiplier if it climbed.
    pub fn advance(&mut self, dt_us: u64) -> Option<f32> {
        let steps = self.timer.advance(dt_us);
        if steps == 0 {
            return None;
        }
        self.multiplier += self.step * steps as f32;
        Some(self.multiplier)
    }
}
