//! Falling entity spawner
//!
//! Runs on its own interval while a round is playing. Each wave rolls
//! category, horizontal position and fall speed; the difficulty multiplier is
//! read once at spawn and baked into the entity's velocity.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Category;
use super::timer::IntervalTimer;
use crate::tuning::{SpawnPolicy, Tuning};

/// One entity the spawner wants created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub category: Category,
    pub x: f32,
    pub vel_y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnScheduler {
    timer: IntervalTimer,
    policy: SpawnPolicy,
}

impl SpawnScheduler {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            timer: IntervalTimer::new(tuning.spawn_interval_ms),
            policy: tuning.spawn_policy,
        }
    }

    pub fn start(&mut self) {
        self.timer.start();
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Advance the interval, returning how many waves are due
    pub fn advance(&mut self, dt_us: u64) -> u32 {
        self.timer.advance(dt_us)
    }

    /// Roll one wave
    pub fn plan_wave<R: Rng>(
        &self,
        rng: &mut R,
        tuning: &Tuning,
        multiplier: f32,
    ) -> Vec<SpawnPlan> {
        let categories: &[Category] = match self.policy {
            SpawnPolicy::Pair => &[Category::Beneficial, Category::Harmful],
            SpawnPolicy::Weighted { beneficial_chance } => {
                if rng.random_bool(beneficial_chance.clamp(0.0, 1.0) as f64) {
                    &[Category::Beneficial]
                } else {
                    &[Category::Harmful]
                }
            }
        };

        categories
            .iter()
            .map(|&category| {
                let x = rng.random_range(0.0..=tuning.viewport_width);
                let speed = rng.random_range(tuning.min_fall_speed..=tuning.max_fall_speed);
                SpawnPlan {
                    category,
                    x,
                    vel_y: speed * multiplier,
                }
            })
            .collect()
    }
}
