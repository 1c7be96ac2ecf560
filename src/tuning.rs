//! Game balance and presentation tuning
//!
//! Every constant the simulation consumes lives here so a round can be
//! rebalanced from a JSON file without touching code.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::POSITION_DEAD_ZONE;

/// Environment variable naming an optional tuning JSON file
pub const TUNING_ENV_VAR: &str = "HEAD_CATCH_TUNING";

/// Upper bound for every millisecond field (one day)
pub const MAX_PERIOD_MS: u64 = 86_400_000;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// How the spawner picks categories each interval
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// One beneficial and one harmful entity per interval
    #[default]
    Pair,
    /// A single entity per interval, beneficial with the given probability
    Weighted { beneficial_chance: f32 },
}

/// Data-driven game balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Viewport ===
    /// Playfield width in world units
    pub viewport_width: f32,
    /// Playfield height in world units
    pub viewport_height: f32,
    /// Flip the tracker's x axis so the avatar moves like a mirror image
    pub mirror_x: bool,

    // === Avatar ===
    /// Avatar box edge length
    pub avatar_size: f32,
    /// Dead-zone radius for head position updates (normalized units)
    pub dead_zone: f32,

    // === Spawning ===
    /// Milliseconds between spawn waves
    pub spawn_interval_ms: u64,
    /// Category selection policy
    pub spawn_policy: SpawnPolicy,
    /// Slowest initial fall speed (units/s, before the ramp)
    pub min_fall_speed: f32,
    /// Fastest initial fall speed (units/s, before the ramp)
    pub max_fall_speed: f32,
    /// Falling entity box edge length
    pub entity_size: f32,

    // === Difficulty ===
    /// Milliseconds between ramp steps
    pub ramp_interval_ms: u64,
    /// Multiplier increase per ramp step
    pub ramp_step: f32,

    // === Round ===
    /// Round length in milliseconds
    pub round_duration_ms: u64,
    /// Period of the countdown display tick
    pub timer_tick_ms: u64,
    /// Points for catching a beneficial entity
    pub beneficial_points: i32,
    /// Points for touching a harmful entity (negative)
    pub harmful_points: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            mirror_x: true,

            avatar_size: 96.0,
            dead_zone: POSITION_DEAD_ZONE,

            spawn_interval_ms: 1_000,
            spawn_policy: SpawnPolicy::Pair,
            min_fall_speed: 150.0,
            max_fall_speed: 300.0,
            entity_size: 48.0,

            ramp_interval_ms: 30_000,
            ramp_step: 0.02,

            round_duration_ms: 90_000,
            timer_tick_ms: 1_000,
            beneficial_points: 10,
            harmful_points: -5,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from the file named by `HEAD_CATCH_TUNING`, or fall back to defaults
    pub fn from_env() -> Result<Self, TuningError> {
        match std::env::var(TUNING_ENV_VAR) {
            Ok(path) if !path.is_empty() => {
                log::info!("Loading tuning from {}", path);
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> TuningError {
            TuningError::Invalid { field, reason }
        }

        let floats = [
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("avatar_size", self.avatar_size),
            ("entity_size", self.entity_size),
            ("dead_zone", self.dead_zone),
            ("min_fall_speed", self.min_fall_speed),
            ("max_fall_speed", self.max_fall_speed),
            ("ramp_step", self.ramp_step),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }

        let periods = [
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("ramp_interval_ms", self.ramp_interval_ms),
            ("timer_tick_ms", self.timer_tick_ms),
            ("round_duration_ms", self.round_duration_ms),
        ];
        for (field, value) in periods {
            if value == 0 {
                return Err(invalid(field, "must be non-zero"));
            }
            if value > MAX_PERIOD_MS {
                return Err(invalid(field, "must be at most one day"));
            }
        }

        if !(self.viewport_width > 0.0) {
            return Err(invalid("viewport_width", "must be positive"));
        }
        if !(self.viewport_height > 0.0) {
            return Err(invalid("viewport_height", "must be positive"));
        }
        if !(self.avatar_size > 0.0) {
            return Err(invalid("avatar_size", "must be positive"));
        }
        if !(self.entity_size > 0.0) {
            return Err(invalid("entity_size", "must be positive"));
        }
        if !(self.dead_zone >= 0.0) {
            return Err(invalid("dead_zone", "must not be negative"));
        }
        if !(self.min_fall_speed > 0.0) || !(self.max_fall_speed >= self.min_fall_speed) {
            return Err(invalid("min_fall_speed", "need 0 < min <= max"));
        }
        if !(self.ramp_step >= 0.0) {
            return Err(invalid("ramp_step", "ramp must not decrease"));
        }
        if let SpawnPolicy::Weighted { beneficial_chance } = self.spawn_policy {
            if !(0.0..=1.0).contains(&beneficial_chance) {
                return Err(invalid("spawn_policy", "beneficial_chance must be in [0, 1]"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "round_duration_ms": 30000 }"#).unwrap();
        assert_eq!(tuning.round_duration_ms, 30_000);
        assert_eq!(tuning.spawn_interval_ms, 1_000);
        assert_eq!(tuning.spawn_policy, SpawnPolicy::Pair);
    }

    #[test]
    fn test_weighted_policy_json() {
        let tuning = Tuning::from_json(
            r#"{ "spawn_policy": { "kind": "weighted", "beneficial_chance": 0.7 } }"#,
        )
        .unwrap();
        assert_eq!(
            tuning.spawn_policy,
            SpawnPolicy::Weighted {
                beneficial_chance: 0.7
            }
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        // serde_json reads out-of-range f32 literals as infinity
        for json in [
            r#"{ "viewport_width": 1e39 }"#,
            r#"{ "viewport_height": 1e39 }"#,
            r#"{ "max_fall_speed": 1e39 }"#,
            r#"{ "min_fall_speed": 1e39, "max_fall_speed": 1e39 }"#,
            r#"{ "ramp_step": 1e39 }"#,
        ] {
            let err = Tuning::from_json(json).unwrap_err();
            assert!(
                matches!(err, TuningError::Invalid { reason: "must be finite", .. }),
                "{json}: {err}"
            );
        }
    }

    #[test]
    fn test_rejects_huge_periods() {
        let err = Tuning::from_json(r#"{ "round_duration_ms": 18446744073709551615 }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "round_duration_ms",
                ..
            }
        ));
        assert!(Tuning::from_json(r#"{ "round_duration_ms": 86400000 }"#).is_ok());
    }

    #[test]
    fn test_rejects_inverted_speed_range() {
        let err = Tuning::from_json(r#"{ "min_fall_speed": 400, "max_fall_speed": 100 }"#)
            .unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "min_fall_speed", .. }));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = Tuning::from_json(r#"{ "spawn_interval_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Tuning::from_json("{ nope"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Tuning::load("/definitely/not/here.json"),
            Err(TuningError::Io(_))
        ));
    }
}
