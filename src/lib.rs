//! Head Catch - a head-tracked arcade catching game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, game state)
//! - `perception`: Bridge between the head tracker and the simulation
//! - `session`: Frame driver that ties perception to the fixed-step simulation
//! - `tuning`: Data-driven game balance

pub mod perception;
pub mod session;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use perception::{NormalizedPosition, PerceptionStatus, PositionStore};
pub use session::{FrameStepper, Session};
pub use tuning::{SpawnPolicy, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the stepper (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Head positions closer than this to the stored one are jitter
    pub const POSITION_DEAD_ZONE: f32 = 0.001;
    /// Where the head is assumed to be before the tracker reports anything
    pub const DEFAULT_HEAD_POS: (f32, f32) = (0.5, 0.5);
}

/// Convert a frame delta in seconds to whole simulation microseconds
#[inline]
pub fn secs_to_micros(dt: f32) -> u64 {
    if dt <= 0.0 || !dt.is_finite() {
        return 0;
    }
    (dt as f64 * 1_000_000.0).round() as u64
}

/// Convert milliseconds to microseconds, saturating at `u64::MAX`
#[inline]
pub const fn millis_to_micros(ms: u64) -> u64 {
    ms.saturating_mul(1_000)
}
