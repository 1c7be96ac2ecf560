//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, camera or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod machine;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Aabb, Catch, resolve_catches, sweep_fallen};
pub use difficulty::DifficultyRamp;
pub use score::Score;
pub use spawn::{SpawnPlan, SpawnScheduler};
pub use state::{Avatar, Category, FallingEntity, GameEvent, GamePhase, GameState, Snapshot};
pub use tick::{TickInput, tick};
pub use timer::{CountdownTick, CountdownTimer, IntervalTimer};
