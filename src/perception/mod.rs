//! Perception bridge
//!
//! The head tracker runs at its own cadence and publishes into a single-slot
//! [`PositionStore`]; the simulation reads whatever is there each tick and
//! never waits on the tracker.

pub mod scripted;
pub mod store;
pub mod worker;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_HEAD_POS;

pub use scripted::ScriptedHead;
pub use store::PositionStore;
pub use worker::PerceptionWorker;

/// A point in the tracker's frame, both axes in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPosition {
    pub x: f32,
    pub y: f32,
}

impl Default for NormalizedPosition {
    fn default() -> Self {
        Self::CENTER
    }
}

impl NormalizedPosition {
    pub const CENTER: Self = Self {
        x: DEFAULT_HEAD_POS.0,
        y: DEFAULT_HEAD_POS.1,
    };

    /// Build a position, clamping each axis into [0, 1].
    /// Returns `None` for non-finite input.
    pub fn new(x: f32, y: f32) -> Option<Self> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some(Self {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
        })
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Tracker lifecycle as seen by the game
#[derive(Debug, Clone, PartialEq)]
pub enum PerceptionStatus {
    Initializing,
    Ready,
    Error(PerceptionError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PerceptionError {
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
    #[error("failed to load detection model: {0}")]
    ModelLoad(String),
    #[error("inference failed: {0}")]
    Inference(String),
}

/// A head tracker the worker can drive
///
/// Implementations wrap whatever produces head coordinates: a camera plus
/// detection model, a recorded trace, or a scripted path.
pub trait PerceptionAdapter: Send {
    /// Acquire the camera and load the model
    fn start(&mut self) -> Result<(), PerceptionError>;

    /// Run one detection pass. `Ok(None)` means no head in this frame.
    fn next_position(&mut self) -> Result<Option<NormalizedPosition>, PerceptionError>;

    /// Delay between detection passes
    fn frame_interval(&self) -> Duration;
}
