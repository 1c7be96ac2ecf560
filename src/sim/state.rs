//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::difficulty::DifficultyRamp;
use super::score::Score;
use super::spawn::SpawnScheduler;
use super::timer::CountdownTimer;
use crate::perception::{NormalizedPosition, PerceptionError};
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the head tracker to come up
    Loading,
    /// Tracker is up, waiting for the player to start
    Ready,
    /// Round in progress
    Playing,
    /// Round over, final score on screen
    GameOver,
}

impl GamePhase {
    /// Whether `self -> next` is a legal transition
    pub fn can_transition_to(self, next: GamePhase) -> bool {
        use GamePhase::*;
        matches!(
            (self, next),
            (Loading, Ready)
                | (Ready, Playing)
                | (Playing, GameOver)
                | (GameOver, Ready)
                | (GameOver, Loading)
        )
    }
}

/// Falling object categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Catch these for points
    Beneficial,
    /// Touching these costs points
    Harmful,
}

impl Category {
    /// Score delta for touching an entity of this category
    pub fn points(self, tuning: &Tuning) -> i32 {
        match self {
            Category::Beneficial => tuning.beneficial_points,
            Category::Harmful => tuning.harmful_points,
        }
    }
}

/// A falling entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingEntity {
    pub id: u32,
    pub category: Category,
    /// Center position in world units
    pub pos: Vec2,
    /// Downward speed (units/s), fixed at spawn
    pub vel_y: f32,
    /// Box edge length
    pub size: f32,
    claimed: bool,
}

impl FallingEntity {
    pub fn new(id: u32, category: Category, pos: Vec2, vel_y: f32, size: f32) -> Self {
        Self {
            id,
            category,
            pos,
            vel_y,
            size,
            claimed: false,
        }
    }

    /// Latch the entity as consumed. Returns true only the first time.
    pub fn claim(&mut self) -> bool {
        if self.claimed {
            return false;
        }
        self.claimed = true;
        true
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.size))
    }

    /// Move along the fall velocity
    pub fn integrate(&mut self, dt: f32) {
        self.pos.y += self.vel_y * dt;
    }

    /// Fully past the bottom edge of the viewport
    pub fn is_below(&self, viewport_height: f32) -> bool {
        self.pos.y - self.size / 2.0 > viewport_height
    }
}

/// The player's head-driven avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    /// Center position in world units
    pub pos: Vec2,
    pub size: f32,
}

impl Avatar {
    pub fn new(head: NormalizedPosition, tuning: &Tuning) -> Self {
        let mut avatar = Self {
            pos: Vec2::ZERO,
            size: tuning.avatar_size,
        };
        avatar.follow(head, tuning);
        avatar
    }

    /// Snap to the head position mapped into the viewport
    pub fn follow(&mut self, head: NormalizedPosition, tuning: &Tuning) {
        let x = if tuning.mirror_x { 1.0 - head.x } else { head.x };
        self.pos = Vec2::new(x * tuning.viewport_width, head.y * tuning.viewport_height);
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.size))
    }
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    Spawned { id: u32, category: Category, x: f32, vel_y: f32 },
    Caught { id: u32, category: Category, delta: i32, score: u32 },
    Missed { id: u32, category: Category },
    DifficultyRaised { multiplier: f32 },
    TimerTick { remaining_secs: u32 },
    RoundOver { final_score: u32 },
    PerceptionFault { message: String },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated time since creation (microseconds)
    pub clock_us: u64,
    /// Whether the head tracker last reported ready
    pub perception_ready: bool,
    /// Last tracker failure, shown to the player until it recovers
    pub fault: Option<PerceptionError>,
    pub score: Score,
    /// Score frozen at the end of the round
    pub final_score: Option<u32>,
    /// Present from round start until reset
    pub avatar: Option<Avatar>,
    /// Active falling entities (in spawn order)
    pub entities: Vec<FallingEntity>,
    pub spawner: SpawnScheduler,
    pub ramp: DifficultyRamp,
    /// Present only while a round is running
    pub countdown: Option<CountdownTimer>,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            spawner: SpawnScheduler::new(&tuning),
            ramp: DifficultyRamp::new(&tuning),
            tuning,
            phase: GamePhase::Loading,
            time_ticks: 0,
            clock_us: 0,
            perception_ready: false,
            fault: None,
            score: Score::default(),
            final_score: None,
            avatar: None,
            entities: Vec::new(),
            countdown: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a falling entity at `x` on the top edge
    pub fn spawn_entity(&mut self, category: Category, x: f32, vel_y: f32) -> u32 {
        let id = self.next_entity_id();
        let size = self.tuning.entity_size;
        self.entities
            .push(FallingEntity::new(id, category, Vec2::new(x, 0.0), vel_y, size));
        self.events.push(GameEvent::Spawned {
            id,
            category,
            x,
            vel_y,
        });
        id
    }

    /// Whole seconds left in the round (0 outside a round)
    pub fn remaining_secs(&self) -> u32 {
        self.countdown
            .as_ref()
            .map(|c| c.remaining_secs(self.clock_us))
            .unwrap_or(0)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Render-facing view of the current state
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            score: self.score.value(),
            final_score: self.final_score,
            remaining_secs: self.remaining_secs(),
            multiplier: self.ramp.multiplier(),
            fault: self.fault.as_ref().map(|e| e.to_string()),
            avatar: self.avatar.as_ref(),
            entities: &self.entities,
        }
    }
}

/// Serializable view of a frame for the renderer
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub score: u32,
    pub final_score: Option<u32>,
    pub remaining_secs: u32,
    pub multiplier: f32,
    pub fault: Option<String>,
    pub avatar: Option<&'a Avatar>,
    pub entities: &'a [FallingEntity],
}
