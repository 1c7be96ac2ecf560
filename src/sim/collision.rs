//! Avatar/entity overlap and scoring
//!
//! Every consumed entity goes through its claim latch first, so an entity
//! can change the score at most once no matter how many ticks it overlaps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::score::Score;
use super::state::{Category, FallingEntity};
use crate::tuning::Tuning;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap; boxes that only share an edge do not touch
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// An entity the avatar touched this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Catch {
    pub id: u32,
    pub category: Category,
    pub delta: i32,
    /// Score after applying `delta`
    pub score: u32,
}

/// Claim and score every unclaimed entity overlapping `avatar`, then remove
/// the claimed ones.
pub fn resolve_catches(
    avatar: &Aabb,
    entities: &mut Vec<FallingEntity>,
    score: &mut Score,
    tuning: &Tuning,
) -> Vec<Catch> {
    let mut catches = Vec::new();

    for entity in entities.iter_mut() {
        if entity.is_claimed() || !avatar.overlaps(&entity.aabb()) {
            continue;
        }
        if entity.claim() {
            let delta = entity.category.points(tuning);
            let score = score.apply(delta);
            catches.push(Catch {
                id: entity.id,
                category: entity.category,
                delta,
                score,
            });
        }
    }

    entities.retain(|e| !e.is_claimed());
    catches
}

/// Drop entities that fell past the bottom edge. No score effect.
pub fn sweep_fallen(
    entities: &mut Vec<FallingEntity>,
    viewport_height: f32,
) -> Vec<(u32, Category)> {
    let mut missed = Vec::new();
    entities.retain_mut(|e| {
        if e.is_below(viewport_height) && e.claim() {
            missed.push((e.id, e.category));
            false
        } else {
            !e.is_claimed()
        }
    });
    missed
}
