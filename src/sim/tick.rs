//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::{resolve_catches, sweep_fallen};
use super::state::{GameEvent, GamePhase, GameState};
use crate::perception::NormalizedPosition;
use crate::secs_to_micros;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest head position from the position store
    pub head: Option<NormalizedPosition>,
    /// Start a round (play button)
    pub start: bool,
    /// Back to the start screen (play again button)
    pub reset: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.reset {
        state.reset();
    }
    if input.start {
        state.start_round(input.head.unwrap_or_default());
    }

    let dt_us = secs_to_micros(dt);
    state.time_ticks += 1;
    state.clock_us += dt_us;

    if state.phase == GamePhase::Playing {
        step_round(state, input, dt, dt_us);
    }
}

fn step_round(state: &mut GameState, input: &TickInput, dt: f32, dt_us: u64) {
    // Avatar tracks the head
    if let (Some(avatar), Some(head)) = (state.avatar.as_mut(), input.head) {
        avatar.follow(head, &state.tuning);
    }

    // Ramp before spawning so a wave due on the same tick sees the new value
    if let Some(multiplier) = state.ramp.advance(dt_us) {
        log::debug!("Difficulty multiplier now {:.2}", multiplier);
        state.events.push(GameEvent::DifficultyRaised { multiplier });
    }

    let waves = state.spawner.advance(dt_us);
    for _ in 0..waves {
        let plans = state
            .spawner
            .plan_wave(&mut state.rng, &state.tuning, state.ramp.multiplier());
        for plan in plans {
            state.spawn_entity(plan.category, plan.x, plan.vel_y);
        }
    }

    for entity in &mut state.entities {
        entity.integrate(dt);
    }

    if let Some(avatar) = &state.avatar {
        let avatar_box = avatar.aabb();
        let catches = resolve_catches(
            &avatar_box,
            &mut state.entities,
            &mut state.score,
            &state.tuning,
        );
        for catch in catches {
            state.events.push(GameEvent::Caught {
                id: catch.id,
                category: catch.category,
                delta: catch.delta,
                score: catch.score,
            });
        }
    }

    for (id, category) in sweep_fallen(&mut state.entities, state.tuning.viewport_height) {
        state.events.push(GameEvent::Missed { id, category });
    }

    let now = state.clock_us;
    let expired = match state.countdown.as_mut() {
        Some(countdown) => {
            let tick = countdown.advance(now, dt_us);
            if let Some(remaining_secs) = tick.display_secs {
                state.events.push(GameEvent::TimerTick { remaining_secs });
            }
            tick.expired
        }
        None => false,
    };
    if expired {
        state.end_round();
    }
}
