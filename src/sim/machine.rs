//! Game phase transitions
//!
//! Loading -> Ready -> Playing -> GameOver, and GameOver back to Ready (or
//! Loading when the tracker is down) on reset. Anything else is ignored.

use super::score::Score;
use super::state::{Avatar, GameEvent, GamePhase, GameState};
use super::timer::CountdownTimer;
use crate::perception::{NormalizedPosition, PerceptionStatus};

impl GameState {
    fn enter(&mut self, to: GamePhase) -> bool {
        let from = self.phase;
        if !from.can_transition_to(to) {
            log::debug!("Ignoring transition {:?} -> {:?}", from, to);
            return false;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
        true
    }

    /// Fold a tracker lifecycle update into the game
    pub fn apply_perception(&mut self, status: PerceptionStatus) {
        match status {
            PerceptionStatus::Initializing => {
                log::debug!("Perception initializing");
            }
            PerceptionStatus::Ready => {
                self.perception_ready = true;
                self.fault = None;
                if self.phase == GamePhase::Loading {
                    self.enter(GamePhase::Ready);
                }
            }
            PerceptionStatus::Error(err) => {
                log::warn!("Perception fault: {}", err);
                self.perception_ready = false;
                self.events.push(GameEvent::PerceptionFault {
                    message: err.to_string(),
                });
                self.fault = Some(err);
            }
        }
    }

    /// Ready -> Playing. Refused while the tracker is faulted.
    pub fn start_round(&mut self, head: NormalizedPosition) -> bool {
        if self.phase != GamePhase::Ready {
            log::debug!("Start ignored in {:?}", self.phase);
            return false;
        }
        if let Some(fault) = &self.fault {
            log::warn!("Start refused, perception fault: {}", fault);
            return false;
        }

        self.entities.clear();
        self.score = Score::default();
        self.final_score = None;
        self.avatar = Some(Avatar::new(head, &self.tuning));
        self.ramp.reset();
        self.ramp.start();
        self.spawner.start();
        self.countdown = Some(CountdownTimer::start(
            self.clock_us,
            self.tuning.round_duration_ms,
            self.tuning.timer_tick_ms,
        ));
        self.enter(GamePhase::Playing)
    }

    /// Playing -> GameOver. Stops every schedule and clears the field.
    pub fn end_round(&mut self) -> bool {
        if !self.enter(GamePhase::GameOver) {
            return false;
        }
        self.spawner.stop();
        self.ramp.stop();
        self.entities.clear();
        self.countdown = None;

        let final_score = self.score.value();
        self.final_score = Some(final_score);
        self.events.push(GameEvent::RoundOver { final_score });
        log::info!("Round over, final score {}", final_score);
        true
    }

    /// GameOver -> Ready/Loading with everything back to fresh
    pub fn reset(&mut self) -> bool {
        let next = if self.perception_ready {
            GamePhase::Ready
        } else {
            GamePhase::Loading
        };
        if !self.enter(next) {
            return false;
        }
        self.spawner.stop();
        self.ramp.reset();
        self.entities.clear();
        self.countdown = None;
        self.avatar = None;
        self.score = Score::default();
        self.final_score = None;
        true
    }
}
