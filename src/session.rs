//! Frame driver
//!
//! Turns variable-length host frames into fixed simulation ticks, feeding
//! each tick the latest head position from the store. The tracker never
//! blocks a frame: whatever is in the store is what the tick sees.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::perception::{PerceptionStatus, PositionStore};
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

/// Fixed-step accumulator
#[derive(Debug, Clone)]
pub struct FrameStepper {
    accumulator: f32,
    max_substeps: u32,
}

impl Default for FrameStepper {
    fn default() -> Self {
        Self::new(MAX_SUBSTEPS)
    }
}

impl FrameStepper {
    pub fn new(max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            max_substeps,
        }
    }

    /// Feed a frame delta and run as many `SIM_DT` steps as fit.
    /// Returns the number of steps run.
    pub fn advance(&mut self, frame_dt: f32, mut step: impl FnMut(f32)) -> u32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < self.max_substeps {
            step(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop time we could not catch up on
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }
}

/// A running game wired to a head tracker
pub struct Session {
    state: GameState,
    store: Arc<PositionStore>,
    status_rx: Option<Receiver<PerceptionStatus>>,
    status_closed: bool,
    stepper: FrameStepper,
    input: TickInput,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning, store: Arc<PositionStore>) -> Self {
        Self {
            state: GameState::new(seed, tuning),
            store,
            status_rx: None,
            status_closed: false,
            stepper: FrameStepper::default(),
            input: TickInput::default(),
        }
    }

    /// A session with a fresh store using the tuned dead zone
    pub fn with_tuned_store(seed: u64, tuning: Tuning) -> Self {
        let store = Arc::new(PositionStore::with_dead_zone(tuning.dead_zone));
        Self::new(seed, tuning, store)
    }

    /// Receive tracker lifecycle updates from a perception worker
    pub fn with_status_channel(mut self, rx: Receiver<PerceptionStatus>) -> Self {
        self.status_rx = Some(rx);
        self
    }

    pub fn store(&self) -> &Arc<PositionStore> {
        &self.store
    }

    /// Push a tracker lifecycle update directly
    pub fn report_perception(&mut self, status: PerceptionStatus) {
        self.state.apply_perception(status);
    }

    /// Ask for a round to start on the next tick
    pub fn request_start(&mut self) {
        self.input.start = true;
    }

    /// Ask for a full reset on the next tick
    pub fn request_reset(&mut self) {
        self.input.reset = true;
    }

    /// Run one host frame. Returns the number of simulation ticks run.
    pub fn frame(&mut self, frame_dt: f32) -> u32 {
        self.drain_status();

        let Self {
            state,
            store,
            stepper,
            input,
            ..
        } = self;
        stepper.advance(frame_dt, |dt| {
            input.head = Some(store.get());
            tick(state, input, dt);
            // One-shot requests are consumed by the first tick
            input.start = false;
            input.reset = false;
        })
    }

    fn drain_status(&mut self) {
        let Some(rx) = &self.status_rx else {
            return;
        };
        loop {
            match rx.try_recv() {
                Ok(status) => self.state.apply_perception(status),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("Perception channel closed");
                    self.status_rx = None;
                    self.status_closed = true;
                    break;
                }
            }
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score.value()
    }

    pub fn final_score(&self) -> Option<u32> {
        self.state.final_score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.state.remaining_secs()
    }

    /// Message for the error banner, if the tracker is down
    pub fn fault(&self) -> Option<String> {
        self.state.fault.as_ref().map(|e| e.to_string())
    }

    /// Why no round can start, if nothing short of a restart will fix it.
    ///
    /// Set while waiting for a round when the tracker has faulted, or when its
    /// status channel closed before it ever reported ready.
    pub fn start_blocker(&self) -> Option<String> {
        if !matches!(self.phase(), GamePhase::Loading | GamePhase::Ready) {
            return None;
        }
        if let Some(fault) = self.fault() {
            return Some(fault);
        }
        if self.status_closed && !self.state.perception_ready {
            return Some("head tracker stopped before it was ready".to_string());
        }
        None
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::{NormalizedPosition, PerceptionError};
    use std::sync::mpsc;

    fn session() -> Session {
        Session::new(7, Tuning::default(), Arc::new(PositionStore::new()))
    }

    #[test]
    fn test_stepper_accumulates() {
        let mut stepper = FrameStepper::default();
        let mut steps = 0;
        assert_eq!(stepper.advance(SIM_DT * 0.5, |_| steps += 1), 0);
        assert_eq!(stepper.advance(SIM_DT * 0.6, |_| steps += 1), 1);
        assert_eq!(steps, 1);
    }

    #[test]
    fn test_stepper_caps_long_frames() {
        let mut stepper = FrameStepper::new(3);
        let ran = stepper.advance(5.0, |_| {});
        assert_eq!(ran, 3);
        // Backlog was dropped, not replayed
        assert!(stepper.advance(0.0, |_| {}) <= 1);
    }

    #[test]
    fn test_stepper_ignores_bad_deltas() {
        let mut stepper = FrameStepper::default();
        assert_eq!(stepper.advance(f32::NAN, |_| {}), 0);
        assert_eq!(stepper.advance(-1.0, |_| {}), 0);
    }

    #[test]
    fn test_status_channel_drives_ready() {
        let (tx, rx) = mpsc::channel();
        let mut session = session().with_status_channel(rx);
        tx.send(PerceptionStatus::Initializing).unwrap();
        session.frame(SIM_DT);
        assert_eq!(session.phase(), GamePhase::Loading);

        tx.send(PerceptionStatus::Ready).unwrap();
        session.frame(SIM_DT);
        assert_eq!(session.phase(), GamePhase::Ready);
    }

    #[test]
    fn test_error_surfaces_fault_and_blocks_start() {
        let mut session = session();
        session.report_perception(PerceptionStatus::Error(PerceptionError::CameraUnavailable(
            "denied".into(),
        )));
        session.request_start();
        session.frame(SIM_DT * 2.0);
        assert_eq!(session.phase(), GamePhase::Loading);
        assert_eq!(
            session.fault().as_deref(),
            Some("camera unavailable: denied")
        );
    }

    #[test]
    fn test_closed_channel_blocks_start() {
        let (tx, rx) = mpsc::channel();
        let mut session = session().with_status_channel(rx);
        tx.send(PerceptionStatus::Initializing).unwrap();
        session.frame(SIM_DT);
        assert_eq!(session.start_blocker(), None);

        drop(tx);
        session.frame(SIM_DT);
        assert_eq!(session.phase(), GamePhase::Loading);
        assert!(session.start_blocker().is_some());
    }

    #[test]
    fn test_closed_channel_after_ready_is_not_a_blocker() {
        let (tx, rx) = mpsc::channel();
        let mut session = session().with_status_channel(rx);
        tx.send(PerceptionStatus::Ready).unwrap();
        drop(tx);
        session.frame(SIM_DT);
        assert_eq!(session.phase(), GamePhase::Ready);
        assert_eq!(session.start_blocker(), None);
    }

    #[test]
    fn test_fault_in_ready_blocks_start() {
        let mut session = session();
        session.report_perception(PerceptionStatus::Ready);
        session.frame(SIM_DT);
        assert_eq!(session.phase(), GamePhase::Ready);

        session.report_perception(PerceptionStatus::Error(PerceptionError::Inference(
            "lost".into(),
        )));
        session.request_start();
        session.frame(SIM_DT);
        assert_eq!(session.phase(), GamePhase::Ready);
        assert!(session.start_blocker().is_some());

        // Not a blocker once a round is under way
        session.report_perception(PerceptionStatus::Ready);
        session.request_start();
        session.frame(SIM_DT);
        assert_eq!(session.phase(), GamePhase::Playing);
        session.report_perception(PerceptionStatus::Error(PerceptionError::Inference(
            "lost".into(),
        )));
        assert_eq!(session.start_blocker(), None);
    }

    #[test]
    fn test_tuned_dead_zone_reaches_store() {
        let tuning = Tuning::from_json(r#"{ "dead_zone": 0.05 }"#).unwrap();
        let session = Session::with_tuned_store(7, tuning);
        assert_eq!(session.store().dead_zone(), 0.05);

        assert!(session.store().set(0.6, 0.5));
        assert!(!session.store().set(0.64, 0.5), "inside the tuned dead zone");
        assert!(session.store().set(0.7, 0.5));
    }

    #[test]
    fn test_avatar_reads_store() {
        let mut session = session();
        session.report_perception(PerceptionStatus::Ready);
        session.request_start();
        session.frame(SIM_DT * 1.5);
        assert_eq!(session.phase(), GamePhase::Playing);

        session.store().set(0.0, 0.0);
        session.frame(SIM_DT);
        let avatar = session.state().avatar.as_ref().unwrap();
        // Mirrored: tracker x = 0 is the right edge
        assert_eq!((avatar.pos.x, avatar.pos.y), (800.0, 0.0));
    }

    #[test]
    fn test_start_request_survives_short_frame() {
        let mut session = session();
        session.report_perception(PerceptionStatus::Ready);
        session.request_start();
        assert_eq!(session.frame(SIM_DT * 0.25), 0);
        assert_eq!(session.phase(), GamePhase::Ready);
        session.frame(SIM_DT);
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_full_round_with_reset() {
        let tuning = Tuning {
            round_duration_ms: 2_000,
            ..Tuning::default()
        };
        let store = Arc::new(PositionStore::new());
        let mut session = Session::new(99, tuning, Arc::clone(&store));
        session.report_perception(PerceptionStatus::Ready);
        session.request_start();

        let mut frames = 0;
        while session.phase() != GamePhase::GameOver {
            let head = NormalizedPosition::new((frames as f32 * 0.05).sin() * 0.5 + 0.5, 0.1)
                .unwrap();
            store.set(head.x, head.y);
            session.frame(SIM_DT);
            frames += 1;
            assert!(frames < 1_000, "round never ended");
        }
        assert_eq!(session.final_score(), Some(session.score()));

        session.request_reset();
        session.frame(SIM_DT);
        assert_eq!(session.phase(), GamePhase::Ready);
        assert_eq!(session.final_score(), None);
        assert_eq!(session.remaining_secs(), 0);
    }
}
