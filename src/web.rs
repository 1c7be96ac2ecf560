//! Browser bindings
//!
//! The page owns the camera and face detector; it pushes head coordinates
//! and tracker status into a [`WebGame`] and calls `frame` from
//! `requestAnimationFrame`. Rendering reads `snapshot_json`.

use wasm_bindgen::prelude::*;

use crate::perception::{PerceptionError, PerceptionStatus};
use crate::session::Session;
use crate::sim::GamePhase;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Head Catch (wasm) loaded");
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game, optionally from a tuning JSON string
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> Result<WebGame, JsValue> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(js_error)?,
            None => Tuning::default(),
        };
        let seed =
            (js_sys::Date::now() as u64) ^ ((js_sys::Math::random() * u32::MAX as f64) as u64);
        log::info!("New game, seed {}", seed);

        Ok(WebGame {
            session: Session::with_tuned_store(seed, tuning),
        })
    }

    /// Detector callback: latest head position in [0, 1] frame coordinates
    pub fn set_head_position(&self, x: f32, y: f32) -> bool {
        self.session.store().set(x, y)
    }

    pub fn perception_ready(&mut self) {
        self.session.report_perception(PerceptionStatus::Ready);
    }

    pub fn perception_failed(&mut self, message: String) {
        self.session
            .report_perception(PerceptionStatus::Error(PerceptionError::ModelLoad(message)));
    }

    pub fn camera_denied(&mut self, message: String) {
        self.session
            .report_perception(PerceptionStatus::Error(PerceptionError::CameraUnavailable(
                message,
            )));
    }

    /// Play button
    pub fn start(&mut self) {
        self.session.request_start();
    }

    /// Play again button
    pub fn reset(&mut self) {
        self.session.request_reset();
    }

    /// Advance by a frame delta in seconds; returns ticks run
    pub fn frame(&mut self, dt: f32) -> u32 {
        self.session.frame(dt)
    }

    pub fn phase(&self) -> String {
        match self.session.phase() {
            GamePhase::Loading => "loading",
            GamePhase::Ready => "ready",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "game_over",
        }
        .to_string()
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn final_score(&self) -> Option<u32> {
        self.session.final_score()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.session.remaining_secs()
    }

    pub fn fault(&self) -> Option<String> {
        self.session.fault()
    }

    /// Avatar, entities and HUD values as JSON
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot()).map_err(js_error)
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.drain_events()).map_err(js_error)
    }
}
