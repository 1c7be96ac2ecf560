//! Head Catch entry point
//!
//! Native builds run a headless round in real time with a scripted head
//! tracker standing in for the camera. The browser build is driven from JS
//! through the `web` module instead.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use head_catch::consts::SIM_DT;
    use head_catch::perception::{PerceptionWorker, ScriptedHead};
    use head_catch::sim::{GameEvent, GamePhase};
    use head_catch::{Session, Tuning};

    pub fn run() -> i32 {
        let tuning = match Tuning::from_env() {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                return 2;
            }
        };

        let seed = std::env::var("HEAD_CATCH_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random::<u64>);
        log::info!(
            "Head Catch (native) starting, seed {}, round {} s",
            seed,
            tuning.round_duration_ms / 1000
        );

        let session = Session::with_tuned_store(seed, tuning);
        let (mut worker, status_rx) =
            PerceptionWorker::spawn(ScriptedHead::new(seed), Arc::clone(session.store()));
        let mut session = session.with_status_channel(status_rx);

        let frame = Duration::from_secs_f32(SIM_DT);
        let mut last = Instant::now();
        let mut start_requested = false;

        loop {
            thread::sleep(frame);
            let now = Instant::now();
            session.frame((now - last).as_secs_f32());
            last = now;

            for event in session.drain_events() {
                log_event(&event);
            }

            if let Some(reason) = session.start_blocker() {
                log::error!("Head tracking unavailable: {}", reason);
                worker.stop();
                return 1;
            }

            match session.phase() {
                GamePhase::Ready if !start_requested => {
                    session.request_start();
                    start_requested = true;
                }
                GamePhase::GameOver => break,
                _ => {}
            }
        }

        worker.stop();
        println!("Game Over\nScore: {}", session.final_score().unwrap_or(0));
        0
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::Caught {
                category,
                delta,
                score,
                ..
            } => log::info!("Caught {:?} ({:+}) -> score {}", category, delta, score),
            GameEvent::TimerTick { remaining_secs } if remaining_secs % 10 == 0 => {
                log::info!("Time: {}", remaining_secs)
            }
            GameEvent::DifficultyRaised { multiplier } => {
                log::info!("Speed x{:.2}", multiplier)
            }
            GameEvent::PerceptionFault { message } => log::warn!("Tracker fault: {}", message),
            other => log::trace!("{:?}", other),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    std::process::exit(native::run());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is in the library's `web` module
}
