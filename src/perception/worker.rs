//! Perception producer thread
//!
//! Drives a [`PerceptionAdapter`] at its own cadence, publishing head
//! positions into the shared store and lifecycle changes over a channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::{PerceptionAdapter, PerceptionStatus, PositionStore};

/// Handle to a running perception thread
///
/// Dropping the handle stops the thread and waits for it, so no sample is
/// published after the owner is gone.
pub struct PerceptionWorker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PerceptionWorker {
    /// Start `adapter` on a new thread. Returns the worker handle and the
    /// receiving end of the lifecycle channel.
    pub fn spawn<A>(adapter: A, store: Arc<PositionStore>) -> (Self, Receiver<PerceptionStatus>)
    where
        A: PerceptionAdapter + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("perception".into())
            .spawn(move || run(adapter, store, tx, thread_stop))
            .map_err(|e| log::error!("Failed to spawn perception thread: {}", e))
            .ok();

        (Self { stop, handle }, rx)
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the thread to exit and wait for it
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                log::error!("Perception thread panicked");
            }
        }
    }
}

impl Drop for PerceptionWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<A: PerceptionAdapter>(
    mut adapter: A,
    store: Arc<PositionStore>,
    status: Sender<PerceptionStatus>,
    stop: Arc<AtomicBool>,
) {
    let _ = status.send(PerceptionStatus::Initializing);

    if let Err(e) = adapter.start() {
        log::warn!("Perception failed to start: {}", e);
        let _ = status.send(PerceptionStatus::Error(e));
        return;
    }
    log::info!("Perception ready");
    let _ = status.send(PerceptionStatus::Ready);

    let interval = adapter.frame_interval();
    while !stop.load(Ordering::Acquire) {
        match adapter.next_position() {
            Ok(Some(pos)) => {
                store.set(pos.x, pos.y);
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("Perception stopped: {}", e);
                let _ = status.send(PerceptionStatus::Error(e));
                return;
            }
        }
        // Woken early by `stop()`
        thread::park_timeout(interval);
    }
    log::debug!("Perception thread exiting");
}
