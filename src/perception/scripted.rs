//! Scripted head tracker
//!
//! Stands in for a camera: sweeps the head along a Lissajous path with a
//! little seeded jitter, which is enough to exercise the dead zone.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{NormalizedPosition, PerceptionAdapter, PerceptionError};

pub struct ScriptedHead {
    rng: Pcg32,
    frame: u64,
    interval: Duration,
    jitter: f32,
    /// Frames with no detection every `dropout_every` frames (0 = never)
    dropout_every: u64,
}

impl ScriptedHead {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            frame: 0,
            interval: Duration::from_millis(33),
            jitter: 0.002,
            dropout_every: 0,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.max(0.0);
        self
    }

    pub fn with_dropouts(mut self, every: u64) -> Self {
        self.dropout_every = every;
        self
    }

    /// Noise-free head position at a given detection frame
    pub fn path_at(frame: u64) -> NormalizedPosition {
        let t = frame as f32 * 0.03;
        NormalizedPosition {
            x: 0.5 + 0.4 * t.sin(),
            y: 0.65 + 0.2 * (t * 0.5).cos(),
        }
    }
}

impl PerceptionAdapter for ScriptedHead {
    fn start(&mut self) -> Result<(), PerceptionError> {
        self.frame = 0;
        Ok(())
    }

    fn next_position(&mut self) -> Result<Option<NormalizedPosition>, PerceptionError> {
        self.frame += 1;
        if self.dropout_every > 0 && self.frame.is_multiple_of(self.dropout_every) {
            return Ok(None);
        }
        let base = Self::path_at(self.frame);
        let (jx, jy) = if self.jitter > 0.0 {
            (
                self.rng.random_range(-self.jitter..=self.jitter),
                self.rng.random_range(-self.jitter..=self.jitter),
            )
        } else {
            (0.0, 0.0)
        };
        Ok(NormalizedPosition::new(base.x + jx, base.y + jy))
    }

    fn frame_interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_stays_in_frame() {
        for frame in 0..10_000 {
            let p = ScriptedHead::path_at(frame);
            assert!((0.0..=1.0).contains(&p.x));
            assert!((0.0..=1.0).contains(&p.y));
        }
    }

    #[test]
    fn test_same_seed_same_trace() {
        let mut a = ScriptedHead::new(7);
        let mut b = ScriptedHead::new(7);
        a.start().unwrap();
        b.start().unwrap();
        for _ in 0..100 {
            assert_eq!(a.next_position().unwrap(), b.next_position().unwrap());
        }
    }

    #[test]
    fn test_dropouts() {
        let mut head = ScriptedHead::new(1).with_dropouts(3);
        head.start().unwrap();
        let results: Vec<_> = (0..6).map(|_| head.next_position().unwrap()).collect();
        assert!(results[2].is_none());
        assert!(results[5].is_none());
        assert!(results[0].is_some());
    }
}
