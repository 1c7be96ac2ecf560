//! Single-slot head position store
//!
//! Both axes are packed into one `AtomicU64` so the reader always sees a
//! coordinate pair that was written together.

use std::sync::atomic::{AtomicU64, Ordering};

use super::NormalizedPosition;
use crate::consts::POSITION_DEAD_ZONE;

#[inline]
fn pack(pos: NormalizedPosition) -> u64 {
    ((pos.x.to_bits() as u64) << 32) | pos.y.to_bits() as u64
}

#[inline]
fn unpack(bits: u64) -> NormalizedPosition {
    NormalizedPosition {
        x: f32::from_bits((bits >> 32) as u32),
        y: f32::from_bits(bits as u32),
    }
}

/// Latest accepted head position, last write wins
///
/// One producer calls [`set`](Self::set), one consumer calls
/// [`get`](Self::get). Updates within the dead zone of the stored value are
/// dropped.
#[derive(Debug)]
pub struct PositionStore {
    slot: AtomicU64,
    dead_zone: f32,
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionStore {
    pub fn new() -> Self {
        Self::with_dead_zone(POSITION_DEAD_ZONE)
    }

    pub fn with_dead_zone(dead_zone: f32) -> Self {
        Self {
            slot: AtomicU64::new(pack(NormalizedPosition::CENTER)),
            dead_zone: dead_zone.max(0.0),
        }
    }

    /// Offer a new sample. Returns true if it replaced the stored value.
    pub fn set(&self, x: f32, y: f32) -> bool {
        let Some(next) = NormalizedPosition::new(x, y) else {
            return false;
        };
        let current = self.get();
        if next.distance(&current) <= self.dead_zone {
            return false;
        }
        self.slot.store(pack(next), Ordering::Release);
        true
    }

    pub fn get(&self) -> NormalizedPosition {
        unpack(self.slot.load(Ordering::Acquire))
    }

    /// Put the slot back to the centered default
    pub fn reset(&self) {
        self.slot
            .store(pack(NormalizedPosition::CENTER), Ordering::Release);
    }

    pub fn dead_zone(&self) -> f32 {
        self.dead_zone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_defaults_to_center() {
        let store = PositionStore::new();
        assert_eq!(store.get(), NormalizedPosition::CENTER);
    }

    #[test]
    fn test_accepts_large_move() {
        let store = PositionStore::new();
        assert!(store.set(0.2, 0.8));
        assert_eq!(store.get(), NormalizedPosition { x: 0.2, y: 0.8 });
    }

    #[test]
    fn test_drops_jitter() {
        let store = PositionStore::new();
        assert!(store.set(0.3, 0.3));
        assert!(!store.set(0.3005, 0.3005));
        assert_eq!(store.get(), NormalizedPosition { x: 0.3, y: 0.3 });
    }

    #[test]
    fn test_jitter_around_stored_value_is_ignored() {
        let store = PositionStore::new();
        for i in 0..50 {
            let wobble = if i % 2 == 0 { 0.0004 } else { -0.0004 };
            assert!(!store.set(0.5 + wobble, 0.5 - wobble));
        }
        assert_eq!(store.get(), NormalizedPosition::CENTER);
    }

    #[test]
    fn test_slow_drift_lands_in_steps() {
        // Each sample is compared against the last accepted one, so a slow
        // drift is applied once it clears the dead zone.
        let store = PositionStore::new();
        assert!(!store.set(0.5004, 0.5));
        assert!(!store.set(0.5008, 0.5));
        assert!(store.set(0.5012, 0.5));
        assert_eq!(store.get().x, 0.5012);
    }

    #[test]
    fn test_clamps_misbehaving_source() {
        let store = PositionStore::new();
        assert!(store.set(2.0, -1.0));
        assert_eq!(store.get(), NormalizedPosition { x: 1.0, y: 0.0 });
    }

    #[test]
    fn test_rejects_nan() {
        let store = PositionStore::new();
        assert!(!store.set(f32::NAN, 0.1));
        assert_eq!(store.get(), NormalizedPosition::CENTER);
    }

    #[test]
    fn test_reset() {
        let store = PositionStore::new();
        store.set(0.1, 0.1);
        store.reset();
        assert_eq!(store.get(), NormalizedPosition::CENTER);
    }

    #[test]
    fn test_reader_never_sees_torn_pair() {
        // Writer only ever stores pairs with x == y
        let store = Arc::new(PositionStore::with_dead_zone(0.0));
        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..20_000u32 {
                    let v = (i % 1000) as f32 / 1000.0;
                    store.set(v, v);
                }
            })
        };
        for _ in 0..20_000 {
            let p = store.get();
            assert_eq!(p.x, p.y);
        }
        writer.join().unwrap();
    }

    proptest! {
        #[test]
        fn prop_get_reflects_last_accepted(
            samples in proptest::collection::vec((-0.5f32..1.5, -0.5f32..1.5), 1..64)
        ) {
            let store = PositionStore::new();
            let mut expected = NormalizedPosition::CENTER;
            for (x, y) in samples {
                let before = store.get();
                let accepted = store.set(x, y);
                let offered = NormalizedPosition::new(x, y).unwrap();
                if accepted {
                    prop_assert!(offered.distance(&before) > store.dead_zone());
                    expected = offered;
                } else {
                    prop_assert_eq!(store.get(), before);
                }
                prop_assert_eq!(store.get(), expected);
                let p = store.get();
                prop_assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y));
            }
        }
    }
}
