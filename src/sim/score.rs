//! Round score

use serde::{Deserialize, Serialize};

/// Non-negative score. Deltas clamp at zero when applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score(u32);

impl Score {
    pub fn value(&self) -> u32 {
        self.0
    }

    /// `score = max(0, score + delta)`
    pub fn apply(&mut self, delta: i32) -> u32 {
        self.0 = self.0.saturating_add_signed(delta);
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamps_at_zero() {
        let mut score = Score::default();
        assert_eq!(score.apply(10), 10);
        assert_eq!(score.apply(-5), 5);
        assert_eq!(score.apply(-5), 0);
        assert_eq!(score.apply(-5), 0);
        assert_eq!(score.apply(10), 10);
    }

    proptest! {
        #[test]
        fn prop_matches_clamped_sum(
            deltas in proptest::collection::vec(prop_oneof![Just(10i32), Just(-5i32)], 0..200),
        ) {
            let mut score = Score::default();
            let mut reference: i64 = 0;
            for d in deltas {
                reference = (reference + d as i64).max(0);
                prop_assert_eq!(score.apply(d) as i64, reference);
            }
        }
    }
}
