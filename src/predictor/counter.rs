//! Implementation of a saturating counter.

use crate::Outcome;
use crate::predictor::StatefulPredictor;

/// Configuration for building a [`SaturatingCounter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounterConfig {
    /// Initial (and reset) state, in `0..=3`.
    pub init_state: u8,
}
impl SaturatingCounterConfig {
    /// Get the number of storage bits per counter.
    pub fn storage_bits(&self) -> usize { 2 }

    pub fn build(self) -> SaturatingCounter {
        SaturatingCounter {
            cfg: self,
            state: self.init_state,
        }
    }
}

/// A 2-bit saturating counter used to follow the behavior of a branch.
///
/// The four states run from strongly-not-taken (0) through weakly-not-taken
/// (1) and weakly-taken (2) to strongly-taken (3); states at or above
/// [`SaturatingCounter::WEAKLY_TAKEN`] predict taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounter {
    cfg: SaturatingCounterConfig,
    state: u8,
}
impl SaturatingCounter {
    /// Weakest state that still predicts taken.
    pub const WEAKLY_TAKEN: u8 = 2;

    /// Strongest taken state.
    pub const MAX_STATE: u8 = 3;

    /// Return the raw counter state.
    pub fn state(&self) -> u8 { self.state }

    /// Move one state toward strongly-taken, saturating at the top.
    pub fn strengthen(&mut self) {
        self.state = (self.state + 1).min(Self::MAX_STATE);
    }

    /// Move one state toward strongly-not-taken, saturating at the bottom.
    pub fn weaken(&mut self) {
        self.state = self.state.saturating_sub(1);
    }
}

impl StatefulPredictor for SaturatingCounter {
    fn name(&self) -> &'static str { "SaturatingCounter" }
    fn reset(&mut self) {
        self.state = self.cfg.init_state;
    }
    fn predict(&self) -> Outcome {
        Outcome::from(self.state >= Self::WEAKLY_TAKEN)
    }
    fn update(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::T => self.strengthen(),
            Outcome::N => self.weaken(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturates_at_both_ends() {
        let mut c = SaturatingCounterConfig { init_state: 0 }.build();
        for _ in 0..10 {
            c.update(Outcome::T);
        }
        assert_eq!(c.state(), SaturatingCounter::MAX_STATE);
        for _ in 0..10 {
            c.update(Outcome::N);
        }
        assert_eq!(c.state(), 0);
    }

    #[test]
    fn predicts_taken_at_or_above_weakly_taken() {
        let mut c = SaturatingCounterConfig { init_state: 0 }.build();
        assert_eq!(c.predict(), Outcome::N);
        c.update(Outcome::T);
        assert_eq!(c.state(), 1);
        assert_eq!(c.predict(), Outcome::N);
        c.update(Outcome::T);
        assert_eq!(c.state(), 2);
        assert_eq!(c.predict(), Outcome::T);
    }

    #[test]
    fn counters_compare_by_configuration_and_state() {
        let cfg = SaturatingCounterConfig { init_state: 1 };
        assert_eq!(cfg, SaturatingCounterConfig { init_state: 1 });

        let a = cfg.build();
        let mut b = cfg.build();
        assert_eq!(a, b);
        b.update(Outcome::T);
        assert_ne!(a, b);
    }

    #[test]
    fn reset_restores_the_configured_state() {
        let mut c = SaturatingCounterConfig { init_state: 2 }.build();
        c.update(Outcome::N);
        c.update(Outcome::N);
        assert_eq!(c.state(), 0);
        c.reset();
        assert_eq!(c.state(), 2);
    }
}
