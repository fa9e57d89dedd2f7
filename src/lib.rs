//! A model of a parameterized dynamic branch predictor: a tagged
//! direct-mapped branch target buffer (BTB) paired with per-entry or global
//! branch history registers and per-entry or global tables of 2-bit
//! saturating counters.
//!
//! See [`TwoLevelConfig`] for the tunable parameters, and
//! [`TwoLevelPredictor`] for the predict/update/finalize interface consumed
//! by a surrounding pipeline model.

pub mod history;
pub mod predictor;
pub mod stats;

pub use history::*;
pub use predictor::*;
pub use stats::*;

/// A branch outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome { N, T }
impl std::ops::Not for Outcome {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::N => Self::T,
            Self::T => Self::N,
        }
    }
}
impl From<bool> for Outcome {
    fn from(x: bool) -> Self {
        match x {
            true => Self::T,
            false => Self::N,
        }
    }
}
impl From<Outcome> for bool {
    fn from(x: Outcome) -> Self {
        match x {
            Outcome::T => true,
            Outcome::N => false,
        }
    }
}
