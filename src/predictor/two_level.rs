//! A two-level adaptive branch predictor built around a direct-mapped BTB.
//!
//! Each fetched branch PC selects a BTB entry by its low (word-aligned)
//! bits and is qualified by a partial tag taken from the bits above the
//! index. A matching entry consults a history register and a table of 2-bit
//! saturating counters, either of which may be private to the entry or
//! shared across the whole buffer; an optional XOR of PC bits into the
//! pattern index models gshare/gselect-style designs.

pub mod config;
pub use config::*;

use tracing::trace;

use crate::Outcome;
use crate::history::*;
use crate::stats::*;
use crate::predictor::*;

/// Container for output from [`TwoLevelPredictor::predict`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prediction {
    /// The predicted direction.
    pub outcome: Outcome,

    /// The predicted next fetch address.
    pub tgt: u32,
}
impl Prediction {
    /// Returns `true` when the branch is predicted taken.
    pub fn taken(&self) -> bool { self.outcome.into() }

    pub fn target(&self) -> u32 { self.tgt }
}

/// A parameterized BTB + two-level adaptive branch predictor.
///
/// Created with [`TwoLevelConfig::build`]. The surrounding pipeline drives
/// one branch at a time: [`predict`] before fetch continues, [`update`] once
/// the branch resolves, and finally [`finalize`] to collect statistics.
/// `finalize` consumes the predictor, so use-after-shutdown is a compile
/// error rather than a runtime contract.
///
/// [`predict`]: TwoLevelPredictor::predict
/// [`update`]: TwoLevelPredictor::update
/// [`finalize`]: TwoLevelPredictor::finalize
pub struct TwoLevelPredictor {
    /// The configuration used to create this object.
    pub cfg: TwoLevelConfig,

    /// Direct-mapped target buffer.
    btb: BranchTargetBuffer,

    /// History register storage.
    hist: HistoryStorage,

    /// Pattern table storage.
    pht: PatternStorage,

    /// Running statistics.
    stats: PredictorStats,
}
impl TwoLevelPredictor {
    /// The fall-through address for a non-taken branch.
    fn fall_through(pc: u32) -> u32 {
        pc.wrapping_add(4)
    }

    /// Form the pattern table index for the entry at `idx`: the current
    /// history, with PC bits XOR'ed in per the configured [`ShareMode`].
    fn pattern_index(&self, pc: u32, idx: usize) -> usize {
        let mask = (1usize << self.cfg.history_bits) - 1;
        let history = self.hist.register(idx).value();
        let pattern = match self.cfg.share_mode {
            ShareMode::None => history,
            ShareMode::Lsb => history ^ ((pc >> 2) as usize & mask),
            ShareMode::Mid => history ^ ((pc >> 16) as usize & mask),
        };
        pattern & mask
    }

    /// Predict the direction and target of the branch at `pc`.
    ///
    /// A PC whose tag does not match its BTB slot predicts not-taken with
    /// the fall-through target, without consulting history or counters.
    /// This is a pure read: repeated calls without an intervening
    /// [`TwoLevelPredictor::update`] return identical results.
    pub fn predict(&self, pc: u32) -> Prediction {
        let idx = self.btb.get_index(pc);
        let entry = self.btb.get_entry(pc);
        if entry.tag != self.btb.get_tag(pc) as u32 {
            return Prediction {
                outcome: Outcome::N,
                tgt: Self::fall_through(pc),
            };
        }

        let pattern = self.pattern_index(pc, idx);
        let outcome = self.pht.table(idx).get_entry(pattern).predict();
        let tgt = match outcome {
            Outcome::T => entry.target(),
            Outcome::N => Self::fall_through(pc),
        };
        Prediction { outcome, tgt }
    }

    /// Train the predictor with the resolved outcome of the branch at `pc`.
    ///
    /// `tgt` is the resolved target and `pred_tgt` must be the target
    /// previously returned by [`TwoLevelPredictor::predict`] for this same
    /// dynamic instance.
    pub fn update(&mut self, pc: u32, tgt: u32, outcome: Outcome, pred_tgt: u32) {
        let idx = self.btb.get_index(pc);
        let tag = self.btb.get_tag(pc) as u32;
        let taken: bool = outcome.into();

        let tag_mismatch = self.btb.get_entry(pc).tag != tag;
        let resolved = if taken { tgt } else { Self::fall_through(pc) };
        let mispredicted = pred_tgt != resolved;

        // A mismatching tag means this slot is being reclaimed by a new
        // branch: everything learned under the old tag is discarded before
        // the counter below is trained.
        if tag_mismatch {
            trace!(pc, idx, "btb slot reclaimed");
            let entry = self.btb.get_entry_mut(pc);
            entry.tag = tag;
            entry.tgt = tgt;
            self.hist.clear_entry(idx);
            self.pht.reset_entry(idx);
        }

        if mispredicted {
            trace!(pc, pred_tgt, resolved, "misprediction");
            self.btb.get_entry_mut(pc).tgt = tgt;
        }

        // The pattern index reflects the possibly-cleared history.
        let pattern = self.pattern_index(pc, idx);
        self.pht.table_mut(idx).get_entry_mut(pattern).update(outcome);

        // History shifts only after the counter it indexed was trained; the
        // new pattern belongs to the *next* prediction's context.
        self.hist.register_mut(idx).record(outcome);

        self.stats.record(mispredicted);
    }

    /// Consume the predictor and return its accumulated statistics.
    pub fn finalize(self) -> PredictorStats {
        self.stats
    }
}
