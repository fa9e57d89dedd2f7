//! Configuration for a [`TwoLevelPredictor`].

use thiserror::Error;

use crate::history::*;
use crate::predictor::*;
use crate::stats::*;

/// How PC bits are mixed into the pattern table index.
///
/// Mixing lets unrelated branches that share a pattern table spread out
/// across its counters (gshare/gselect-style prediction).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareMode {
    /// Index with the history pattern alone.
    None,
    /// XOR the history with the low PC bits (above the word offset).
    Lsb,
    /// XOR the history with PC bits 16 and up.
    Mid,
}

/// Errors produced when building a [`TwoLevelPredictor`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// A configuration parameter is outside its legal range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// Table allocation failed; no partially-built state is retained.
    #[error("allocation failure while building predictor tables")]
    AllocationFailure,
}

/// Configuration for a [`TwoLevelPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct TwoLevelConfig {
    /// Number of BTB entries (a power of two, up to 32).
    pub btb_size: usize,

    /// Width of each history register in bits (1 to 8).
    pub history_bits: usize,

    /// Number of tag bits kept in each BTB entry.
    pub tag_bits: usize,

    /// Parameters for the saturating counters.
    pub ctr: SaturatingCounterConfig,

    /// Use one shared history register instead of one per entry.
    pub global_history: bool,

    /// Use one shared pattern table instead of one per entry.
    pub global_table: bool,

    /// Strategy for mixing PC bits into the pattern table index.
    pub share_mode: ShareMode,
}
impl TwoLevelConfig {
    /// Largest legal BTB, in entries.
    pub const MAX_BTB_SIZE: usize = 32;

    /// Widest legal history register, in bits.
    pub const MAX_HISTORY_BITS: usize = 8;

    /// Width of a stored target address, in bits.
    pub const TARGET_BITS: usize = 30;

    /// Check every parameter against its legal range.
    pub fn validate(&self) -> Result<(), BuildError> {
        if !self.btb_size.is_power_of_two()
            || self.btb_size > Self::MAX_BTB_SIZE
        {
            return Err(BuildError::InvalidConfiguration(
                "btb_size must be a power of two between 1 and 32"
            ));
        }
        if self.history_bits < 1
            || self.history_bits > Self::MAX_HISTORY_BITS
        {
            return Err(BuildError::InvalidConfiguration(
                "history_bits must be between 1 and 8"
            ));
        }
        if self.tag_bits > Self::TARGET_BITS - self.btb_size.ilog2() as usize {
            return Err(BuildError::InvalidConfiguration(
                "tag_bits must not exceed 30 minus log2(btb_size)"
            ));
        }
        if self.ctr.init_state > SaturatingCounter::MAX_STATE {
            return Err(BuildError::InvalidConfiguration(
                "init_state must be between 0 and 3"
            ));
        }
        Ok(())
    }

    /// Number of entries in each pattern table.
    pub fn table_size(&self) -> usize {
        1 << self.history_bits
    }

    /// Number of physical pattern tables.
    pub fn num_tables(&self) -> usize {
        if self.global_table { 1 } else { self.btb_size }
    }

    /// Number of physical history registers.
    pub fn num_histories(&self) -> usize {
        if self.global_history { 1 } else { self.btb_size }
    }

    /// Get the [approximate] number of storage bits.
    ///
    /// Each BTB entry carries its tag, a 30-bit target, and a valid bit.
    pub fn storage_bits(&self) -> usize {
        self.ctr.storage_bits() * self.table_size() * self.num_tables()
            + self.history_bits * self.num_histories()
            + (self.tag_bits + Self::TARGET_BITS + 1) * self.btb_size
    }

    /// Use this configuration to create a new [`TwoLevelPredictor`].
    ///
    /// Fails with [`BuildError::InvalidConfiguration`] when [`validate`]
    /// rejects a parameter, or [`BuildError::AllocationFailure`] when a
    /// pattern table cannot be allocated. On failure nothing is retained.
    ///
    /// [`validate`]: TwoLevelConfig::validate
    pub fn build(self) -> Result<TwoLevelPredictor, BuildError> {
        self.validate()?;

        let hist = if self.global_history {
            HistoryStorage::Global(HistoryRegister::new(self.history_bits))
        } else {
            HistoryStorage::PerEntry(
                (0..self.btb_size)
                    .map(|_| HistoryRegister::new(self.history_bits))
                    .collect()
            )
        };

        let new_table = || {
            PatternTable::new(self.table_size(), self.ctr)
                .map_err(|_| BuildError::AllocationFailure)
        };
        let pht = if self.global_table {
            PatternStorage::Global(new_table()?)
        } else {
            PatternStorage::PerEntry(
                (0..self.btb_size)
                    .map(|_| new_table())
                    .collect::<Result<_, _>>()?
            )
        };

        Ok(TwoLevelPredictor {
            btb: BranchTargetBuffer::new(self.btb_size, self.tag_bits),
            hist,
            pht,
            stats: PredictorStats::new(self.storage_bits()),
            cfg: self,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> TwoLevelConfig {
        TwoLevelConfig {
            btb_size: 8,
            history_bits: 4,
            tag_bits: 10,
            ctr: SaturatingCounterConfig { init_state: 1 },
            global_history: false,
            global_table: false,
            share_mode: ShareMode::None,
        }
    }

    #[test]
    fn valid_configurations_build() {
        for btb_size in [1, 2, 4, 8, 16, 32] {
            let cfg = TwoLevelConfig { btb_size, ..base() };
            assert!(cfg.build().is_ok(), "btb_size={btb_size}");
        }
    }

    #[test]
    fn non_power_of_two_btb_is_rejected() {
        let cfg = TwoLevelConfig { btb_size: 3, ..base() };
        assert!(matches!(
            cfg.build(),
            Err(BuildError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn history_width_bounds_are_enforced() {
        for history_bits in [0, 9] {
            let cfg = TwoLevelConfig { history_bits, ..base() };
            assert!(matches!(
                cfg.build(),
                Err(BuildError::InvalidConfiguration(_))
            ), "history_bits={history_bits}");
        }
        for history_bits in [1, 8] {
            let cfg = TwoLevelConfig { history_bits, ..base() };
            assert!(cfg.build().is_ok(), "history_bits={history_bits}");
        }
    }

    #[test]
    fn tag_width_bound_depends_on_btb_size() {
        // log2(8) = 3, so 27 tag bits fit and 28 do not.
        let cfg = TwoLevelConfig { tag_bits: 27, ..base() };
        assert!(cfg.build().is_ok());
        let cfg = TwoLevelConfig { tag_bits: 28, ..base() };
        assert!(matches!(
            cfg.build(),
            Err(BuildError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn counter_init_state_bound_is_enforced() {
        let cfg = TwoLevelConfig {
            ctr: SaturatingCounterConfig { init_state: 4 },
            ..base()
        };
        assert!(matches!(
            cfg.build(),
            Err(BuildError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn storage_bits_counts_tables_histories_and_entries() {
        // Fully global: one 2^8-entry table, one 8-bit register.
        let cfg = TwoLevelConfig {
            btb_size: 16,
            history_bits: 8,
            tag_bits: 6,
            global_history: true,
            global_table: true,
            ..base()
        };
        assert_eq!(cfg.storage_bits(), 2 * 256 + 8 + (6 + 30 + 1) * 16);

        // Fully local: one table and register per entry.
        let cfg = TwoLevelConfig {
            btb_size: 4,
            history_bits: 2,
            tag_bits: 8,
            ..base()
        };
        assert_eq!(cfg.storage_bits(), 2 * 4 * 4 + 2 * 4 + (8 + 30 + 1) * 4);
    }
}
