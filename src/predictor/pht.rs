//! Implementations of a pattern history table (PHT).

use std::collections::TryReserveError;

use crate::predictor::*;
use crate::predictor::counter::*;

/// A table of [`SaturatingCounter`] indexed by a history pattern.
#[derive(Clone, Debug)]
pub struct PatternTable {
    /// Saturating counter configuration.
    cfg: SaturatingCounterConfig,

    /// Table of counters.
    data: Vec<SaturatingCounter>,

    /// Number of entries.
    size: usize,
}
impl PatternTable {
    /// Allocate a table of `size` counters built from `cfg`.
    ///
    /// Allocation is all-or-nothing: on failure, nothing is retained.
    pub fn new(size: usize, cfg: SaturatingCounterConfig)
        -> Result<Self, TryReserveError>
    {
        assert!(size.is_power_of_two());
        let mut data = Vec::new();
        data.try_reserve_exact(size)?;
        data.resize(size, cfg.build());
        Ok(Self { cfg, data, size })
    }

    /// Return the counter configuration used to build this table.
    pub fn ctr_config(&self) -> SaturatingCounterConfig { self.cfg }

    /// Reset every counter in the table to its initial state.
    pub fn reset(&mut self) {
        for ctr in self.data.iter_mut() {
            ctr.reset();
        }
    }
}

impl PredictorTable for PatternTable {
    type Input = usize;
    type Entry = SaturatingCounter;

    fn size(&self) -> usize { self.size }

    fn get_index(&self, pattern: usize) -> usize {
        pattern & self.index_mask()
    }

    fn get_entry(&self, pattern: usize) -> &SaturatingCounter {
        &self.data[self.get_index(pattern)]
    }

    fn get_entry_mut(&mut self, pattern: usize) -> &mut SaturatingCounter {
        let index = self.get_index(pattern);
        &mut self.data[index]
    }
}

/// Storage for pattern tables: one shared table, or one independent table
/// per BTB entry.
pub enum PatternStorage {
    Global(PatternTable),
    PerEntry(Vec<PatternTable>),
}

impl PatternStorage {
    /// Returns the table consulted for the entry at `idx`.
    pub fn table(&self, idx: usize) -> &PatternTable {
        match self {
            Self::Global(t) => t,
            Self::PerEntry(tables) => &tables[idx],
        }
    }

    /// Returns a mutable reference to the table for the entry at `idx`.
    pub fn table_mut(&mut self, idx: usize) -> &mut PatternTable {
        match self {
            Self::Global(t) => t,
            Self::PerEntry(tables) => &mut tables[idx],
        }
    }

    /// Reset the counters owned by the entry at `idx`.
    ///
    /// A shared global table does not belong to any one entry and is left
    /// untouched.
    pub fn reset_entry(&mut self, idx: usize) {
        if let Self::PerEntry(tables) = self {
            tables[idx].reset();
        }
    }

    /// Returns the number of physical tables held by this storage.
    pub fn num_tables(&self) -> usize {
        match self {
            Self::Global(_) => 1,
            Self::PerEntry(tables) => tables.len(),
        }
    }
}
