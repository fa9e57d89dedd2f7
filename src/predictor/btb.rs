//! Branch target buffer (BTB) implementations.

use crate::predictor::*;

/// A single entry in a [`BranchTargetBuffer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BTBEntry {
    /// Partial tag identifying the branch that owns this slot.
    pub tag: u32,

    /// Cached target address for this branch.
    pub tgt: u32,
}
impl BTBEntry {
    pub fn target(&self) -> u32 { self.tgt }
}

/// A direct-mapped table of [`BTBEntry`] indexed and tagged by PC bits.
///
/// Branch PCs are word-aligned, so the two offset bits are dropped before
/// the index is formed; the tag is taken from the bits directly above the
/// index.
pub struct BranchTargetBuffer {
    size: usize,
    tag_bits: usize,
    data: Vec<BTBEntry>,
}
impl BranchTargetBuffer {
    pub fn new(size: usize, tag_bits: usize) -> Self {
        assert!(size.is_power_of_two());
        Self {
            size,
            tag_bits,
            data: vec![BTBEntry::default(); size],
        }
    }

    /// Return the number of tag bits kept in each entry.
    pub fn tag_bits(&self) -> usize { self.tag_bits }
}

impl PredictorTable for BranchTargetBuffer {
    type Input = u32;
    type Entry = BTBEntry;

    fn size(&self) -> usize { self.size }

    fn get_index(&self, pc: u32) -> usize {
        (pc as usize >> 2) & self.index_mask()
    }

    fn get_entry(&self, pc: u32) -> &BTBEntry {
        &self.data[self.get_index(pc)]
    }

    fn get_entry_mut(&mut self, pc: u32) -> &mut BTBEntry {
        let index = self.get_index(pc);
        &mut self.data[index]
    }
}

impl TaggedPredictorTable for BranchTargetBuffer {
    fn get_tag(&self, pc: u32) -> usize {
        let shift = 2 + self.size.ilog2() as usize;
        let mask = (1usize << self.tag_bits) - 1;
        (pc as usize >> shift) & mask
    }
}
