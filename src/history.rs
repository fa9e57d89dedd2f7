//! Branch history registers and their storage.

use bitvec::prelude::*;

use crate::Outcome;

/// A fixed-width shift register of recent branch outcomes.
///
/// The newest outcome lives at bit 0, so [`HistoryRegister::value`] reads as
/// `((old << 1) | newest) mod 2^len`.
pub struct HistoryRegister {
    data: BitVec<usize, Lsb0>,
    len: usize,
}

// NOTE: This *reverses* all of the bits and presents them in a format
// where the leftmost bit is the most-significant (index n) and the rightmost
// bit is the least-significant (index 0).
impl std::fmt::Display for HistoryRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let x: String = self.data.as_bitslice().iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        write!(f, "{}", x)
    }
}

impl HistoryRegister {
    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(len: usize) -> Self {
        assert!(len > 0 && len <= usize::BITS as usize);
        Self {
            data: bitvec![usize, Lsb0; 0; len],
            len,
        }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Return the register contents as an integer pattern.
    pub fn value(&self) -> usize {
        self.data.load::<usize>()
    }

    /// Shift a new outcome into the register.
    /// The oldest outcome (the top bit) is discarded.
    pub fn record(&mut self, outcome: Outcome) {
        self.data.shift_right(1);
        self.data.set(0, outcome.into());
    }

    /// Clear the register back to all-zero.
    pub fn clear(&mut self) {
        self.data.fill(false);
    }
}

/// Storage for history registers: one shared register, or one independent
/// register per BTB entry.
pub enum HistoryStorage {
    Global(HistoryRegister),
    PerEntry(Vec<HistoryRegister>),
}

impl HistoryStorage {
    /// Returns the register consulted for the entry at `idx`.
    pub fn register(&self, idx: usize) -> &HistoryRegister {
        match self {
            Self::Global(r) => r,
            Self::PerEntry(regs) => &regs[idx],
        }
    }

    /// Returns a mutable reference to the register for the entry at `idx`.
    pub fn register_mut(&mut self, idx: usize) -> &mut HistoryRegister {
        match self {
            Self::Global(r) => r,
            Self::PerEntry(regs) => &mut regs[idx],
        }
    }

    /// Clear the history owned by the entry at `idx`.
    ///
    /// A shared global register does not belong to any one entry and is
    /// left untouched.
    pub fn clear_entry(&mut self, idx: usize) {
        if let Self::PerEntry(regs) = self {
            regs[idx].clear();
        }
    }

    /// Returns the number of physical registers held by this storage.
    pub fn num_registers(&self) -> usize {
        match self {
            Self::Global(_) => 1,
            Self::PerEntry(regs) => regs.len(),
        }
    }
}
