//! Helpers for collecting statistics.

/// Container for statistics accumulated over a predictor's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredictorStats {
    /// Number of times any branch instruction was resolved.
    pub brns: usize,

    /// Number of mispredictions (each one costs a pipeline flush).
    pub flushes: usize,

    /// Estimated hardware storage for the predictor, in bits.
    /// Fixed at construction time.
    pub storage_bits: usize,
}
impl PredictorStats {
    pub fn new(storage_bits: usize) -> Self {
        Self {
            brns: 0,
            flushes: 0,
            storage_bits,
        }
    }

    /// Record one resolved branch.
    pub fn record(&mut self, flush: bool) {
        self.brns += 1;
        if flush { self.flushes += 1; }
    }

    /// Return the number of correctly-predicted branches.
    pub fn hits(&self) -> usize { self.brns - self.flushes }

    /// Return the fraction of resolved branches that were mispredicted.
    pub fn flush_rate(&self) -> f64 {
        self.flushes as f64 / self.brns as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tracks_branches_and_flushes() {
        let mut s = PredictorStats::new(128);
        s.record(false);
        s.record(true);
        s.record(false);
        assert_eq!(s.brns, 3);
        assert_eq!(s.flushes, 1);
        assert_eq!(s.hits(), 2);
        assert_eq!(s.storage_bits, 128);
    }
}
