//! Branch Resolution Unit: last-outcome branch predictor.
//!
//! Two tables keyed by fetch address. The pattern history table remembers
//! whether the branch at that address was last taken; the branch target
//! buffer remembers where it last went when taken. There is no saturating
//! counter: one surprise flips the prediction.

use std::collections::HashMap;
use std::fmt::Write as _;

/// One-bit branch predictor with a target buffer.
#[derive(Clone, Debug, Default)]
pub struct BranchPredictor {
    pht: HashMap<u64, bool>,
    btb: HashMap<u64, u64>,
    predictions: u64,
    correct: u64,
}

impl BranchPredictor {
    /// Creates a predictor with empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Predicts the direction of the branch at `pc`.
    ///
    /// Unseen addresses predict not-taken. Every call counts as one
    /// prediction.
    pub fn predict(&mut self, pc: u64) -> bool {
        self.predictions += 1;
        self.pht.get(&pc).copied().unwrap_or(false)
    }

    /// Last taken-target recorded for `pc`.
    pub fn target(&self, pc: u64) -> Option<u64> {
        self.btb.get(&pc).copied()
    }

    /// Records the resolved outcome of the branch at `pc`.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the branch
    /// * `taken` - Whether the branch was taken
    /// * `target` - Destination when taken
    pub fn update(&mut self, pc: u64, taken: bool, target: u64) {
        if self.pht.get(&pc) == Some(&taken) {
            self.correct += 1;
        }
        self.pht.insert(pc, taken);
        if taken {
            self.btb.insert(pc, target);
        }
    }

    /// Seeds the tables for `pc` without touching the counters.
    pub fn seed(&mut self, pc: u64, taken: bool, target: Option<u64>) {
        self.pht.insert(pc, taken);
        if let Some(target) = target {
            self.btb.insert(pc, target);
        }
    }

    /// Total predictions made.
    pub fn predictions(&self) -> u64 {
        self.predictions
    }

    /// Updates whose outcome matched the recorded history.
    pub fn correct_predictions(&self) -> u64 {
        self.correct
    }

    /// Renders both tables sorted by address.
    pub fn dump(&self) -> String {
        let mut pcs: Vec<u64> = self.pht.keys().copied().collect();
        pcs.sort_unstable();
        let mut out = String::new();
        for pc in pcs {
            let taken = self.pht.get(&pc).copied().unwrap_or(false);
            let target = self
                .btb
                .get(&pc)
                .map_or_else(|| "-".to_string(), |t| format!("{t:#x}"));
            let _ = writeln!(
                out,
                "  pc={pc:#x} {} target={target}",
                if taken { "T" } else { "N" }
            );
        }
        out
    }
}
