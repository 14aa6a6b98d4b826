//! Program image: instruction words by address plus initial data memory.

use std::collections::BTreeMap;

use crate::asm::Assembly;
use crate::soc::DataMemory;

/// Everything a simulation needs before the first cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramImage {
    /// Instruction words keyed by their 4-byte aligned address.
    pub text: BTreeMap<u64, u32>,
    /// Initial contents of data memory.
    pub data: DataMemory,
}

impl ProgramImage {
    /// Builds an image from words laid out from `base`.
    pub fn from_words(base: u64, words: &[u32]) -> Self {
        let text = words
            .iter()
            .enumerate()
            .map(|(i, &w)| (base + 4 * i as u64, w))
            .collect();
        Self {
            text,
            data: DataMemory::new(),
        }
    }

    /// Takes the successfully encoded instructions and data of an assembly.
    pub fn from_assembly(assembly: &Assembly) -> Self {
        Self {
            text: assembly.instructions().map(|e| (e.address, e.word)).collect(),
            data: assembly.data.clone(),
        }
    }

    /// Number of instruction words.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if there are no instructions.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
