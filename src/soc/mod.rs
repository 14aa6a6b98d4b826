//! Memory system.
//!
//! The simulated machine has a single flat, sparse data memory. Instruction
//! words live separately in the program image and are never written.

/// Sparse byte-addressable data memory.
pub mod memory;

pub use memory::DataMemory;
