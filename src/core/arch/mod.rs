//! Architectural state.

/// Integer register file.
pub mod gpr;

pub use gpr::Gpr;
