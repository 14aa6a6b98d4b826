//! Functional units used by the Execute and Memory stages.

/// Integer ALU.
pub mod alu;

/// Branch predictor.
pub mod bru;

/// Load/store unit.
pub mod lsu;

pub use alu::Alu;
pub use bru::BranchPredictor;
pub use lsu::Lsu;
