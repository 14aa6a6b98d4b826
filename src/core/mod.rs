//! CPU core implementation.
//!
//! Two drivers share the same instruction semantics: the five-stage
//! pipelined [`Cpu`] and the one-instruction-per-cycle [`SingleCycleCpu`].

/// Architectural state (register file).
pub mod arch;

/// Pipelined CPU and its cycle loop.
pub mod cpu;

/// Pipeline latches, hazards, control signals and stages.
pub mod pipeline;

/// Non-pipelined reference driver.
pub mod single_cycle;

/// Functional units: ALU, branch predictor, load/store unit.
pub mod units;

pub use cpu::{Cpu, HaltReason, Stage};
pub use single_cycle::SingleCycleCpu;
