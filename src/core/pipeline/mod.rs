//! Instruction pipeline implementation.
//!
//! This module contains the five pipeline stages, the latches between them,
//! hazard detection and forwarding, and the control signals that Decode
//! hands to the later stages.

/// Pipeline hazard detection and forwarding logic.
pub mod hazards;

/// Inter-stage pipeline latches (IF/ID, ID/EX, EX/MEM, MEM/WB).
pub mod latches;

/// Control signals generated during instruction decode.
pub mod signals;

/// Pipeline stage implementations (fetch, decode, execute, memory, writeback).
pub mod stages;

/// Traits for pipeline latches.
pub mod traits;

pub use latches::{ExMem, ExMemEntry, IdEx, IdExEntry, IfId, IfIdEntry, MemWb, MemWbEntry};
pub use traits::PipelineLatch;
