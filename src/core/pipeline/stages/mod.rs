//! Pipeline stage implementations.
//!
//! Contains the five stages of the instruction pipeline:
//! - Fetch: Retrieves instruction words and applies branch prediction
//! - Decode: Decodes instructions and reads register values
//! - Execute: Forwards operands, runs the ALU and resolves branches
//! - Memory: Handles load/store operations
//! - Writeback: Commits results to the register file
//!
//! [`crate::core::Cpu::tick`] calls them latest-stage-first so each stage
//! reads its input latch before the upstream stage overwrites it.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

pub use decode::decode_stage;
pub use execute::{evaluate, execute_stage, ExecOutcome};
pub use fetch::fetch_stage;
pub use memory::mem_stage;
pub use writeback::wb_stage;
