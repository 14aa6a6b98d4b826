//! Architectural and layout constants.

/// Address of the first instruction in the text segment.
pub const TEXT_BASE: u64 = 0x0;

/// Address where the assembler starts laying out the data segment.
pub const DATA_BASE: u64 = 0x1000_0000;

/// Initial stack pointer used when stack seeding is enabled.
pub const STACK_POINTER: u64 = 0x7FFF_FFFC;

/// Size of one encoded instruction in bytes.
pub const INSTRUCTION_BYTES: u64 = 4;

/// Number of architectural integer registers.
pub const REGISTER_COUNT: usize = 32;

/// Value produced by DIV when the divisor is zero.
pub const DIV_BY_ZERO_RESULT: i64 = -1;
