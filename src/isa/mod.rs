//! Instruction Set Architecture definitions.
//!
//! Covers the supported RV64I + M subset: the opcode and funct field tables,
//! register names, the decoded [`Instruction`] form, immediate packing, and
//! the encoder/decoder pair that converts between assembly text and 32-bit
//! instruction words.

/// Register names and ABI aliases.
pub mod abi;

/// Decoding of 32-bit instruction words.
pub mod decoder;

/// Encoding of assembly lines into 32-bit instruction words.
pub mod encoder;

/// Literal parsing and immediate field packing.
pub mod immediate;

/// Decoded instruction representation and raw bit-field accessors.
pub mod instruction;

/// Opcode, funct3 and funct7 tables.
pub mod opcodes;

pub use decoder::decode;
pub use encoder::{encode_line, EncodedInstruction};
pub use instruction::{Format, Instruction, InstructionBits};
pub use opcodes::Mnemonic;
