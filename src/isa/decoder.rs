//! Instruction decoder.
//!
//! Dispatches on the opcode field, identifies the concrete [`Mnemonic`] from
//! funct3/funct7, and reassembles the format-specific immediate. All
//! immediates are sign-extended from their natural width.

use crate::isa::immediate::sign_extend;
use crate::isa::instruction::{Format, Instruction, InstructionBits};
use crate::isa::opcodes::Mnemonic;

/// Decodes a 32-bit instruction word.
///
/// Words with an unsupported opcode or function-field combination decode to
/// [`Mnemonic::Unknown`]; decoding never fails.
///
/// # Examples
///
/// ```
/// use rvpipe::isa::{decode, Mnemonic};
///
/// let inst = decode(0x0050_0093); // addi x1, x0, 5
/// assert_eq!(inst.mnemonic, Mnemonic::Addi);
/// assert_eq!(inst.imm, Some(5));
/// ```
pub fn decode(word: u32) -> Instruction {
    let mnemonic = Mnemonic::from_fields(word.opcode(), word.funct3(), word.funct7());
    match mnemonic.format() {
        Format::R => Instruction::r_type(mnemonic, word.rd(), word.rs1(), word.rs2()),
        Format::I | Format::Load => Instruction::i_type(mnemonic, word.rd(), word.rs1(), imm_i(word)),
        Format::S => Instruction::s_type(mnemonic, word.rs1(), word.rs2(), imm_s(word)),
        Format::B => Instruction::s_type(mnemonic, word.rs1(), word.rs2(), imm_b(word)),
        Format::U => Instruction::u_type(mnemonic, word.rd(), imm_u(word)),
        Format::J => Instruction::u_type(mnemonic, word.rd(), imm_j(word)),
        Format::Unknown => Instruction::unknown(word.opcode()),
    }
}

/// imm[11:0] = inst[31:20]
fn imm_i(word: u32) -> i64 {
    sign_extend(u64::from(word >> 20), 12)
}

/// imm[11:5] = inst[31:25], imm[4:0] = inst[11:7]
fn imm_s(word: u32) -> i64 {
    let raw = ((word >> 25) << 5) | ((word >> 7) & 0x1f);
    sign_extend(u64::from(raw), 12)
}

/// imm[12|10:5] = inst[31:25], imm[4:1|11] = inst[11:7]
fn imm_b(word: u32) -> i64 {
    let raw = (((word >> 31) & 0x1) << 12)
        | (((word >> 7) & 0x1) << 11)
        | (((word >> 25) & 0x3f) << 5)
        | (((word >> 8) & 0xf) << 1);
    sign_extend(u64::from(raw), 13)
}

/// imm[31:12] = inst[31:12]
fn imm_u(word: u32) -> i64 {
    i64::from((word & 0xffff_f000) as i32)
}

/// imm[20|10:1|11|19:12] = inst[31:12]
fn imm_j(word: u32) -> i64 {
    let raw = (((word >> 31) & 0x1) << 20)
        | (((word >> 12) & 0xff) << 12)
        | (((word >> 20) & 0x1) << 11)
        | (((word >> 21) & 0x3ff) << 1);
    sign_extend(u64::from(raw), 21)
}
