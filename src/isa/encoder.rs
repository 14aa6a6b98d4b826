//! Instruction encoder.
//!
//! [`encode_line`] turns one assembly line into an [`Instruction`] using the
//! field tables and the symbol table, then [`encode`] packs that instruction
//! into a 32-bit word with the format-specific immediate layout. Any field
//! error fails the whole line; no partial words are produced.

use crate::asm::symbols::SymbolTable;
use crate::common::error::{EncodeError, ParseError};
use crate::isa::abi::{self, REG_RA};
use crate::isa::immediate::{encode_offset, encode_signed, encode_upper, parse_literal};
use crate::isa::instruction::{Format, Instruction};
use crate::isa::opcodes::Mnemonic;

/// Bit width of I- and S-type immediates.
const IMM12_BITS: u32 = 12;
/// Bit width of branch offsets.
const BRANCH_BITS: u32 = 13;
/// Bit width of jump offsets.
const JUMP_BITS: u32 = 21;

/// One successfully encoded instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedInstruction {
    /// Byte address of the instruction.
    pub address: u64,
    /// The packed instruction word.
    pub word: u32,
    /// The instruction as the decoder will see it.
    pub instruction: Instruction,
    /// Source text with labels and comments removed.
    pub text: String,
}

impl EncodedInstruction {
    /// Diagnostic field summary for listings.
    pub fn summary(&self) -> String {
        self.instruction.field_summary()
    }
}

/// Encodes one assembly instruction located at `address`.
///
/// `text` must not contain a label prefix or a comment; the assembler strips
/// both before calling in.
pub fn encode_line(
    text: &str,
    address: u64,
    symbols: &SymbolTable,
) -> Result<EncodedInstruction, EncodeError> {
    let text = text.trim();
    parse_instruction(text, address, symbols)
        .and_then(|instruction| {
            encode(&instruction).map(|word| EncodedInstruction {
                address,
                word,
                instruction,
                text: text.to_string(),
            })
        })
        .map_err(|source| EncodeError {
            line: text.to_string(),
            source,
        })
}

/// Packs a decoded instruction back into its 32-bit word.
///
/// Range checks are repeated here, so an [`Instruction`] built by hand with
/// an oversized immediate is rejected rather than truncated.
pub fn encode(inst: &Instruction) -> Result<u32, ParseError> {
    let m = inst.mnemonic;
    let opcode = u32::from(inst.opcode);
    let funct3 = u32::from(inst.funct3.unwrap_or(0));
    let funct7 = u32::from(inst.funct7.unwrap_or(0));
    let rd = inst.rd_or_zero() as u32;
    let rs1 = inst.rs1.unwrap_or(0) as u32;
    let rs2 = inst.rs2.unwrap_or(0) as u32;
    let imm = inst.imm_or_zero();

    let word = match m.format() {
        Format::R => r_type(opcode, rd, funct3, rs1, rs2, funct7),
        Format::I | Format::Load => {
            i_type(opcode, rd, funct3, rs1, encode_signed(imm, IMM12_BITS)?)
        }
        Format::S => s_type(opcode, funct3, rs1, rs2, encode_signed(imm, IMM12_BITS)?),
        Format::B => b_type(opcode, funct3, rs1, rs2, encode_offset(imm, BRANCH_BITS)?),
        Format::U => {
            if imm % (1 << 12) != 0 || imm < i64::from(i32::MIN) || imm > i64::from(i32::MAX) {
                return Err(ParseError::UpperImmediateOutOfRange(imm));
            }
            u_type(opcode, rd, imm as u32)
        }
        Format::J => j_type(opcode, rd, encode_offset(imm, JUMP_BITS)?),
        Format::Unknown => return Err(ParseError::UnknownMnemonic(m.to_string())),
    };
    Ok(word)
}

// ── Parsing ──────────────────────────────────────────────────────────────

fn parse_instruction(
    text: &str,
    address: u64,
    symbols: &SymbolTable,
) -> Result<Instruction, ParseError> {
    let tokens = tokenize(text);
    let (head, ops) = tokens
        .split_first()
        .ok_or_else(|| ParseError::UnknownMnemonic(String::new()))?;
    let m: Mnemonic = head.parse()?;

    let inst = match m.format() {
        Format::R => {
            expect_operands(m, ops, 3)?;
            Instruction::r_type(m, reg(ops[0])?, reg(ops[1])?, reg(ops[2])?)
        }
        Format::I if m == Mnemonic::Jalr && ops.len() == 2 => {
            let (offset, base) = mem_operand(ops[1])?;
            Instruction::i_type(m, reg(ops[0])?, base, offset)
        }
        Format::I => {
            expect_operands(m, ops, 3)?;
            Instruction::i_type(m, reg(ops[0])?, reg(ops[1])?, parse_literal(ops[2])?)
        }
        Format::Load => {
            expect_operands(m, ops, 2)?;
            let (offset, base) = mem_operand(ops[1])?;
            Instruction::i_type(m, reg(ops[0])?, base, offset)
        }
        Format::S => {
            expect_operands(m, ops, 2)?;
            let (offset, base) = mem_operand(ops[1])?;
            Instruction::s_type(m, base, reg(ops[0])?, offset)
        }
        Format::B => {
            expect_operands(m, ops, 3)?;
            let offset = target_offset(ops[2], address, symbols)?;
            Instruction::s_type(m, reg(ops[0])?, reg(ops[1])?, offset)
        }
        Format::U => {
            expect_operands(m, ops, 2)?;
            let field = encode_upper(parse_literal(ops[1])?)?;
            Instruction::u_type(m, reg(ops[0])?, i64::from(field as i32))
        }
        Format::J if ops.len() == 1 => {
            Instruction::u_type(m, REG_RA, target_offset(ops[0], address, symbols)?)
        }
        Format::J => {
            expect_operands(m, ops, 2)?;
            Instruction::u_type(m, reg(ops[0])?, target_offset(ops[1], address, symbols)?)
        }
        Format::Unknown => return Err(ParseError::UnknownMnemonic(head.to_string())),
    };
    Ok(inst)
}

/// Splits on whitespace and commas, dropping empty tokens.
pub(crate) fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect()
}

fn expect_operands(m: Mnemonic, ops: &[&str], expected: usize) -> Result<(), ParseError> {
    if ops.len() != expected {
        return Err(ParseError::OperandCount {
            mnemonic: m.to_string(),
            expected,
            found: ops.len(),
        });
    }
    Ok(())
}

fn reg(token: &str) -> Result<usize, ParseError> {
    abi::register_index(token).ok_or_else(|| ParseError::InvalidRegister(token.to_string()))
}

/// Parses `offset(register)`. An empty offset means zero.
fn mem_operand(token: &str) -> Result<(i64, usize), ParseError> {
    let malformed = || ParseError::InvalidMemoryOperand(token.to_string());
    let open = token.find('(').ok_or_else(malformed)?;
    let inner = token[open + 1..].strip_suffix(')').ok_or_else(malformed)?;
    let offset = match token[..open].trim() {
        "" => 0,
        text => parse_literal(text)?,
    };
    Ok((offset, reg(inner.trim())?))
}

/// Resolves a branch/jump operand to a PC-relative offset.
fn target_offset(token: &str, address: u64, symbols: &SymbolTable) -> Result<i64, ParseError> {
    if let Some(target) = symbols.get(token) {
        return Ok(target.wrapping_sub(address) as i64);
    }
    let numeric = token
        .trim_start_matches('-')
        .starts_with(|c: char| c.is_ascii_digit());
    if numeric {
        parse_literal(token)
    } else {
        Err(ParseError::UnresolvedSymbol(token.to_string()))
    }
}

// ── Bit placement ────────────────────────────────────────────────────────

fn r_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, rs2: u32, funct7: u32) -> u32 {
    (funct7 << 25) | (rs2 << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode
}

fn i_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, imm: u32) -> u32 {
    ((imm & 0xfff) << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode
}

fn s_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: u32) -> u32 {
    let hi = (imm >> 5) & 0x7f;
    let lo = imm & 0x1f;
    (hi << 25) | (rs2 << 20) | (rs1 << 15) | (funct3 << 12) | (lo << 7) | opcode
}

fn b_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: u32) -> u32 {
    let bit12 = (imm >> 12) & 0x1;
    let bit11 = (imm >> 11) & 0x1;
    let bits10_5 = (imm >> 5) & 0x3f;
    let bits4_1 = (imm >> 1) & 0xf;
    (bit12 << 31)
        | (bits10_5 << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (funct3 << 12)
        | (bits4_1 << 8)
        | (bit11 << 7)
        | opcode
}

fn u_type(opcode: u32, rd: u32, imm: u32) -> u32 {
    (imm & 0xffff_f000) | (rd << 7) | opcode
}

fn j_type(opcode: u32, rd: u32, imm: u32) -> u32 {
    let bit20 = (imm >> 20) & 0x1;
    let bits10_1 = (imm >> 1) & 0x3ff;
    let bit11 = (imm >> 11) & 0x1;
    let bits19_12 = (imm >> 12) & 0xff;
    (bit20 << 31) | (bits10_1 << 21) | (bit11 << 20) | (bits19_12 << 12) | (rd << 7) | opcode
}
