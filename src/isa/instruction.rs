//! Decoded instruction representation.
//!
//! An [`Instruction`] is the immutable, decoded form of a 32-bit word. Fields
//! that a format does not carry are `None`, so an R-type instruction has no
//! immediate and a U-type instruction has no source registers.

use std::fmt;

use crate::isa::opcodes::Mnemonic;

/// Instruction encoding formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// Register-register.
    R,
    /// Register-immediate arithmetic and `jalr`.
    I,
    /// Loads (I-type layout, memory operand syntax).
    Load,
    /// Stores.
    S,
    /// Conditional branches.
    B,
    /// Upper immediates.
    U,
    /// Jump and link.
    J,
    /// Opcode outside the supported set.
    Unknown,
}

impl Format {
    /// Whether instructions of this format read `rs1`.
    pub fn reads_rs1(self) -> bool {
        matches!(
            self,
            Format::R | Format::I | Format::Load | Format::S | Format::B
        )
    }

    /// Whether instructions of this format read `rs2`.
    pub fn reads_rs2(self) -> bool {
        matches!(self, Format::R | Format::S | Format::B)
    }

    /// Whether instructions of this format carry a destination register.
    pub fn has_rd(self) -> bool {
        matches!(
            self,
            Format::R | Format::I | Format::Load | Format::U | Format::J
        )
    }

    /// Width of the immediate as it appears in a listing summary.
    pub fn imm_bits(self) -> Option<u32> {
        match self {
            Format::I | Format::Load | Format::S => Some(12),
            Format::B => Some(13),
            Format::U => Some(20),
            Format::J => Some(21),
            Format::R | Format::Unknown => None,
        }
    }
}

/// Raw bit-field accessors for an undecoded instruction word.
pub trait InstructionBits {
    /// Bits 6:0.
    fn opcode(&self) -> u8;
    /// Bits 11:7.
    fn rd(&self) -> usize;
    /// Bits 14:12.
    fn funct3(&self) -> u8;
    /// Bits 19:15.
    fn rs1(&self) -> usize;
    /// Bits 24:20.
    fn rs2(&self) -> usize;
    /// Bits 31:25.
    fn funct7(&self) -> u8;
}

impl InstructionBits for u32 {
    fn opcode(&self) -> u8 {
        (self & 0x7f) as u8
    }

    fn rd(&self) -> usize {
        ((self >> 7) & 0x1f) as usize
    }

    fn funct3(&self) -> u8 {
        ((self >> 12) & 0x7) as u8
    }

    fn rs1(&self) -> usize {
        ((self >> 15) & 0x1f) as usize
    }

    fn rs2(&self) -> usize {
        ((self >> 20) & 0x1f) as usize
    }

    fn funct7(&self) -> u8 {
        ((self >> 25) & 0x7f) as u8
    }
}

/// A decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// The concrete operation.
    pub mnemonic: Mnemonic,
    /// Major opcode (bits 6:0).
    pub opcode: u8,
    /// Destination register.
    pub rd: Option<usize>,
    /// First source register.
    pub rs1: Option<usize>,
    /// Second source register.
    pub rs2: Option<usize>,
    /// Minor opcode.
    pub funct3: Option<u8>,
    /// R-type function field.
    pub funct7: Option<u8>,
    /// Sign-extended immediate. For U-type this is the already shifted value.
    pub imm: Option<i64>,
}

impl Instruction {
    fn base(mnemonic: Mnemonic) -> Self {
        Self {
            mnemonic,
            opcode: mnemonic.opcode().unwrap_or(0),
            rd: None,
            rs1: None,
            rs2: None,
            funct3: mnemonic.funct3(),
            funct7: mnemonic.funct7(),
            imm: None,
        }
    }

    /// Builds a register-register instruction.
    pub fn r_type(mnemonic: Mnemonic, rd: usize, rs1: usize, rs2: usize) -> Self {
        Self {
            rd: Some(rd),
            rs1: Some(rs1),
            rs2: Some(rs2),
            ..Self::base(mnemonic)
        }
    }

    /// Builds an I-type or load instruction.
    pub fn i_type(mnemonic: Mnemonic, rd: usize, rs1: usize, imm: i64) -> Self {
        Self {
            rd: Some(rd),
            rs1: Some(rs1),
            imm: Some(imm),
            ..Self::base(mnemonic)
        }
    }

    /// Builds a store or branch instruction.
    pub fn s_type(mnemonic: Mnemonic, rs1: usize, rs2: usize, imm: i64) -> Self {
        Self {
            rs1: Some(rs1),
            rs2: Some(rs2),
            imm: Some(imm),
            ..Self::base(mnemonic)
        }
    }

    /// Builds an upper-immediate or jump instruction.
    pub fn u_type(mnemonic: Mnemonic, rd: usize, imm: i64) -> Self {
        Self {
            rd: Some(rd),
            imm: Some(imm),
            ..Self::base(mnemonic)
        }
    }

    /// Builds the placeholder for a word with an unsupported opcode.
    pub fn unknown(opcode: u8) -> Self {
        Self {
            opcode,
            ..Self::base(Mnemonic::Unknown)
        }
    }

    /// Returns the instruction format.
    pub fn format(&self) -> Format {
        self.mnemonic.format()
    }

    /// Destination register, treating a missing field as `x0`.
    pub fn rd_or_zero(&self) -> usize {
        self.rd.unwrap_or(0)
    }

    /// Immediate, treating a missing field as zero.
    pub fn imm_or_zero(&self) -> i64 {
        self.imm.unwrap_or(0)
    }

    /// Whether this is the `addi x0, x0, 1` exit marker.
    pub fn is_exit_marker(&self) -> bool {
        self.mnemonic == Mnemonic::Addi
            && self.rd == Some(0)
            && self.rs1 == Some(0)
            && self.imm == Some(1)
    }

    /// Diagnostic summary joining opcode-funct3-funct7-rd-rs1-rs2-imm as
    /// binary strings, with `NULL` for absent fields.
    pub fn field_summary(&self) -> String {
        fn bin(value: u64, width: u32) -> String {
            let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
            format!("{:0width$b}", value & mask, width = width as usize)
        }
        fn field<T: Into<u64>>(value: Option<T>, width: u32) -> String {
            value.map_or_else(|| "NULL".to_string(), |v| bin(v.into(), width))
        }

        let format = self.format();
        let imm = match (self.imm, format.imm_bits()) {
            (Some(imm), Some(bits)) if format == Format::U => bin((imm as u64) >> 12, bits),
            (Some(imm), Some(bits)) => bin(imm as u64, bits),
            _ => "NULL".to_string(),
        };
        [
            bin(self.opcode.into(), 7),
            field(self.funct3, 3),
            field(self.funct7, 7),
            field(self.rd.map(|r| r as u64), 5),
            field(self.rs1.map(|r| r as u64), 5),
            field(self.rs2.map(|r| r as u64), 5),
            imm,
        ]
        .join("-")
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.mnemonic;
        let rd = self.rd_or_zero();
        let rs1 = self.rs1.unwrap_or(0);
        let rs2 = self.rs2.unwrap_or(0);
        let imm = self.imm_or_zero();
        match self.format() {
            Format::R => write!(f, "{m} x{rd}, x{rs1}, x{rs2}"),
            Format::I => write!(f, "{m} x{rd}, x{rs1}, {imm}"),
            Format::Load => write!(f, "{m} x{rd}, {imm}(x{rs1})"),
            Format::S => write!(f, "{m} x{rs2}, {imm}(x{rs1})"),
            Format::B => write!(f, "{m} x{rs1}, x{rs2}, {imm}"),
            Format::U => write!(f, "{m} x{rd}, {:#x}", ((imm as u64) >> 12) & 0xfffff),
            Format::J => write!(f, "{m} x{rd}, {imm}"),
            Format::Unknown => write!(f, "unknown (opcode {:#04x})", self.opcode),
        }
    }
}
