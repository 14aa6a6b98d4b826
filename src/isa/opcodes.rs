//! Opcode and function-field tables.
//!
//! [`Mnemonic`] is the closed set of supported instructions. Each mnemonic
//! maps to exactly one `(format, opcode, funct3, funct7)` row, and the
//! decoder performs the reverse lookup from those fields.

use std::fmt;
use std::str::FromStr;

use crate::common::error::ParseError;
use crate::isa::instruction::Format;

// ── Opcodes ──────────────────────────────────────────────────────────────

/// Register-register arithmetic (R-type).
pub const OP_REG: u8 = 0x33;
/// Register-immediate arithmetic (I-type).
pub const OP_IMM: u8 = 0x13;
/// Loads.
pub const OP_LOAD: u8 = 0x03;
/// Stores (S-type).
pub const OP_STORE: u8 = 0x23;
/// Conditional branches (B-type).
pub const OP_BRANCH: u8 = 0x63;
/// Jump and link register.
pub const OP_JALR: u8 = 0x67;
/// Jump and link (J-type).
pub const OP_JAL: u8 = 0x6F;
/// Load upper immediate (U-type).
pub const OP_LUI: u8 = 0x37;
/// Add upper immediate to PC (U-type).
pub const OP_AUIPC: u8 = 0x17;

// ── funct7 ───────────────────────────────────────────────────────────────

/// Base integer operations.
pub const FUNCT7_BASE: u8 = 0x00;
/// SUB / SRA.
pub const FUNCT7_ALT: u8 = 0x20;
/// M extension.
pub const FUNCT7_MULDIV: u8 = 0x01;

/// Supported instruction mnemonics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Add,
    Sub,
    And,
    Or,
    Xor,
    Sll,
    Slt,
    Srl,
    Sra,
    Mul,
    Div,
    Rem,
    Addi,
    Andi,
    Ori,
    Lb,
    Lh,
    Lw,
    Ld,
    Sb,
    Sh,
    Sw,
    Sd,
    Beq,
    Bne,
    Blt,
    Bge,
    Jalr,
    Jal,
    Lui,
    Auipc,
    /// A word whose fields match no supported instruction.
    Unknown,
}

impl Mnemonic {
    /// Every encodable mnemonic, in table order.
    pub const ALL: [Mnemonic; 31] = [
        Mnemonic::Add,
        Mnemonic::Sub,
        Mnemonic::And,
        Mnemonic::Or,
        Mnemonic::Xor,
        Mnemonic::Sll,
        Mnemonic::Slt,
        Mnemonic::Srl,
        Mnemonic::Sra,
        Mnemonic::Mul,
        Mnemonic::Div,
        Mnemonic::Rem,
        Mnemonic::Addi,
        Mnemonic::Andi,
        Mnemonic::Ori,
        Mnemonic::Lb,
        Mnemonic::Lh,
        Mnemonic::Lw,
        Mnemonic::Ld,
        Mnemonic::Sb,
        Mnemonic::Sh,
        Mnemonic::Sw,
        Mnemonic::Sd,
        Mnemonic::Beq,
        Mnemonic::Bne,
        Mnemonic::Blt,
        Mnemonic::Bge,
        Mnemonic::Jalr,
        Mnemonic::Jal,
        Mnemonic::Lui,
        Mnemonic::Auipc,
    ];

    /// Returns the instruction format.
    pub fn format(self) -> Format {
        match self {
            Mnemonic::Add
            | Mnemonic::Sub
            | Mnemonic::And
            | Mnemonic::Or
            | Mnemonic::Xor
            | Mnemonic::Sll
            | Mnemonic::Slt
            | Mnemonic::Srl
            | Mnemonic::Sra
            | Mnemonic::Mul
            | Mnemonic::Div
            | Mnemonic::Rem => Format::R,
            Mnemonic::Addi | Mnemonic::Andi | Mnemonic::Ori | Mnemonic::Jalr => Format::I,
            Mnemonic::Lb | Mnemonic::Lh | Mnemonic::Lw | Mnemonic::Ld => Format::Load,
            Mnemonic::Sb | Mnemonic::Sh | Mnemonic::Sw | Mnemonic::Sd => Format::S,
            Mnemonic::Beq | Mnemonic::Bne | Mnemonic::Blt | Mnemonic::Bge => Format::B,
            Mnemonic::Lui | Mnemonic::Auipc => Format::U,
            Mnemonic::Jal => Format::J,
            Mnemonic::Unknown => Format::Unknown,
        }
    }

    /// Returns the 7-bit major opcode, or `None` for [`Mnemonic::Unknown`].
    pub fn opcode(self) -> Option<u8> {
        let op = match self.format() {
            Format::R => OP_REG,
            Format::I if self == Mnemonic::Jalr => OP_JALR,
            Format::I => OP_IMM,
            Format::Load => OP_LOAD,
            Format::S => OP_STORE,
            Format::B => OP_BRANCH,
            Format::U if self == Mnemonic::Lui => OP_LUI,
            Format::U => OP_AUIPC,
            Format::J => OP_JAL,
            Format::Unknown => return None,
        };
        Some(op)
    }

    /// Returns the funct3 field for formats that carry one.
    pub fn funct3(self) -> Option<u8> {
        let f3 = match self {
            Mnemonic::Add | Mnemonic::Sub | Mnemonic::Mul => 0x0,
            Mnemonic::Sll => 0x1,
            Mnemonic::Slt => 0x2,
            Mnemonic::Xor | Mnemonic::Div => 0x4,
            Mnemonic::Srl | Mnemonic::Sra => 0x5,
            Mnemonic::Or | Mnemonic::Rem => 0x6,
            Mnemonic::And => 0x7,
            Mnemonic::Addi => 0x0,
            Mnemonic::Ori => 0x6,
            Mnemonic::Andi => 0x7,
            Mnemonic::Lb | Mnemonic::Sb | Mnemonic::Beq => 0x0,
            Mnemonic::Lh | Mnemonic::Sh | Mnemonic::Bne => 0x1,
            Mnemonic::Lw | Mnemonic::Sw => 0x2,
            Mnemonic::Ld | Mnemonic::Sd => 0x3,
            Mnemonic::Blt => 0x4,
            Mnemonic::Bge => 0x5,
            Mnemonic::Jalr => 0x0,
            Mnemonic::Jal | Mnemonic::Lui | Mnemonic::Auipc | Mnemonic::Unknown => return None,
        };
        Some(f3)
    }

    /// Returns the funct7 field for R-type mnemonics.
    pub fn funct7(self) -> Option<u8> {
        match self {
            Mnemonic::Sub | Mnemonic::Sra => Some(FUNCT7_ALT),
            Mnemonic::Mul | Mnemonic::Div | Mnemonic::Rem => Some(FUNCT7_MULDIV),
            m if m.format() == Format::R => Some(FUNCT7_BASE),
            _ => None,
        }
    }

    /// Reverse lookup from raw fields.
    ///
    /// `funct7` is only consulted for register-register opcodes.
    pub fn from_fields(opcode: u8, funct3: u8, funct7: u8) -> Mnemonic {
        match opcode {
            OP_REG => match (funct3, funct7) {
                (0x0, FUNCT7_BASE) => Mnemonic::Add,
                (0x0, FUNCT7_ALT) => Mnemonic::Sub,
                (0x0, FUNCT7_MULDIV) => Mnemonic::Mul,
                (0x1, FUNCT7_BASE) => Mnemonic::Sll,
                (0x2, FUNCT7_BASE) => Mnemonic::Slt,
                (0x4, FUNCT7_BASE) => Mnemonic::Xor,
                (0x4, FUNCT7_MULDIV) => Mnemonic::Div,
                (0x5, FUNCT7_BASE) => Mnemonic::Srl,
                (0x5, FUNCT7_ALT) => Mnemonic::Sra,
                (0x6, FUNCT7_BASE) => Mnemonic::Or,
                (0x6, FUNCT7_MULDIV) => Mnemonic::Rem,
                (0x7, FUNCT7_BASE) => Mnemonic::And,
                _ => Mnemonic::Unknown,
            },
            OP_IMM => match funct3 {
                0x0 => Mnemonic::Addi,
                0x6 => Mnemonic::Ori,
                0x7 => Mnemonic::Andi,
                _ => Mnemonic::Unknown,
            },
            OP_LOAD => match funct3 {
                0x0 => Mnemonic::Lb,
                0x1 => Mnemonic::Lh,
                0x2 => Mnemonic::Lw,
                0x3 => Mnemonic::Ld,
                _ => Mnemonic::Unknown,
            },
            OP_STORE => match funct3 {
                0x0 => Mnemonic::Sb,
                0x1 => Mnemonic::Sh,
                0x2 => Mnemonic::Sw,
                0x3 => Mnemonic::Sd,
                _ => Mnemonic::Unknown,
            },
            OP_BRANCH => match funct3 {
                0x0 => Mnemonic::Beq,
                0x1 => Mnemonic::Bne,
                0x4 => Mnemonic::Blt,
                0x5 => Mnemonic::Bge,
                _ => Mnemonic::Unknown,
            },
            OP_JALR if funct3 == 0 => Mnemonic::Jalr,
            OP_JAL => Mnemonic::Jal,
            OP_LUI => Mnemonic::Lui,
            OP_AUIPC => Mnemonic::Auipc,
            _ => Mnemonic::Unknown,
        }
    }

    /// Lower-case assembly spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Add => "add",
            Mnemonic::Sub => "sub",
            Mnemonic::And => "and",
            Mnemonic::Or => "or",
            Mnemonic::Xor => "xor",
            Mnemonic::Sll => "sll",
            Mnemonic::Slt => "slt",
            Mnemonic::Srl => "srl",
            Mnemonic::Sra => "sra",
            Mnemonic::Mul => "mul",
            Mnemonic::Div => "div",
            Mnemonic::Rem => "rem",
            Mnemonic::Addi => "addi",
            Mnemonic::Andi => "andi",
            Mnemonic::Ori => "ori",
            Mnemonic::Lb => "lb",
            Mnemonic::Lh => "lh",
            Mnemonic::Lw => "lw",
            Mnemonic::Ld => "ld",
            Mnemonic::Sb => "sb",
            Mnemonic::Sh => "sh",
            Mnemonic::Sw => "sw",
            Mnemonic::Sd => "sd",
            Mnemonic::Beq => "beq",
            Mnemonic::Bne => "bne",
            Mnemonic::Blt => "blt",
            Mnemonic::Bge => "bge",
            Mnemonic::Jalr => "jalr",
            Mnemonic::Jal => "jal",
            Mnemonic::Lui => "lui",
            Mnemonic::Auipc => "auipc",
            Mnemonic::Unknown => "unknown",
        }
    }
}

impl FromStr for Mnemonic {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Mnemonic::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == lower)
            .ok_or_else(|| ParseError::UnknownMnemonic(s.to_string()))
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
