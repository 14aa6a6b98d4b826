//! Pipeline control signals and operation types.
//!
//! Decode derives a [`ControlSignals`] bundle from the instruction's
//! [`Mnemonic`]; the later stages act on the bundle instead of re-inspecting
//! the instruction. Both the pipelined and single-cycle drivers use the same
//! derivation.

use crate::isa::opcodes::Mnemonic;

/// ALU operation types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// Integer addition.
    #[default]
    Add,
    /// Integer subtraction.
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Shift left logical.
    Sll,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Set less than (signed).
    Slt,
    /// Integer multiply (low bits).
    Mul,
    /// Integer divide (signed).
    Div,
    /// Integer remainder (signed).
    Rem,
}

/// Memory access width for load and store operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemWidth {
    /// No memory access.
    #[default]
    Nop,
    /// Byte (8 bits).
    Byte,
    /// Halfword (16 bits).
    Half,
    /// Word (32 bits).
    Word,
    /// Doubleword (64 bits).
    Double,
}

impl MemWidth {
    /// Access size in bytes.
    pub fn bytes(self) -> usize {
        match self {
            MemWidth::Nop => 0,
            MemWidth::Byte => 1,
            MemWidth::Half => 2,
            MemWidth::Word => 4,
            MemWidth::Double => 8,
        }
    }
}

/// Source selection for ALU operand A.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpASrc {
    /// Use the value from source register 1.
    #[default]
    Reg1,
    /// Use the program counter value.
    Pc,
    /// Use zero as the operand value.
    Zero,
}

/// Source selection for ALU operand B.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpBSrc {
    /// Use the immediate value from the instruction.
    #[default]
    Imm,
    /// Use the value from source register 2.
    Reg2,
}

/// Instruction-mix category used by the statistics counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstClass {
    /// Arithmetic, logic and upper-immediate instructions.
    Alu,
    /// Loads and stores.
    DataTransfer,
    /// Branches and jumps.
    Control,
    /// Unknown words.
    None,
}

/// Control signals generated by Decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlSignals {
    /// Write the result to `rd`.
    pub reg_write: bool,
    /// Read data memory.
    pub mem_read: bool,
    /// Write data memory.
    pub mem_write: bool,
    /// Conditional branch.
    pub branch: bool,
    /// Unconditional jump (`jal`, `jalr`).
    pub jump: bool,
    /// Memory access width.
    pub width: MemWidth,
    /// ALU operation.
    pub alu: AluOp,
    /// Operand A source.
    pub a_src: OpASrc,
    /// Operand B source.
    pub b_src: OpBSrc,
}

impl ControlSignals {
    /// Derives the control bundle for a mnemonic.
    ///
    /// [`Mnemonic::Unknown`] yields an inert bundle: no register write, no
    /// memory access, no control transfer.
    pub fn for_mnemonic(m: Mnemonic) -> Self {
        let rr = |alu| Self {
            reg_write: true,
            alu,
            b_src: OpBSrc::Reg2,
            ..Self::default()
        };
        let ri = |alu| Self {
            reg_write: true,
            alu,
            ..Self::default()
        };
        let load = |width| Self {
            reg_write: true,
            mem_read: true,
            width,
            ..Self::default()
        };
        let store = |width| Self {
            mem_write: true,
            width,
            ..Self::default()
        };
        let branch = Self {
            branch: true,
            alu: AluOp::Sub,
            b_src: OpBSrc::Reg2,
            ..Self::default()
        };

        match m {
            Mnemonic::Add => rr(AluOp::Add),
            Mnemonic::Sub => rr(AluOp::Sub),
            Mnemonic::And => rr(AluOp::And),
            Mnemonic::Or => rr(AluOp::Or),
            Mnemonic::Xor => rr(AluOp::Xor),
            Mnemonic::Sll => rr(AluOp::Sll),
            Mnemonic::Slt => rr(AluOp::Slt),
            Mnemonic::Srl => rr(AluOp::Srl),
            Mnemonic::Sra => rr(AluOp::Sra),
            Mnemonic::Mul => rr(AluOp::Mul),
            Mnemonic::Div => rr(AluOp::Div),
            Mnemonic::Rem => rr(AluOp::Rem),
            Mnemonic::Addi => ri(AluOp::Add),
            Mnemonic::Andi => ri(AluOp::And),
            Mnemonic::Ori => ri(AluOp::Or),
            Mnemonic::Lb => load(MemWidth::Byte),
            Mnemonic::Lh => load(MemWidth::Half),
            Mnemonic::Lw => load(MemWidth::Word),
            Mnemonic::Ld => load(MemWidth::Double),
            Mnemonic::Sb => store(MemWidth::Byte),
            Mnemonic::Sh => store(MemWidth::Half),
            Mnemonic::Sw => store(MemWidth::Word),
            Mnemonic::Sd => store(MemWidth::Double),
            Mnemonic::Beq | Mnemonic::Bne | Mnemonic::Blt | Mnemonic::Bge => branch,
            Mnemonic::Jal => Self {
                reg_write: true,
                jump: true,
                a_src: OpASrc::Pc,
                ..Self::default()
            },
            Mnemonic::Jalr => Self {
                reg_write: true,
                jump: true,
                ..Self::default()
            },
            Mnemonic::Lui => Self {
                reg_write: true,
                a_src: OpASrc::Zero,
                ..Self::default()
            },
            Mnemonic::Auipc => Self {
                reg_write: true,
                a_src: OpASrc::Pc,
                ..Self::default()
            },
            Mnemonic::Unknown => Self::default(),
        }
    }

    /// Instruction-mix category.
    pub fn class(&self) -> InstClass {
        if self.branch || self.jump {
            InstClass::Control
        } else if self.mem_read || self.mem_write {
            InstClass::DataTransfer
        } else if self.reg_write {
            InstClass::Alu
        } else {
            InstClass::None
        }
    }
}
