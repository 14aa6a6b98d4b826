//! Arithmetic Logic Unit (ALU).
//!
//! Integer arithmetic, logic, shifts, comparison and the M-extension subset
//! used by the Execute stage. Division by zero never traps: DIV yields -1 and
//! REM yields the dividend.

use crate::common::constants::DIV_BY_ZERO_RESULT;
use crate::core::pipeline::signals::AluOp;

/// Bit mask for the shift amount.
const SHAMT_MASK: i64 = 0x1f;

/// Arithmetic Logic Unit for integer operations.
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The ALU operation to perform
    /// * `a` - First operand
    /// * `b` - Second operand, also used as the shift amount
    ///
    /// # Returns
    ///
    /// The 64-bit result. Overflow wraps.
    pub fn execute(op: AluOp, a: i64, b: i64) -> i64 {
        let sh = (b & SHAMT_MASK) as u32;
        match op {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Sub => a.wrapping_sub(b),
            AluOp::And => a & b,
            AluOp::Or => a | b,
            AluOp::Xor => a ^ b,
            AluOp::Sll => a.wrapping_shl(sh),
            AluOp::Srl => ((a as u64) >> sh) as i64,
            AluOp::Sra => a >> sh,
            AluOp::Slt => i64::from(a < b),
            AluOp::Mul => a.wrapping_mul(b),
            AluOp::Div => {
                if b == 0 {
                    DIV_BY_ZERO_RESULT
                } else {
                    a.wrapping_div(b)
                }
            }
            AluOp::Rem => {
                if b == 0 {
                    a
                } else {
                    a.wrapping_rem(b)
                }
            }
        }
    }
}
