//! RISC-V General-Purpose Register File.
//!
//! 32 signed 64-bit registers. Register x0 is hardwired to zero: it always
//! reads as zero and writes to it are discarded.

use std::fmt;

use crate::common::constants::REGISTER_COUNT;
use crate::isa::abi;

/// General-Purpose Register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gpr {
    regs: [i64; REGISTER_COUNT],
}

impl Gpr {
    /// Creates a register file with all registers set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31)
    ///
    /// # Returns
    ///
    /// The register value. x0 and out-of-range indices read as 0.
    pub fn read(&self, idx: usize) -> i64 {
        if idx == 0 {
            0
        } else {
            self.regs.get(idx).copied().unwrap_or(0)
        }
    }

    /// Writes a register. Writes to x0 are silently ignored.
    pub fn write(&mut self, idx: usize, val: i64) {
        if idx != 0 && idx < REGISTER_COUNT {
            self.regs[idx] = val;
        }
    }
}

impl fmt::Display for Gpr {
    /// One register per line: `x5 (t0) = 0x000000000000002a`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..REGISTER_COUNT {
            writeln!(
                f,
                "x{:<2} ({:>4}) = {:#018x}",
                i,
                abi::abi_name(i),
                self.read(i) as u64
            )?;
        }
        Ok(())
    }
}
