//! Register names.
//!
//! Registers may be written numerically (`x0`..`x31`) or by their standard
//! ABI alias (`zero`, `ra`, `sp`, `a0`, ...). `fp` is accepted as a synonym
//! for `s0`.

/// Hardwired zero register.
pub const REG_ZERO: usize = 0;
/// Return address register.
pub const REG_RA: usize = 1;
/// Stack pointer register.
pub const REG_SP: usize = 2;
/// Frame pointer register (`s0`).
pub const REG_FP: usize = 8;

/// ABI names indexed by register number.
pub const ABI_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Resolves a register name to its index.
///
/// Numeric names must be written without leading zeros (`x5`, not `x05`).
///
/// # Returns
///
/// The register index, or `None` if the name is not a register.
pub fn register_index(name: &str) -> Option<usize> {
    if let Some(digits) = name.strip_prefix('x') {
        let canonical = !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && (digits == "0" || !digits.starts_with('0'));
        if !canonical {
            return None;
        }
        return digits.parse::<usize>().ok().filter(|&idx| idx < 32);
    }
    if name == "fp" {
        return Some(REG_FP);
    }
    ABI_NAMES.iter().position(|&abi| abi == name)
}

/// Returns the ABI alias for a register index.
pub fn abi_name(idx: usize) -> &'static str {
    ABI_NAMES.get(idx).copied().unwrap_or("?")
}
