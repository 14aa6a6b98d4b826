//! Load/Store Unit (LSU).
//!
//! Width-aware access to [`DataMemory`]. Loads sign-extend from the access
//! width; stores truncate to it. Byte order is little-endian.

use crate::core::pipeline::signals::MemWidth;
use crate::isa::immediate::sign_extend;
use crate::soc::DataMemory;

/// Load/Store Unit.
pub struct Lsu;

impl Lsu {
    /// Loads a value and sign-extends it to 64 bits.
    ///
    /// # Arguments
    ///
    /// * `mem` - Data memory
    /// * `addr` - Effective address
    /// * `width` - Access width; [`MemWidth::Nop`] reads zero
    pub fn load(mem: &DataMemory, addr: u64, width: MemWidth) -> i64 {
        let bytes = width.bytes();
        if bytes == 0 {
            return 0;
        }
        let raw = mem.read_le(addr, bytes);
        sign_extend(raw, (bytes * 8) as u32)
    }

    /// Stores the low `width` bytes of `value`.
    pub fn store(mem: &mut DataMemory, addr: u64, width: MemWidth, value: i64) {
        mem.write_le(addr, width.bytes(), value as u64);
    }
}
