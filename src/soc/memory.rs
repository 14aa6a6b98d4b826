//! Sparse Data Memory.
//!
//! Byte-addressable, little-endian storage backed by an ordered map. Only
//! bytes that have been written are stored; every other address reads as
//! zero. The ordering makes dumps deterministic and lets them skip gaps.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Sparse little-endian data memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataMemory {
    bytes: BTreeMap<u64, u8>,
}

impl DataMemory {
    /// Creates an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one byte; unwritten addresses read as zero.
    pub fn read_byte(&self, addr: u64) -> u8 {
        self.bytes.get(&addr).copied().unwrap_or(0)
    }

    /// Writes one byte.
    pub fn write_byte(&mut self, addr: u64, value: u8) {
        self.bytes.insert(addr, value);
    }

    /// Reads `size` bytes starting at `addr` as a little-endian integer.
    ///
    /// # Arguments
    ///
    /// * `addr` - Address of the least significant byte
    /// * `size` - Number of bytes (1 to 8)
    ///
    /// # Returns
    ///
    /// The zero-extended value.
    pub fn read_le(&self, addr: u64, size: usize) -> u64 {
        (0..size.min(8)).fold(0u64, |acc, i| {
            acc | (u64::from(self.read_byte(addr.wrapping_add(i as u64))) << (8 * i))
        })
    }

    /// Writes the low `size` bytes of `value` starting at `addr`, least
    /// significant byte first.
    pub fn write_le(&mut self, addr: u64, size: usize, value: u64) {
        for i in 0..size.min(8) {
            self.write_byte(addr.wrapping_add(i as u64), (value >> (8 * i)) as u8);
        }
    }

    /// Copies a byte slice into memory starting at `addr`.
    pub fn write_bytes(&mut self, addr: u64, data: &[u8]) {
        for (i, &b) in data.iter().enumerate() {
            self.write_byte(addr.wrapping_add(i as u64), b);
        }
    }

    /// Number of bytes that have been written.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Iterates written bytes in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u8)> + '_ {
        self.bytes.iter().map(|(&a, &b)| (a, b))
    }

    /// Groups written bytes into aligned 4-byte words.
    ///
    /// Only words with at least one written byte appear. Bytes of a listed
    /// word that were never written are reported as zero.
    pub fn words(&self) -> Vec<(u64, [u8; 4])> {
        let mut words: Vec<(u64, [u8; 4])> = Vec::new();
        for (&addr, &byte) in &self.bytes {
            let base = addr & !0x3;
            let lane = (addr & 0x3) as usize;
            match words.last_mut() {
                Some((last, bytes)) if *last == base => bytes[lane] = byte,
                _ => {
                    let mut bytes = [0u8; 4];
                    bytes[lane] = byte;
                    words.push((base, bytes));
                }
            }
        }
        words
    }

    /// Renders [`Self::words`] one per line as `0x<addr>   BB BB BB BB`.
    pub fn word_dump(&self) -> String {
        let mut out = String::new();
        for (addr, b) in self.words() {
            let _ = writeln!(
                out,
                "0x{:08x}   {:02X} {:02X} {:02X} {:02X}",
                addr, b[0], b[1], b[2], b[3]
            );
        }
        out
    }
}
