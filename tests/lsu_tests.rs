//! Unit tests for the Load/Store Unit and data memory.

use rvpipe::core::pipeline::signals::MemWidth;
use rvpipe::core::units::lsu::Lsu;
use rvpipe::soc::DataMemory;

/// Tests that each width stores only its own bytes, little-endian.
#[test]
fn test_store_widths() {
    let mut mem = DataMemory::new();
    Lsu::store(&mut mem, 0x100, MemWidth::Double, 0x1122_3344_5566_7788);
    Lsu::store(&mut mem, 0x100, MemWidth::Byte, 0xAB);
    assert_eq!(mem.read_byte(0x100), 0xAB);
    assert_eq!(mem.read_byte(0x101), 0x77, "byte store must not touch the next byte");
    assert_eq!(mem.read_byte(0x107), 0x11);
}

/// Tests sign extension on narrow loads.
#[test]
fn test_load_sign_extends() {
    let mut mem = DataMemory::new();
    Lsu::store(&mut mem, 0x10, MemWidth::Word, 0xFFFF_FF80);
    assert_eq!(Lsu::load(&mem, 0x10, MemWidth::Byte), -128);
    assert_eq!(Lsu::load(&mem, 0x10, MemWidth::Half), -128);
    assert_eq!(Lsu::load(&mem, 0x10, MemWidth::Word), -128);
    assert_eq!(Lsu::load(&mem, 0x12, MemWidth::Half), -1);
}

/// Tests a full doubleword round trip.
#[test]
fn test_load_double() {
    let mut mem = DataMemory::new();
    Lsu::store(&mut mem, 0x40, MemWidth::Double, -2);
    assert_eq!(Lsu::load(&mem, 0x40, MemWidth::Double), -2);
}

/// Tests that unwritten memory reads as zero.
#[test]
fn test_uninitialized_reads_zero() {
    let mem = DataMemory::new();
    assert_eq!(Lsu::load(&mem, 0x1000_0000, MemWidth::Word), 0);
    assert!(mem.is_empty());
}

/// Tests the gap-tolerant word dump.
#[test]
fn test_word_dump_skips_gaps() {
    let mut mem = DataMemory::new();
    mem.write_byte(0x1000_0000, 0x05);
    mem.write_byte(0x1000_0009, 0xFF);
    let dump = mem.word_dump();
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines.len(), 2, "only touched words are dumped: {dump}");
    assert_eq!(lines[0], "0x10000000   05 00 00 00");
    assert_eq!(lines[1], "0x10000008   00 FF 00 00");
}
