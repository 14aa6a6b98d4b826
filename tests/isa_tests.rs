//! Integration tests for ISA encoding, decoding and field tables.

use rvpipe::asm::SymbolTable;
use rvpipe::common::error::ParseError;
use rvpipe::isa::abi;
use rvpipe::isa::encoder::encode;
use rvpipe::isa::immediate::{encode_offset, encode_signed, encode_upper, parse_literal};
use rvpipe::isa::instruction::InstructionBits;
use rvpipe::isa::*;

fn enc(text: &str) -> Result<u32, ParseError> {
    encode_line(text, 0, &SymbolTable::new())
        .map(|e| e.word)
        .map_err(|e| e.source)
}

/// Builds a representative, in-range instruction for each mnemonic.
fn sample(m: Mnemonic) -> Instruction {
    match m.format() {
        Format::R => Instruction::r_type(m, 3, 1, 2),
        Format::I | Format::Load => Instruction::i_type(m, 5, 6, -12),
        Format::S => Instruction::s_type(m, 7, 8, 40),
        Format::B => Instruction::s_type(m, 9, 10, -16),
        Format::U => Instruction::u_type(m, 11, 0x12345 << 12),
        Format::J => Instruction::u_type(m, 1, 2048),
        Format::Unknown => Instruction::unknown(0),
    }
}

/// Tests instruction opcode extraction.
#[test]
fn test_instruction_bits_opcode() {
    let inst = 0x0000_8067u32;
    assert_eq!(inst.opcode(), 0x67);
}

/// Tests register field extraction.
#[test]
fn test_instruction_bits_registers() {
    let inst = 0x0020_81b3u32; // add x3, x1, x2
    assert_eq!(inst.rd(), 3);
    assert_eq!(inst.rs1(), 1);
    assert_eq!(inst.rs2(), 2);
    assert_eq!(inst.funct3(), 0);
    assert_eq!(inst.funct7(), 0);
}

/// Tests the funct7 distinction between ADD, SUB and MUL.
#[test]
fn test_funct7_variants() {
    assert_eq!(enc("add x1, x2, x3").map(|w| w.funct7()), Ok(0x00));
    assert_eq!(enc("sub x1, x2, x3").map(|w| w.funct7()), Ok(0x20));
    assert_eq!(enc("mul x1, x2, x3").map(|w| w.funct7()), Ok(0x01));
    assert_eq!(decode(0x4020_8133).mnemonic, Mnemonic::Sub);
}

/// Tests known encodings produced by a reference assembler.
#[test]
fn test_encode_known_words() {
    assert_eq!(enc("addi x1, x0, 5"), Ok(0x0050_0093));
    assert_eq!(enc("sw x2, 8(x1)"), Ok(0x0020_a423));
    assert_eq!(enc("lui x1, 0x12345"), Ok(0x1234_50b7));
    assert_eq!(enc("jal x0, 8"), Ok(0x0080_006f));
    assert_eq!(enc("jalr x0, 0(ra)"), Ok(0x0000_8067));
    assert_eq!(enc("ld a0, 16(sp)"), Ok(0x0101_3503));
}

/// Tests decoding of every immediate layout, including negative values.
#[test]
fn test_decode_immediates() {
    assert_eq!(decode(0xfff0_0093).imm, Some(-1), "I-type -1");
    assert_eq!(decode(0xfe20_ae23).imm, Some(-4), "S-type -4");
    assert_eq!(decode(0xfe00_0ee3).imm, Some(-4), "B-type -4");
    assert_eq!(decode(0x0080_006f).imm, Some(8), "J-type 8");
    assert_eq!(decode(0x8000_00b7).imm, Some(-0x8000_0000), "U-type sign bit");
}

/// Tests that unsupported words decode to an unknown placeholder.
#[test]
fn test_decode_unknown() {
    let inst = decode(0x0000_0000);
    assert_eq!(inst.mnemonic, Mnemonic::Unknown);
    assert_eq!(decode(0x0000_707f).mnemonic, Mnemonic::Unknown);
}

/// Tests that every supported mnemonic survives encode then decode.
#[test]
fn test_every_mnemonic_round_trips() {
    for m in Mnemonic::ALL {
        let inst = sample(m);
        let word = encode(&inst).unwrap_or_else(|e| panic!("{m} failed to encode: {e}"));
        assert_eq!(decode(word), inst, "round trip of {m} via {word:#010x}");
    }
}

/// Tests the signed 12-bit immediate boundaries.
#[test]
fn test_imm12_range() {
    assert!(enc("addi x1, x0, 2047").is_ok());
    assert!(enc("addi x1, x0, -2048").is_ok());
    assert_eq!(
        enc("addi x1, x0, 2048"),
        Err(ParseError::ImmediateOutOfRange { value: 2048, bits: 12 })
    );
    assert!(enc("addi x1, x0, -2049").is_err());
    assert!(enc("sd x1, 2048(x2)").is_err());
}

/// Tests branch and jump offset checks.
#[test]
fn test_offset_checks() {
    assert_eq!(enc("beq x1, x2, 6"), Err(ParseError::MisalignedTarget(6)));
    assert!(enc("beq x1, x2, 4096").is_err(), "13-bit branch range");
    assert!(enc("beq x1, x2, -4096").is_ok());
    assert!(enc("jal x1, 1048572").is_ok());
    assert!(enc("jal x1, 1048576").is_err(), "21-bit jump range");
    assert_eq!(encode_offset(-8, 13), Ok(0x1ff8));
}

/// Tests upper immediates accept only 20 unsigned bits.
#[test]
fn test_upper_range() {
    assert_eq!(encode_upper(0xfffff), Ok(0xffff_f000));
    assert!(encode_upper(0x10_0000).is_err());
    assert!(encode_upper(-1).is_err());
    assert_eq!(encode_signed(-2048, 12), Ok(0x800));
}

/// Tests every literal form.
#[test]
fn test_parse_literal_forms() {
    assert_eq!(parse_literal("0"), Ok(0));
    assert_eq!(parse_literal("0x1F"), Ok(31));
    assert_eq!(parse_literal("0101"), Ok(5), "leading zero is binary");
    assert_eq!(parse_literal("-42"), Ok(-42));
    assert_eq!(parse_literal("42"), Ok(42));
    assert_eq!(parse_literal("a"), Ok(97), "character literal is an ASCII sum");
    assert!(parse_literal("0x123456789").is_err());
    assert!(parse_literal("0102").is_err());
    assert!(parse_literal("4294967297").is_err());
}

/// Tests register names.
#[test]
fn test_register_names() {
    assert_eq!(abi::register_index("x0"), Some(0));
    assert_eq!(abi::register_index("x31"), Some(31));
    assert_eq!(abi::register_index("sp"), Some(2));
    assert_eq!(abi::register_index("fp"), Some(8));
    assert_eq!(abi::register_index("s0"), Some(8));
    assert_eq!(abi::register_index("a7"), Some(17));
    assert_eq!(abi::register_index("x32"), None);
    assert_eq!(abi::register_index("x05"), None);
    assert_eq!(enc("add x1, x2, q9"), Err(ParseError::InvalidRegister("q9".into())));
}

/// Tests the field summary used in listings.
#[test]
fn test_field_summary() {
    let inst = decode(0x0050_0093);
    assert_eq!(
        inst.field_summary(),
        "0010011-000-NULL-00001-00000-NULL-000000000101"
    );
}

/// Tests operand count and mnemonic errors.
#[test]
fn test_malformed_lines() {
    assert!(matches!(enc("add x1, x2"), Err(ParseError::OperandCount { expected: 3, found: 2, .. })));
    assert_eq!(enc("frob x1"), Err(ParseError::UnknownMnemonic("frob".into())));
    assert_eq!(enc("beq x1, x2, nowhere"), Err(ParseError::UnresolvedSymbol("nowhere".into())));
}
