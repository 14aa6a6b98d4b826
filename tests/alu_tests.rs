//! Unit tests for ALU operations.

use rvpipe::core::pipeline::signals::AluOp;
use rvpipe::core::units::alu::Alu;

/// Tests 64-bit addition, including wraparound.
#[test]
fn test_alu_add() {
    assert_eq!(Alu::execute(AluOp::Add, 10, 20), 30);
    assert_eq!(Alu::execute(AluOp::Add, -1, 1), 0);
    assert_eq!(Alu::execute(AluOp::Add, i64::MAX, 1), i64::MIN);
}

/// Tests subtraction.
#[test]
fn test_alu_sub() {
    assert_eq!(Alu::execute(AluOp::Sub, 30, 10), 20);
    assert_eq!(Alu::execute(AluOp::Sub, 0, 1), -1);
}

/// Tests bitwise operations.
#[test]
fn test_alu_logic() {
    assert_eq!(Alu::execute(AluOp::And, 0b1100, 0b1010), 0b1000);
    assert_eq!(Alu::execute(AluOp::Or, 0b1100, 0b1010), 0b1110);
    assert_eq!(Alu::execute(AluOp::Xor, 0b1100, 0b1010), 0b0110);
}

/// Tests that shift amounts only use the low five bits.
#[test]
fn test_alu_shift_amount_masked() {
    assert_eq!(Alu::execute(AluOp::Sll, 1, 3), 8);
    assert_eq!(Alu::execute(AluOp::Sll, 1, 32 + 3), 8);
    assert_eq!(Alu::execute(AluOp::Srl, 16, 2), 4);
}

/// Tests logical versus arithmetic right shifts of a negative value.
#[test]
fn test_alu_srl_vs_sra() {
    assert_eq!(Alu::execute(AluOp::Sra, -16, 2), -4);
    assert_eq!(
        Alu::execute(AluOp::Srl, -16, 2),
        ((-16i64 as u64) >> 2) as i64
    );
}

/// Tests signed less-than.
#[test]
fn test_alu_slt() {
    assert_eq!(Alu::execute(AluOp::Slt, -1, 0), 1);
    assert_eq!(Alu::execute(AluOp::Slt, 0, -1), 0);
    assert_eq!(Alu::execute(AluOp::Slt, 5, 5), 0);
}

/// Tests multiplication and signed division.
#[test]
fn test_alu_muldiv() {
    assert_eq!(Alu::execute(AluOp::Mul, 6, -7), -42);
    assert_eq!(Alu::execute(AluOp::Div, -7, 2), -3);
    assert_eq!(Alu::execute(AluOp::Rem, -7, 2), -1);
}

/// Tests that division by zero does not trap.
#[test]
fn test_alu_div_by_zero() {
    assert_eq!(Alu::execute(AluOp::Div, 42, 0), -1, "DIV by zero yields -1");
    assert_eq!(Alu::execute(AluOp::Rem, 42, 0), 42, "REM by zero yields the dividend");
}

/// Tests the one overflowing division case.
#[test]
fn test_alu_div_overflow() {
    assert_eq!(Alu::execute(AluOp::Div, i64::MIN, -1), i64::MIN);
    assert_eq!(Alu::execute(AluOp::Rem, i64::MIN, -1), 0);
}
