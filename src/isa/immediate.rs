//! Literal parsing and immediate range checking.
//!
//! Every routine returns a typed [`ParseError`] on failure; there are no
//! sentinel strings or silent defaults.

use crate::common::error::ParseError;

/// Largest literal magnitude accepted for decimal forms.
const MAX_DECIMAL_MAGNITUDE: u64 = 1 << 32;
/// Maximum hex digits after the `0x` prefix.
const MAX_HEX_DIGITS: usize = 8;
/// Maximum binary digits after the leading `0`.
const MAX_BINARY_DIGITS: usize = 32;

/// Parses a numeric literal.
///
/// Accepted forms:
///
/// * `0` is zero.
/// * `0x1F` is hexadecimal, at most 8 digits.
/// * `0101` (leading zero) is binary, at most 32 digits.
/// * `-42` is a negated decimal magnitude of at most 2^32.
/// * A token starting with a non-digit is the sum of its ASCII codes, which
///   is how character literals such as `'a'` are written.
/// * Anything else is plain decimal.
pub fn parse_literal(text: &str) -> Result<i64, ParseError> {
    let text = text.trim();
    let invalid = || ParseError::InvalidLiteral(text.to_string());

    let first = text.chars().next().ok_or_else(invalid)?;
    if text == "0" {
        return Ok(0);
    }

    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if hex.is_empty() || hex.len() > MAX_HEX_DIGITS {
            return Err(invalid());
        }
        return u32::from_str_radix(hex, 16)
            .map(i64::from)
            .map_err(|_| invalid());
    }

    if let Some(bits) = text.strip_prefix('0') {
        if bits.len() > MAX_BINARY_DIGITS || !bits.bytes().all(|b| b == b'0' || b == b'1') {
            return Err(invalid());
        }
        return u64::from_str_radix(bits, 2)
            .map(|v| v as i64)
            .map_err(|_| invalid());
    }

    if let Some(magnitude) = text.strip_prefix('-') {
        let magnitude = parse_decimal(magnitude).ok_or_else(invalid)?;
        return Ok(-(magnitude as i64));
    }

    if !first.is_ascii_digit() {
        return Ok(text.bytes().map(i64::from).sum());
    }

    parse_decimal(text).map(|v| v as i64).ok_or_else(invalid)
}

fn parse_decimal(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits
        .parse::<u64>()
        .ok()
        .filter(|&v| v <= MAX_DECIMAL_MAGNITUDE)
}

/// Checks that `value` fits a signed `bits`-wide field and returns its
/// two's-complement encoding in the low `bits` bits.
///
/// # Examples
///
/// ```
/// use rvpipe::isa::immediate::encode_signed;
///
/// assert_eq!(encode_signed(-1, 12), Ok(0xfff));
/// assert!(encode_signed(2048, 12).is_err());
/// ```
pub fn encode_signed(value: i64, bits: u32) -> Result<u32, ParseError> {
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << (bits - 1)) - 1;
    if value < min || value > max {
        return Err(ParseError::ImmediateOutOfRange { value, bits });
    }
    Ok((value as u32) & low_mask(bits))
}

/// Checks a PC-relative branch or jump offset.
///
/// The offset must be a multiple of 4 and fit in `bits` signed bits.
pub fn encode_offset(offset: i64, bits: u32) -> Result<u32, ParseError> {
    if offset % 4 != 0 {
        return Err(ParseError::MisalignedTarget(offset));
    }
    encode_signed(offset, bits)
}

/// Encodes a U-type immediate.
///
/// The value must fit in 20 unsigned bits. The result is the value shifted
/// into bits 31:12, ready to be OR-ed into an instruction word.
pub fn encode_upper(value: i64) -> Result<u32, ParseError> {
    if !(0..=0xf_ffff).contains(&value) {
        return Err(ParseError::UpperImmediateOutOfRange(value));
    }
    Ok(((value as u32) << 12) & 0xffff_f000)
}

/// Sign-extends the low `bits` bits of `value`.
pub fn sign_extend(value: u64, bits: u32) -> i64 {
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

fn low_mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}
