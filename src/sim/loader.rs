//! Machine-code listing loader.
//!
//! Reads the listing written by [`crate::asm::listing`] back into a
//! [`ProgramImage`]. Instruction lines look like
//! `0x8 , 0x002081B3 add x3, x1, x2 # ...`; only the address and the word
//! are used. After the `Data Segment` marker each line is an address
//! followed by up to four hex bytes.

use crate::asm::listing::DATA_SEGMENT_MARKER;
use crate::common::error::LoadError;
use crate::sim::image::ProgramImage;

/// Parses a listing.
///
/// # Errors
///
/// Returns [`LoadError`] for the first malformed or unparsable line, or for
/// a misaligned instruction address.
pub fn parse_listing(listing: &str) -> Result<ProgramImage, LoadError> {
    let mut image = ProgramImage::default();
    let mut in_data = false;

    for (idx, raw) in listing.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.contains(DATA_SEGMENT_MARKER) {
            in_data = true;
            continue;
        }
        if line.is_empty() || line.contains("****") || line.starts_with("Error in encoding") {
            continue;
        }

        if in_data {
            parse_data_line(line, line_no, &mut image)?;
        } else {
            parse_text_line(line, line_no, &mut image)?;
        }
    }

    tracing::debug!(
        instructions = image.text.len(),
        data_bytes = image.data.len(),
        "listing loaded"
    );
    Ok(image)
}

fn parse_text_line(line: &str, line_no: usize, image: &mut ProgramImage) -> Result<(), LoadError> {
    let malformed = || LoadError::MalformedLine {
        line_no,
        text: line.to_string(),
    };
    let (addr, rest) = line.split_once(',').ok_or_else(malformed)?;
    let word = rest.split_whitespace().next().ok_or_else(malformed)?;

    let addr = parse_hex(addr.trim(), line_no)?;
    let word = parse_hex(word, line_no)?;
    let word = u32::try_from(word).map_err(|_| LoadError::InvalidHex {
        line_no,
        value: format!("{word:#x}"),
    })?;
    if addr % 4 != 0 {
        return Err(LoadError::MisalignedInstruction { line_no, addr });
    }
    image.text.insert(addr, word);
    Ok(())
}

fn parse_data_line(line: &str, line_no: usize, image: &mut ProgramImage) -> Result<(), LoadError> {
    let mut tokens = line.split_whitespace();
    let addr = match tokens.next() {
        Some(t) => parse_hex(t, line_no)?,
        None => return Ok(()),
    };
    for (offset, token) in tokens.enumerate() {
        let byte = parse_hex(token, line_no)?;
        let byte = u8::try_from(byte).map_err(|_| LoadError::InvalidHex {
            line_no,
            value: token.to_string(),
        })?;
        image.data.write_byte(addr + offset as u64, byte);
    }
    Ok(())
}

fn parse_hex(token: &str, line_no: usize) -> Result<u64, LoadError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u64::from_str_radix(digits, 16).map_err(|_| LoadError::InvalidHex {
        line_no,
        value: token.to_string(),
    })
}
