//! Data-segment directives.
//!
//! Lays out `.byte`, `.half`, `.word`, `.dword` and `.asciiz` values at a
//! moving cursor, little-endian, and binds any leading label to the cursor.

use crate::asm::symbols::{split_label, SymbolTable};
use crate::common::error::{EncodeError, ParseError};
use crate::isa::encoder::tokenize;
use crate::isa::immediate::parse_literal;
use crate::soc::DataMemory;

/// Initial data memory image under construction.
#[derive(Clone, Debug)]
pub struct DataSegment {
    base: u64,
    cursor: u64,
    memory: DataMemory,
}

impl DataSegment {
    /// Starts an empty segment at `base`.
    pub fn new(base: u64) -> Self {
        Self {
            base,
            cursor: base,
            memory: DataMemory::new(),
        }
    }

    /// Number of bytes laid out so far.
    pub fn size(&self) -> u64 {
        self.cursor - self.base
    }

    /// Consumes the segment, returning its bytes.
    pub fn into_memory(self) -> DataMemory {
        self.memory
    }

    /// Processes one line from a `.data` section.
    ///
    /// A failed line leaves the cursor where it was, so later labels are not
    /// shifted by partially written values.
    pub fn assemble_line(&mut self, line: &str, symbols: &mut SymbolTable) -> Result<(), EncodeError> {
        let (label, rest) = split_label(line);
        if let Some(label) = label {
            if symbols.define(label, self.cursor).is_some() {
                tracing::warn!(label, "data label redefined");
            }
        }
        if rest.is_empty() {
            return Ok(());
        }
        let bytes = directive_bytes(rest).map_err(|source| EncodeError {
            line: line.trim().to_string(),
            source,
        })?;
        self.memory.write_bytes(self.cursor, &bytes);
        self.cursor += bytes.len() as u64;
        Ok(())
    }
}

fn directive_bytes(text: &str) -> Result<Vec<u8>, ParseError> {
    let (directive, args) = text
        .split_once(char::is_whitespace)
        .map(|(d, a)| (d, a.trim()))
        .unwrap_or((text, ""));

    let width = match directive {
        ".byte" => 1,
        ".half" => 2,
        ".word" => 4,
        ".dword" => 8,
        ".asciiz" => return asciiz_bytes(args),
        _ => return Err(ParseError::InvalidDirective(text.to_string())),
    };

    let values = tokenize(args);
    if values.is_empty() {
        return Err(ParseError::InvalidDirective(text.to_string()));
    }
    let mut bytes = Vec::with_capacity(values.len() * width);
    for token in values {
        let value = parse_literal(token)? as u64;
        bytes.extend_from_slice(&value.to_le_bytes()[..width]);
    }
    Ok(bytes)
}

/// Collects every quoted string in `args`, each followed by a NUL.
fn asciiz_bytes(args: &str) -> Result<Vec<u8>, ParseError> {
    let malformed = || ParseError::InvalidDirective(format!(".asciiz {args}"));
    let mut bytes = Vec::new();
    let mut chars = args.chars();
    let mut strings = 0;

    loop {
        match chars.next() {
            None => break,
            Some(c) if c.is_whitespace() || c == ',' => continue,
            Some('"') => {}
            Some(_) => return Err(malformed()),
        }
        loop {
            match chars.next().ok_or_else(malformed)? {
                '"' => break,
                '\\' => {
                    let escaped = match chars.next().ok_or_else(malformed)? {
                        'n' => '\n',
                        't' => '\t',
                        '0' => '\0',
                        other => other,
                    };
                    push_char(&mut bytes, escaped);
                }
                c => push_char(&mut bytes, c),
            }
        }
        bytes.push(0);
        strings += 1;
    }

    if strings == 0 {
        return Err(malformed());
    }
    Ok(bytes)
}

fn push_char(bytes: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}
