//! Two-pass assembler.
//!
//! Pass one walks the source, binds every label to its address and lays out
//! the data segment. Pass two walks the text section again and encodes each
//! instruction now that forward references resolve. A line that fails to
//! encode is reported and skipped; it still occupies its 4-byte slot so the
//! addresses of later instructions match what pass one recorded.

/// Data-segment directives.
pub mod directives;

/// Listing renderer.
pub mod listing;

/// Label table.
pub mod symbols;

use crate::common::constants::{DATA_BASE, INSTRUCTION_BYTES, TEXT_BASE};
use crate::common::error::EncodeError;
use crate::isa::encoder::{encode_line, EncodedInstruction};
use crate::soc::DataMemory;

pub use directives::DataSegment;
pub use symbols::SymbolTable;

use symbols::{split_label, strip_comment};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Text,
    Data,
}

/// Result of assembling one source file.
#[derive(Clone, Debug)]
pub struct Assembly {
    /// One entry per text-section instruction line, in source order.
    pub lines: Vec<Result<EncodedInstruction, EncodeError>>,
    /// Data directive lines that could not be laid out.
    pub data_errors: Vec<EncodeError>,
    /// Labels from both sections.
    pub symbols: SymbolTable,
    /// Initial data memory.
    pub data: DataMemory,
}

impl Assembly {
    /// Successfully encoded instructions.
    pub fn instructions(&self) -> impl Iterator<Item = &EncodedInstruction> {
        self.lines.iter().filter_map(|l| l.as_ref().ok())
    }

    /// Every failed line, text section first.
    pub fn errors(&self) -> impl Iterator<Item = &EncodeError> {
        self.lines
            .iter()
            .filter_map(|l| l.as_ref().err())
            .chain(self.data_errors.iter())
    }

    /// Returns `true` if every line assembled.
    pub fn is_clean(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Assembler with configurable segment bases.
#[derive(Clone, Copy, Debug)]
pub struct Assembler {
    text_base: u64,
    data_base: u64,
}

impl Default for Assembler {
    fn default() -> Self {
        Self {
            text_base: TEXT_BASE,
            data_base: DATA_BASE,
        }
    }
}

impl Assembler {
    /// Creates an assembler using the default segment bases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the text and data segment bases.
    pub fn with_bases(text_base: u64, data_base: u64) -> Self {
        Self {
            text_base,
            data_base,
        }
    }

    /// Assembles a complete source file.
    pub fn assemble(&self, source: &str) -> Assembly {
        let (symbols, data, data_errors) = self.first_pass(source);
        for (label, addr) in symbols.iter_sorted() {
            tracing::trace!(label, "symbol at {addr:#x}");
        }
        let lines = self.second_pass(source, &symbols);

        let failed = lines.iter().filter(|l| l.is_err()).count() + data_errors.len();
        tracing::debug!(
            instructions = lines.len() - lines.iter().filter(|l| l.is_err()).count(),
            labels = symbols.len(),
            data_bytes = data.size(),
            failed,
            "assembly finished"
        );

        Assembly {
            lines,
            data_errors,
            symbols,
            data: data.into_memory(),
        }
    }

    fn first_pass(&self, source: &str) -> (SymbolTable, DataSegment, Vec<EncodeError>) {
        let mut symbols = SymbolTable::new();
        let mut data = DataSegment::new(self.data_base);
        let mut data_errors = Vec::new();
        let mut ip = self.text_base;

        for (section, line) in SectionWalker::new(source) {
            match section {
                Section::Data => {
                    if let Err(e) = data.assemble_line(line, &mut symbols) {
                        tracing::warn!(line = %e.line, error = %e.source, "data directive failed");
                        data_errors.push(e);
                    }
                }
                Section::Text => {
                    let (label, rest) = split_label(line);
                    if let Some(label) = label {
                        if symbols.define(label, ip).is_some() {
                            tracing::warn!(label, "text label redefined");
                        }
                    }
                    if is_instruction(rest) {
                        ip += INSTRUCTION_BYTES;
                    }
                }
            }
        }
        (symbols, data, data_errors)
    }

    fn second_pass(
        &self,
        source: &str,
        symbols: &SymbolTable,
    ) -> Vec<Result<EncodedInstruction, EncodeError>> {
        let mut lines = Vec::new();
        let mut ip = self.text_base;

        for (section, line) in SectionWalker::new(source) {
            if section != Section::Text {
                continue;
            }
            let (_, rest) = split_label(line);
            if !is_instruction(rest) {
                continue;
            }
            let encoded = encode_line(rest, ip, symbols);
            if let Err(e) = &encoded {
                tracing::warn!(address = ip, error = %e.source, "{e}");
            }
            lines.push(encoded);
            ip += INSTRUCTION_BYTES;
        }
        lines
    }
}

/// Assembles `source` with the default segment bases.
pub fn assemble(source: &str) -> Assembly {
    Assembler::new().assemble(source)
}

/// Text-section lines that are directives (other than section switches)
/// are ignored and do not consume an address.
fn is_instruction(rest: &str) -> bool {
    if rest.is_empty() {
        return false;
    }
    if rest.starts_with('.') {
        tracing::debug!(directive = rest, "ignoring directive in text section");
        return false;
    }
    true
}

/// Yields non-empty, comment-stripped lines tagged with their section.
struct SectionWalker<'a> {
    lines: std::str::Lines<'a>,
    section: Section,
}

impl<'a> SectionWalker<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines(),
            section: Section::Text,
        }
    }
}

impl<'a> Iterator for SectionWalker<'a> {
    type Item = (Section, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        for raw in self.lines.by_ref() {
            let line = strip_comment(raw).trim();
            match line {
                "" => continue,
                ".data" => self.section = Section::Data,
                ".text" => self.section = Section::Text,
                _ => return Some((self.section, line)),
            }
        }
        None
    }
}
