//! Machine-code listing renderer.
//!
//! The listing is the hand-off format between the assembler and the
//! simulator loader:
//!
//! ```text
//! 0x0 , 0x00500093 addi x1, x0, 5 # 0010011-000-NULL-00001-00000-NULL-000000000101
//!
//!
//! ****...
//! Data Segment
//! 0x10000000   05 00 00 00
//! ```

use std::fmt::Write as _;

use crate::asm::Assembly;
use crate::isa::EncodedInstruction;

/// Line that introduces the data section.
pub const DATA_SEGMENT_MARKER: &str = "Data Segment";

/// Width of the separator line printed before the data section.
const SEPARATOR_WIDTH: usize = 95;

/// Formats one instruction line.
pub fn instruction_line(enc: &EncodedInstruction) -> String {
    format!(
        "0x{:x} , 0x{:08X} {} # {}",
        enc.address,
        enc.word,
        enc.text,
        enc.summary()
    )
}

/// Renders a complete listing. Failed lines are omitted.
pub fn render(assembly: &Assembly) -> String {
    let mut out = String::new();
    for enc in assembly.instructions() {
        let _ = writeln!(out, "{}", instruction_line(enc));
    }
    out.push_str("\n\n");
    let _ = writeln!(out, "{}", "*".repeat(SEPARATOR_WIDTH));
    let _ = writeln!(out, "{DATA_SEGMENT_MARKER}");
    out.push_str(&assembly.data.word_dump());
    out
}
