//! Pipeline Latches.
//!
//! The four inter-stage registers. Each holds at most one instruction; an
//! empty latch (`entry == None`) is a bubble. Every entry carries the fetch
//! sequence number so a single instruction can be followed through the
//! pipeline.

use std::fmt;

use crate::core::pipeline::signals::ControlSignals;
use crate::core::pipeline::traits::PipelineLatch;
use crate::isa::instruction::Instruction;

/// IF/ID contents: the raw fetched word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IfIdEntry {
    /// Fetch sequence number.
    pub seq: u64,
    /// Program counter of the instruction.
    pub pc: u64,
    /// The raw 32-bit instruction word.
    pub inst: u32,
    /// Whether Fetch redirected to a predicted target.
    pub pred_taken: bool,
    /// The address Fetch continued from.
    pub pred_target: u64,
}

/// ID/EX contents: decoded instruction and register operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdExEntry {
    /// Fetch sequence number.
    pub seq: u64,
    /// Program counter of the instruction.
    pub pc: u64,
    /// The decoded instruction.
    pub inst: Instruction,
    /// Control signals for the remaining stages.
    pub ctrl: ControlSignals,
    /// Value of `rs1` read in Decode.
    pub rv1: i64,
    /// Value of `rs2` read in Decode.
    pub rv2: i64,
    /// Whether Fetch redirected to a predicted target.
    pub pred_taken: bool,
    /// The address Fetch continued from.
    pub pred_target: u64,
}

/// EX/MEM contents: ALU result and resolved control flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExMemEntry {
    /// Fetch sequence number.
    pub seq: u64,
    /// Program counter of the instruction.
    pub pc: u64,
    /// The decoded instruction.
    pub inst: Instruction,
    /// Control signals for the remaining stages.
    pub ctrl: ControlSignals,
    /// ALU result, effective address, or link address for jumps.
    pub alu: i64,
    /// Value to store for store instructions.
    pub store_data: i64,
    /// Resolved branch/jump direction.
    pub taken: bool,
    /// Resolved target when taken.
    pub target: u64,
    /// Direction predicted at fetch.
    pub pred_taken: bool,
    /// Address Fetch continued from.
    pub pred_target: u64,
}

/// MEM/WB contents: the value to commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemWbEntry {
    /// Fetch sequence number.
    pub seq: u64,
    /// Program counter of the instruction.
    pub pc: u64,
    /// The decoded instruction.
    pub inst: Instruction,
    /// Control signals for writeback.
    pub ctrl: ControlSignals,
    /// ALU result carried from Execute.
    pub alu: i64,
    /// Loaded value for loads.
    pub load_data: Option<i64>,
    /// Final writeback value.
    pub wb: i64,
}

/// IF/ID latch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IfId {
    pub entry: Option<IfIdEntry>,
}

/// ID/EX latch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdEx {
    pub entry: Option<IdExEntry>,
}

/// EX/MEM latch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExMem {
    pub entry: Option<ExMemEntry>,
}

/// MEM/WB latch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemWb {
    pub entry: Option<MemWbEntry>,
}

macro_rules! impl_latch {
    ($latch:ty) => {
        impl PipelineLatch for $latch {
            fn flush(&mut self) {
                self.entry = None;
            }

            fn is_empty(&self) -> bool {
                self.entry.is_none()
            }

            fn pc(&self) -> Option<u64> {
                self.entry.as_ref().map(|e| e.pc)
            }

            fn seq(&self) -> Option<u64> {
                self.entry.as_ref().map(|e| e.seq)
            }
        }
    };
}

impl_latch!(IfId);
impl_latch!(IdEx);
impl_latch!(ExMem);
impl_latch!(MemWb);

impl fmt::Display for IfId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry {
            None => write!(f, "IF/ID  : bubble"),
            Some(e) => write!(
                f,
                "IF/ID  : pc={:#x} inst={:#010x} pred_taken={} pred_target={:#x}",
                e.pc, e.inst, e.pred_taken, e.pred_target
            ),
        }
    }
}

impl fmt::Display for IdEx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry {
            None => write!(f, "ID/EX  : bubble"),
            Some(e) => write!(
                f,
                "ID/EX  : pc={:#x} {} rv1={} rv2={}",
                e.pc, e.inst, e.rv1, e.rv2
            ),
        }
    }
}

impl fmt::Display for ExMem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry {
            None => write!(f, "EX/MEM : bubble"),
            Some(e) => write!(
                f,
                "EX/MEM : pc={:#x} {} alu={} store={} taken={} target={:#x}",
                e.pc, e.inst, e.alu, e.store_data, e.taken, e.target
            ),
        }
    }
}

impl fmt::Display for MemWb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry {
            None => write!(f, "MEM/WB : bubble"),
            Some(e) => write!(f, "MEM/WB : pc={:#x} {} wb={}", e.pc, e.inst, e.wb),
        }
    }
}
