//! Data Hazard Detection and Forwarding.
//!
//! Detection runs at the start of every cycle on the raw word in IF/ID,
//! before it is decoded, and compares its source registers against the
//! destinations still in flight. Forwarding runs inside Execute and patches
//! the operands read in Decode with results that have not been written back.
//!
//! Writeback commits before Decode reads within a cycle, so a producer in
//! MEM/WB is reported but never needs a stall.

use crate::core::pipeline::latches::{ExMem, IdEx, IdExEntry, IfId, MemWb};
use crate::core::pipeline::signals::ControlSignals;
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::Mnemonic;

/// Where a forwarded operand came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForwardSource {
    /// No forwarding; the value read in Decode.
    RegFile,
    /// The ALU result held in EX/MEM.
    ExMem,
    /// The writeback value held in MEM/WB.
    MemWb,
}

/// Result of comparing the IF/ID instruction against in-flight producers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HazardReport {
    /// A source register is produced by the instruction in ID/EX.
    pub id_ex: bool,
    /// A source register is produced by the instruction in EX/MEM.
    pub ex_mem: bool,
    /// A source register is produced by the instruction in MEM/WB.
    pub mem_wb: bool,
    /// The ID/EX producer is a load.
    pub load_use: bool,
}

impl HazardReport {
    /// Returns `true` if any producer that has not yet committed matches.
    pub fn any(&self) -> bool {
        self.id_ex || self.ex_mem
    }

    /// Decides whether Decode must stall this cycle.
    ///
    /// With forwarding only a load-use dependency stalls; without it every
    /// dependency on an uncommitted producer does.
    pub fn needs_stall(&self, forwarding: bool) -> bool {
        if forwarding {
            self.load_use
        } else {
            self.any()
        }
    }
}

/// Extracts the source registers an undecoded word will read.
///
/// `rs1` is read by everything except `lui`, `auipc` and `jal`; `rs2` only
/// by register-register, store and branch formats. `x0` is never reported.
pub fn source_registers(word: u32) -> (Option<usize>, Option<usize>) {
    let format = Mnemonic::from_fields(word.opcode(), word.funct3(), word.funct7()).format();
    let rs1 = Some(word.rs1()).filter(|&r| format.reads_rs1() && r != 0);
    let rs2 = Some(word.rs2()).filter(|&r| format.reads_rs2() && r != 0);
    (rs1, rs2)
}

fn writes(ctrl: &ControlSignals, rd: Option<usize>) -> Option<usize> {
    rd.filter(|&r| ctrl.reg_write && r != 0)
}

/// Compares the IF/ID instruction against every downstream latch.
///
/// # Arguments
///
/// * `if_id` - The latch holding the instruction about to be decoded
/// * `id_ex` - The instruction about to execute
/// * `ex_mem` - The instruction about to access memory
/// * `mem_wb` - The instruction about to write back
pub fn detect(if_id: &IfId, id_ex: &IdEx, ex_mem: &ExMem, mem_wb: &MemWb) -> HazardReport {
    let Some(fetched) = if_id.entry.as_ref() else {
        return HazardReport::default();
    };
    let (rs1, rs2) = source_registers(fetched.inst);
    let needs = |rd: Option<usize>| rd.is_some() && (rd == rs1 || rd == rs2);

    let mut report = HazardReport::default();
    if let Some(e) = id_ex.entry.as_ref() {
        report.id_ex = needs(writes(&e.ctrl, e.inst.rd));
        report.load_use = report.id_ex && e.ctrl.mem_read;
    }
    if let Some(e) = ex_mem.entry.as_ref() {
        report.ex_mem = needs(writes(&e.ctrl, e.inst.rd));
    }
    if let Some(e) = mem_wb.entry.as_ref() {
        report.mem_wb = needs(writes(&e.ctrl, e.inst.rd));
    }
    report
}

/// Checks if a pipeline stall is needed due to a load-use data hazard.
///
/// # Returns
///
/// `true` if the instruction in IF/ID reads the destination of a load in
/// ID/EX.
pub fn need_stall_load_use(id_ex: &IdEx, if_id: &IfId) -> bool {
    detect(if_id, id_ex, &ExMem::default(), &MemWb::default()).load_use
}

/// Forwards register values from later pipeline stages.
///
/// EX/MEM takes priority over MEM/WB for each operand independently. A load
/// in EX/MEM cannot forward since its data is not read until Memory.
///
/// # Arguments
///
/// * `id_entry` - The ID/EX entry about to execute
/// * `ex_mem` - EX/MEM as it stood at the start of the cycle
/// * `mem_wb` - MEM/WB as it stood at the start of the cycle
///
/// # Returns
///
/// `(rs1_value, rs2_value, rs1_source, rs2_source)`.
pub fn forward_rs(
    id_entry: &IdExEntry,
    ex_mem: &ExMem,
    mem_wb: &MemWb,
) -> (i64, i64, ForwardSource, ForwardSource) {
    let mut a = (id_entry.rv1, ForwardSource::RegFile);
    let mut b = (id_entry.rv2, ForwardSource::RegFile);

    let format = id_entry.inst.format();
    let rs1 = id_entry.inst.rs1.filter(|_| format.reads_rs1());
    let rs2 = id_entry.inst.rs2.filter(|_| format.reads_rs2());

    let mut apply = |dest: Option<usize>, value: i64, source: ForwardSource| {
        if dest.is_none() {
            return;
        }
        if dest == rs1 {
            a = (value, source);
        }
        if dest == rs2 {
            b = (value, source);
        }
    };

    if let Some(wb) = mem_wb.entry.as_ref() {
        apply(writes(&wb.ctrl, wb.inst.rd), wb.wb, ForwardSource::MemWb);
    }
    if let Some(mem) = ex_mem.entry.as_ref() {
        if !mem.ctrl.mem_read {
            apply(writes(&mem.ctrl, mem.inst.rd), mem.alu, ForwardSource::ExMem);
        }
    }

    (a.0, b.0, a.1, b.1)
}
