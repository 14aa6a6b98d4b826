//! Execute stage.
//!
//! [`evaluate`] holds the per-instruction semantics and is shared with the
//! single-cycle driver; [`execute_stage`] wraps it with forwarding and
//! predictor training.

use crate::core::pipeline::hazards::{forward_rs, ForwardSource};
use crate::core::pipeline::signals::{ControlSignals, OpASrc, OpBSrc};
use crate::core::pipeline::ExMemEntry;
use crate::core::units::Alu;
use crate::core::Cpu;
use crate::isa::instruction::Instruction;
use crate::isa::opcodes::Mnemonic;

/// Values produced by executing one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecOutcome {
    /// ALU result, effective address, or link address for jumps.
    pub alu: i64,
    /// Value to store for store instructions.
    pub store_data: i64,
    /// Whether control transfers to `target`.
    pub taken: bool,
    /// Branch or jump destination; `pc + 4` for everything else.
    pub target: u64,
}

impl ExecOutcome {
    /// Address of the next instruction on the correct path.
    pub fn next_pc(&self, pc: u64) -> u64 {
        if self.taken {
            self.target
        } else {
            pc.wrapping_add(4)
        }
    }
}

/// Computes the result of one instruction.
///
/// # Arguments
///
/// * `inst` - The decoded instruction
/// * `ctrl` - Its control signals
/// * `pc` - Its address
/// * `rv1` - Value of `rs1` after forwarding
/// * `rv2` - Value of `rs2` after forwarding
pub fn evaluate(inst: &Instruction, ctrl: &ControlSignals, pc: u64, rv1: i64, rv2: i64) -> ExecOutcome {
    let imm = inst.imm_or_zero();
    let a = match ctrl.a_src {
        OpASrc::Reg1 => rv1,
        OpASrc::Pc => pc as i64,
        OpASrc::Zero => 0,
    };
    let b = match ctrl.b_src {
        OpBSrc::Reg2 => rv2,
        OpBSrc::Imm => imm,
    };
    let result = Alu::execute(ctrl.alu, a, b);
    let link = pc.wrapping_add(4);
    let branch_target = pc.wrapping_add(imm as u64);

    let (alu, taken, target) = match inst.mnemonic {
        Mnemonic::Beq => (result, rv1 == rv2, branch_target),
        Mnemonic::Bne => (result, rv1 != rv2, branch_target),
        Mnemonic::Blt => (result, rv1 < rv2, branch_target),
        Mnemonic::Bge => (result, rv1 >= rv2, branch_target),
        Mnemonic::Jal => (link as i64, true, result as u64),
        Mnemonic::Jalr => (link as i64, true, (result as u64) & !1),
        Mnemonic::Add
        | Mnemonic::Sub
        | Mnemonic::And
        | Mnemonic::Or
        | Mnemonic::Xor
        | Mnemonic::Sll
        | Mnemonic::Slt
        | Mnemonic::Srl
        | Mnemonic::Sra
        | Mnemonic::Mul
        | Mnemonic::Div
        | Mnemonic::Rem
        | Mnemonic::Addi
        | Mnemonic::Andi
        | Mnemonic::Ori
        | Mnemonic::Lb
        | Mnemonic::Lh
        | Mnemonic::Lw
        | Mnemonic::Ld
        | Mnemonic::Sb
        | Mnemonic::Sh
        | Mnemonic::Sw
        | Mnemonic::Sd
        | Mnemonic::Lui
        | Mnemonic::Auipc => (result, false, link),
        Mnemonic::Unknown => (0, false, link),
    };

    ExecOutcome {
        alu,
        store_data: rv2,
        taken,
        target,
    }
}

/// Runs the Execute stage.
///
/// Forwarding reads `cpu.wb_latch`, the MEM/WB contents from before Memory
/// overwrote them this cycle. EX/MEM is still unmodified when this runs,
/// since Memory only reads it.
pub fn execute_stage(cpu: &mut Cpu) {
    let Some(entry) = cpu.id_ex.entry.take() else {
        cpu.ex_mem.entry = None;
        return;
    };

    let (rv1, rv2) = if cpu.forwarding {
        let (a, b, a_src, b_src) = forward_rs(&entry, &cpu.ex_mem, &cpu.wb_latch);
        if a_src != ForwardSource::RegFile || b_src != ForwardSource::RegFile {
            tracing::trace!(
                "EX  pc={:#x} forward rs1<-{:?} rs2<-{:?}",
                entry.pc,
                a_src,
                b_src
            );
        }
        (a, b)
    } else {
        (entry.rv1, entry.rv2)
    };

    let out = evaluate(&entry.inst, &entry.ctrl, entry.pc, rv1, rv2);

    if entry.ctrl.branch || entry.ctrl.jump {
        cpu.branch_predictor.update(entry.pc, out.taken, out.target);
    }

    tracing::trace!(
        "EX  pc={:#x} {} alu={} taken={} target={:#x}",
        entry.pc,
        entry.inst,
        out.alu,
        out.taken,
        out.target
    );

    cpu.ex_mem.entry = Some(ExMemEntry {
        seq: entry.seq,
        pc: entry.pc,
        inst: entry.inst,
        ctrl: entry.ctrl,
        alu: out.alu,
        store_data: out.store_data,
        taken: out.taken,
        target: out.target,
        pred_taken: entry.pred_taken,
        pred_target: entry.pred_target,
    });
}
