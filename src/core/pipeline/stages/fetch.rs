use crate::core::pipeline::IfIdEntry;
use crate::core::{Cpu, HaltReason};
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::OP_BRANCH;

pub fn fetch_stage(cpu: &mut Cpu) {
    if cpu.stall {
        return;
    }
    if cpu.fetch_halted {
        cpu.if_id.entry = None;
        return;
    }

    let pc = cpu.pc;
    let Some(&inst) = cpu.text.get(&pc) else {
        cpu.if_id.entry = None;
        return;
    };

    let sequential = pc.wrapping_add(4);
    let (pred_taken, next_pc) = if inst.opcode() == OP_BRANCH {
        let taken = cpu.branch_predictor.predict(pc);
        match cpu.branch_predictor.target(pc) {
            Some(target) if taken => (true, target),
            _ => (false, sequential),
        }
    } else {
        // jal/jalr fall through and are recovered after Execute
        (false, sequential)
    };

    let seq = cpu.next_seq;
    cpu.next_seq += 1;

    tracing::trace!(
        "IF  pc={:#x} inst={:#010x} pred_taken={} next={:#x}",
        pc,
        inst,
        pred_taken,
        next_pc
    );

    cpu.if_id.entry = Some(IfIdEntry {
        seq,
        pc,
        inst,
        pred_taken,
        pred_target: next_pc,
    });

    if next_pc == pc {
        tracing::debug!(pc, "fetch predicts a jump to itself; draining");
        cpu.fetch_halted = true;
        cpu.pending_halt = Some(HaltReason::InfiniteLoop { pc });
    } else {
        cpu.pc = next_pc;
    }
}
