use crate::core::pipeline::signals::ControlSignals;
use crate::core::pipeline::{IdExEntry, PipelineLatch};
use crate::core::Cpu;
use crate::isa::decode;
use crate::isa::opcodes::Mnemonic;

pub fn decode_stage(cpu: &mut Cpu) {
    if cpu.stall {
        // IF/ID holds its instruction; Execute sees a bubble next cycle
        cpu.id_ex.flush();
        return;
    }

    let Some(fetched) = cpu.if_id.entry.take() else {
        cpu.id_ex.entry = None;
        return;
    };

    let inst = decode(fetched.inst);
    if inst.mnemonic == Mnemonic::Unknown {
        tracing::warn!(
            pc = fetched.pc,
            word = fetched.inst,
            "unknown instruction carried as a no-op"
        );
    }
    let ctrl = ControlSignals::for_mnemonic(inst.mnemonic);

    let format = inst.format();
    let rv1 = match inst.rs1 {
        Some(r) if format.reads_rs1() => cpu.regs.read(r),
        _ => 0,
    };
    let rv2 = match inst.rs2 {
        Some(r) if format.reads_rs2() => cpu.regs.read(r),
        _ => 0,
    };

    tracing::trace!("ID  pc={:#x} {} rv1={} rv2={}", fetched.pc, inst, rv1, rv2);

    cpu.stats.instructions += 1;
    cpu.id_ex.entry = Some(IdExEntry {
        seq: fetched.seq,
        pc: fetched.pc,
        inst,
        ctrl,
        rv1,
        rv2,
        pred_taken: fetched.pred_taken,
        pred_target: fetched.pred_target,
    });
}
