use crate::core::pipeline::MemWbEntry;
use crate::core::units::Lsu;
use crate::core::Cpu;

pub fn mem_stage(cpu: &mut Cpu) {
    // EX/MEM is left in place for Execute's forwarding check
    let Some(e) = cpu.ex_mem.entry else {
        cpu.mem_wb.entry = None;
        return;
    };

    let addr = e.alu as u64;
    let load_data = if e.ctrl.mem_read {
        let value = Lsu::load(&cpu.memory, addr, e.ctrl.width);
        tracing::trace!("MEM pc={:#x} load [{:#x}] -> {}", e.pc, addr, value);
        Some(value)
    } else {
        None
    };

    if e.ctrl.mem_write {
        tracing::trace!("MEM pc={:#x} store [{:#x}] <- {}", e.pc, addr, e.store_data);
        Lsu::store(&mut cpu.memory, addr, e.ctrl.width, e.store_data);
    }

    cpu.mem_wb.entry = Some(MemWbEntry {
        seq: e.seq,
        pc: e.pc,
        inst: e.inst,
        ctrl: e.ctrl,
        alu: e.alu,
        load_data,
        wb: load_data.unwrap_or(e.alu),
    });
}
