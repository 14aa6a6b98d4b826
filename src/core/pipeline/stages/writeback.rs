use crate::core::Cpu;

pub fn wb_stage(cpu: &mut Cpu) {
    let Some(wb) = cpu.mem_wb.entry else {
        return;
    };

    if wb.ctrl.reg_write {
        if let Some(rd) = wb.inst.rd {
            cpu.regs.write(rd, wb.wb);
        }
    }

    tracing::trace!("WB  pc={:#x} {} wb={}", wb.pc, wb.inst, wb.wb);

    cpu.stats.retire(wb.ctrl.class());
}
