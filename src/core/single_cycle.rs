//! Single-cycle driver.
//!
//! Executes one instruction per cycle with no overlap, so there are no
//! hazards and no prediction. Decode, control-signal derivation, ALU and
//! load/store semantics are the same code the pipeline uses.

use std::collections::BTreeMap;

use crate::config::Config;
use crate::core::arch::Gpr;
use crate::core::pipeline::signals::ControlSignals;
use crate::core::pipeline::stages::evaluate;
use crate::core::units::Lsu;
use crate::core::HaltReason;
use crate::isa::abi::{REG_FP, REG_SP};
use crate::isa::decode;
use crate::isa::opcodes::Mnemonic;
use crate::sim::image::ProgramImage;
use crate::soc::DataMemory;
use crate::stats::SimStats;

/// Non-pipelined CPU.
pub struct SingleCycleCpu {
    pub regs: Gpr,
    pub pc: u64,
    pub memory: DataMemory,
    pub text: BTreeMap<u64, u32>,
    pub stats: SimStats,
    print_registers: bool,
    halt: Option<HaltReason>,
}

impl SingleCycleCpu {
    /// Builds a CPU ready to execute from the start of the text segment.
    pub fn new(image: ProgramImage, config: &Config) -> Self {
        let mut regs = Gpr::new();
        if config.memory.seed_stack {
            let sp = config.memory.stack_pointer_val() as i64;
            regs.write(REG_SP, sp);
            regs.write(REG_FP, sp);
        }
        Self {
            regs,
            pc: config.memory.text_base_val(),
            memory: image.data,
            text: image.text,
            stats: SimStats::default(),
            print_registers: config.trace.print_registers,
            halt: None,
        }
    }

    /// Executes one instruction.
    pub fn step(&mut self) {
        if self.halt.is_some() {
            return;
        }
        let pc = self.pc;
        let Some(&word) = self.text.get(&pc) else {
            self.halt = Some(HaltReason::Drained);
            return;
        };

        self.stats.cycles += 1;
        self.stats.instructions += 1;

        let inst = decode(word);
        if inst.mnemonic == Mnemonic::Unknown {
            tracing::warn!(pc, word, "unknown instruction skipped");
        }
        let ctrl = ControlSignals::for_mnemonic(inst.mnemonic);
        let rv1 = inst.rs1.map_or(0, |r| self.regs.read(r));
        let rv2 = inst.rs2.map_or(0, |r| self.regs.read(r));
        let out = evaluate(&inst, &ctrl, pc, rv1, rv2);

        let addr = out.alu as u64;
        let value = if ctrl.mem_read {
            Lsu::load(&self.memory, addr, ctrl.width)
        } else {
            out.alu
        };
        if ctrl.mem_write {
            Lsu::store(&mut self.memory, addr, ctrl.width, out.store_data);
        }
        if ctrl.reg_write {
            if let Some(rd) = inst.rd {
                self.regs.write(rd, value);
            }
        }

        self.stats.retire(ctrl.class());

        tracing::trace!("pc={:#x} {} -> {}", pc, inst, value);
        if self.print_registers {
            tracing::info!(cycle = self.stats.cycles, "register file\n{}", self.regs);
        }

        if inst.is_exit_marker() {
            self.halt = Some(HaltReason::ExitInstruction { pc });
            return;
        }
        let next_pc = out.next_pc(pc);
        if next_pc == pc {
            self.halt = Some(HaltReason::InfiniteLoop { pc });
            return;
        }
        self.pc = next_pc;
    }

    /// Runs until a termination condition is met.
    pub fn run(&mut self) -> HaltReason {
        loop {
            self.step();
            if let Some(reason) = self.halt {
                return reason;
            }
        }
    }

    /// The halt reason, once halted.
    pub fn halted(&self) -> Option<HaltReason> {
        self.halt
    }
}
