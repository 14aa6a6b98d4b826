//! Pipelined CPU.
//!
//! [`Cpu`] owns every piece of simulator state: register file, data memory,
//! program text, the four pipeline latches, the branch predictor, and the
//! statistics counters. Nothing is global, so independent simulations can
//! run side by side.
//!
//! # Cycle
//!
//! 1. Data hazard detection on the raw word in IF/ID.
//! 2. Control hazard check on the branch or jump in EX/MEM.
//! 3. Writeback, Memory, Execute, Decode, Fetch, in that order.
//! 4. Per-cycle diagnostics and termination checks.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::config::{Config, TraceConfig};
use crate::core::arch::Gpr;
use crate::core::pipeline::hazards;
use crate::core::pipeline::stages;
use crate::core::pipeline::{ExMem, IdEx, IfId, MemWb, PipelineLatch};
use crate::core::units::BranchPredictor;
use crate::isa::abi::{REG_FP, REG_SP};
use crate::sim::image::ProgramImage;
use crate::soc::DataMemory;
use crate::stats::SimStats;

/// Why a simulation stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltReason {
    /// Control flow transferred an instruction to its own address.
    InfiniteLoop { pc: u64 },
    /// `addi x0, x0, 1` reached MEM/WB.
    ExitInstruction { pc: u64 },
    /// The PC left the program and every latch emptied.
    Drained,
}

/// Pipeline stage names, used by the instruction tracer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Execute,
    Memory,
    Writeback,
}

/// Five-stage pipelined CPU.
pub struct Cpu {
    pub regs: Gpr,
    pub pc: u64,
    pub memory: DataMemory,
    pub text: BTreeMap<u64, u32>,

    pub if_id: IfId,
    pub id_ex: IdEx,
    pub ex_mem: ExMem,
    pub mem_wb: MemWb,
    /// MEM/WB as it stood at the start of the cycle, for forwarding.
    pub wb_latch: MemWb,

    pub branch_predictor: BranchPredictor,
    pub stats: SimStats,

    pub forwarding: bool,
    pub trace: TraceConfig,

    pub(crate) stall: bool,
    pub(crate) fetch_halted: bool,
    pub(crate) pending_halt: Option<HaltReason>,
    pub(crate) next_seq: u64,
    halt: Option<HaltReason>,
}

impl Cpu {
    /// Builds a CPU ready to fetch from the start of the text segment.
    pub fn new(image: ProgramImage, config: &Config) -> Self {
        let mut regs = Gpr::new();
        if config.memory.seed_stack {
            let sp = config.memory.stack_pointer_val() as i64;
            regs.write(REG_SP, sp);
            regs.write(REG_FP, sp);
        }

        let mut trace = config.trace.clone();
        if cfg!(feature = "always-trace") {
            trace.print_pipeline_registers = true;
        }

        Self {
            regs,
            pc: config.memory.text_base_val(),
            memory: image.data,
            text: image.text,
            if_id: IfId::default(),
            id_ex: IdEx::default(),
            ex_mem: ExMem::default(),
            mem_wb: MemWb::default(),
            wb_latch: MemWb::default(),
            branch_predictor: BranchPredictor::new(),
            stats: SimStats::default(),
            forwarding: config.pipeline.data_forwarding,
            trace,
            stall: false,
            fetch_halted: false,
            pending_halt: None,
            next_seq: 0,
            halt: None,
        }
    }

    /// Advances the pipeline by one clock cycle.
    ///
    /// Does nothing once the CPU has halted.
    pub fn tick(&mut self) {
        if self.halt.is_some() {
            return;
        }
        self.stats.cycles += 1;

        let mut report = hazards::detect(&self.if_id, &self.id_ex, &self.ex_mem, &self.mem_wb);
        if self.resolve_control_hazard() {
            report = hazards::detect(&self.if_id, &self.id_ex, &self.ex_mem, &self.mem_wb);
        }

        if report.any() {
            self.stats.data_hazards += 1;
        }
        self.stall = report.needs_stall(self.forwarding);
        if self.stall {
            self.stats.pipeline_stalls += 1;
            self.stats.stalls_data += 1;
            tracing::debug!(
                cycle = self.stats.cycles,
                pc = ?self.if_id.pc(),
                load_use = report.load_use,
                "stall in decode"
            );
        }

        self.wb_latch = self.mem_wb.clone();
        stages::wb_stage(self);
        stages::mem_stage(self);
        stages::execute_stage(self);
        stages::decode_stage(self);
        stages::fetch_stage(self);

        self.stats.branch_predictions = self.branch_predictor.predictions();
        self.stats.branch_correct = self.branch_predictor.correct_predictions();

        self.emit_diagnostics();
        self.check_termination();
    }

    /// Runs until a termination condition is met.
    pub fn run(&mut self) -> HaltReason {
        loop {
            self.tick();
            if let Some(reason) = self.halt {
                return reason;
            }
        }
    }

    /// Runs for at most `max_cycles` more cycles.
    ///
    /// # Returns
    ///
    /// The halt reason, or `None` if the budget ran out first.
    pub fn run_for(&mut self, max_cycles: u64) -> Option<HaltReason> {
        for _ in 0..max_cycles {
            self.tick();
            if self.halt.is_some() {
                break;
            }
        }
        self.halt
    }

    /// The halt reason, once halted.
    pub fn halted(&self) -> Option<HaltReason> {
        self.halt
    }

    /// Returns `true` if every pipeline latch holds a bubble.
    pub fn pipeline_empty(&self) -> bool {
        self.if_id.is_empty() && self.id_ex.is_empty() && self.ex_mem.is_empty() && self.mem_wb.is_empty()
    }

    /// Checks the branch or jump in EX/MEM against its fetch-time prediction.
    ///
    /// On a mismatch the PC is redirected to the correct path and IF/ID and
    /// ID/EX are flushed.
    ///
    /// # Returns
    ///
    /// `true` if the pipeline was flushed.
    fn resolve_control_hazard(&mut self) -> bool {
        let Some(resolved) = self.ex_mem.entry else {
            return false;
        };
        if !(resolved.ctrl.branch || resolved.ctrl.jump) {
            return false;
        }

        let correct = if resolved.taken {
            resolved.target
        } else {
            resolved.pc.wrapping_add(4)
        };
        if correct == resolved.pred_target {
            return false;
        }

        if resolved.ctrl.branch {
            self.stats.branch_mispredictions += 1;
        }
        self.stats.control_hazards += 1;
        let squashed = [!self.if_id.is_empty(), !self.id_ex.is_empty()]
            .iter()
            .filter(|&&live| live)
            .count() as u64;
        self.stats.stalls_control += squashed;

        tracing::debug!(
            cycle = self.stats.cycles,
            pc = resolved.pc,
            predicted = resolved.pred_target,
            actual = correct,
            squashed,
            "redirect after {}",
            resolved.inst.mnemonic
        );

        self.if_id.flush();
        self.id_ex.flush();

        if correct == resolved.pc {
            tracing::debug!(pc = resolved.pc, "control transfer to itself; draining");
            self.fetch_halted = true;
            self.pending_halt = Some(HaltReason::InfiniteLoop { pc: resolved.pc });
        } else {
            self.pc = correct;
            self.fetch_halted = false;
            self.pending_halt = None;
        }
        true
    }

    fn check_termination(&mut self) {
        if let Some(wb) = self.mem_wb.entry {
            if wb.inst.is_exit_marker() {
                tracing::info!(pc = wb.pc, cycle = self.stats.cycles, "exit instruction reached MEM/WB");
                self.stats.retire(wb.ctrl.class());
                self.halt = Some(HaltReason::ExitInstruction { pc: wb.pc });
                return;
            }
        }

        let fetch_done = self.fetch_halted || !self.text.contains_key(&self.pc);
        if fetch_done && self.pipeline_empty() {
            let reason = self.pending_halt.take().unwrap_or(HaltReason::Drained);
            tracing::info!(?reason, cycle = self.stats.cycles, "pipeline drained");
            self.halt = Some(reason);
        }
    }

    /// Locates an instruction by fetch sequence number.
    pub fn locate(&self, seq: u64) -> Option<Stage> {
        if self.id_ex.seq() == Some(seq) {
            Some(Stage::Execute)
        } else if self.if_id.seq() == Some(seq) {
            Some(Stage::Decode)
        } else if self.ex_mem.seq() == Some(seq) {
            Some(Stage::Memory)
        } else if self.mem_wb.seq() == Some(seq) {
            Some(Stage::Writeback)
        } else {
            None
        }
    }

    /// Renders the four pipeline latches, one per line.
    pub fn pipeline_diagram(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.if_id);
        let _ = writeln!(out, "{}", self.id_ex);
        let _ = writeln!(out, "{}", self.ex_mem);
        let _ = write!(out, "{}", self.mem_wb);
        out
    }

    fn emit_diagnostics(&self) {
        let cycle = self.stats.cycles;
        if self.trace.print_registers {
            tracing::info!(cycle, "register file\n{}", self.regs);
        }
        if self.trace.print_pipeline_registers {
            tracing::info!(cycle, "pipeline registers\n{}", self.pipeline_diagram());
        }
        if let Some(seq) = self.trace.trace_instruction {
            if let Some(stage) = self.locate(seq) {
                tracing::info!(cycle, seq, ?stage, "traced instruction waiting to enter {:?}", stage);
            }
        }
        if self.trace.print_branch_predictor {
            tracing::info!(cycle, "branch predictor\n{}", self.branch_predictor.dump());
        }
    }
}
