//! Simulation harness.
//!
//! Turns a listing or an assembly into a [`ProgramImage`], picks the
//! pipelined or single-cycle driver from the configuration, runs it to
//! completion, and hands back the final architectural state.

/// Program image type.
pub mod image;

/// Machine-code listing loader.
pub mod loader;

use crate::config::Config;
use crate::core::arch::Gpr;
use crate::core::{Cpu, HaltReason, SingleCycleCpu};
use crate::soc::DataMemory;
use crate::stats::SimStats;

pub use image::ProgramImage;

/// Final state of a finished simulation.
#[derive(Clone, Debug)]
pub struct SimOutcome {
    pub halt: HaltReason,
    pub regs: Gpr,
    pub memory: DataMemory,
    pub stats: SimStats,
}

/// Runs `image` to completion with the driver selected by `config`.
pub fn simulate(image: ProgramImage, config: &Config) -> SimOutcome {
    tracing::info!(
        instructions = image.len(),
        pipelined = config.pipeline.enabled,
        forwarding = config.pipeline.data_forwarding,
        "starting simulation"
    );

    if config.pipeline.enabled {
        let mut cpu = Cpu::new(image, config);
        let halt = cpu.run();
        SimOutcome {
            halt,
            regs: cpu.regs,
            memory: cpu.memory,
            stats: cpu.stats,
        }
    } else {
        let mut cpu = SingleCycleCpu::new(image, config);
        let halt = cpu.run();
        SimOutcome {
            halt,
            regs: cpu.regs,
            memory: cpu.memory,
            stats: cpu.stats,
        }
    }
}
