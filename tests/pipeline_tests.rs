//! Cycle-level tests for the five-stage pipeline.

use rvpipe::asm::assemble;
use rvpipe::config::Config;
use rvpipe::core::{Cpu, HaltReason, Stage};
use rvpipe::sim::{simulate, ProgramImage};

/// Assembles `source`, asserting it has no errors.
fn image(source: &str) -> ProgramImage {
    let assembly = assemble(source);
    let errors: Vec<String> = assembly.errors().map(|e| format!("{e}: {}", e.source)).collect();
    assert!(errors.is_empty(), "assembly errors: {errors:?}");
    ProgramImage::from_assembly(&assembly)
}

fn config(forwarding: bool) -> Config {
    let mut config = Config::default();
    config.pipeline.data_forwarding = forwarding;
    config
}

fn cpu(source: &str, forwarding: bool) -> Cpu {
    Cpu::new(image(source), &config(forwarding))
}

const SUM_LOOP: &str = "
    lui x10, 0x10000
    addi x1, x0, 0
    addi x2, x0, 5
    addi x3, x0, 0
loop:
    add x3, x3, x1
    addi x1, x1, 1
    blt x1, x2, loop
    sw x3, 0(x10)
    addi x0, x0, 1
";

/// Tests that a back-to-back dependency is satisfied by forwarding without a stall.
#[test]
fn test_forwarding_no_stall() {
    let mut cpu = cpu("addi x1, x0, 5\naddi x2, x1, 1", true);
    assert_eq!(cpu.run(), HaltReason::Drained);
    assert_eq!(cpu.regs.read(2), 6);
    assert_eq!(cpu.stats.pipeline_stalls, 0);
}

/// Tests that without forwarding the same dependency stalls until writeback.
#[test]
fn test_no_forwarding_stalls() {
    let mut cpu = cpu("addi x1, x0, 5\naddi x2, x1, 1", false);
    cpu.run();
    assert_eq!(cpu.regs.read(2), 6, "result must not depend on the stall policy");
    assert_eq!(cpu.stats.pipeline_stalls, 2);
    assert_eq!(cpu.stats.stalls_data, 2);
    assert_eq!(cpu.stats.data_hazards, 2);
}

/// Tests that a load-use dependency costs exactly one bubble with forwarding.
#[test]
fn test_load_use_single_stall() {
    let src = "
.data
val: .word 7
.text
    lui x5, 0x10000
    lw x6, 0(x5)
    add x7, x6, x6
";
    let mut cpu = cpu(src, true);
    cpu.run();
    assert_eq!(cpu.regs.read(6), 7);
    assert_eq!(cpu.regs.read(7), 14);
    assert_eq!(cpu.stats.pipeline_stalls, 1);
}

/// Tests misprediction recovery: flush, redirect, and one counted misprediction.
#[test]
fn test_misprediction_recovery() {
    let src = "
    beq x0, x0, target
    addi x1, x0, 1
    addi x2, x0, 2
target:
    addi x3, x0, 3
";
    let mut cpu = cpu(src, true);
    cpu.branch_predictor.seed(0, false, None);
    cpu.run();
    assert_eq!(cpu.stats.branch_mispredictions, 1);
    assert_eq!(cpu.stats.control_hazards, 1);
    assert_eq!(cpu.stats.stalls_control, 2, "two wrong-path instructions squashed");
    assert_eq!(cpu.regs.read(1), 0, "wrong-path instruction must not retire");
    assert_eq!(cpu.regs.read(2), 0, "wrong-path instruction must not retire");
    assert_eq!(cpu.regs.read(3), 3);
}

/// Tests a correctly predicted taken branch costs no redirect.
#[test]
fn test_correct_prediction_no_flush() {
    let src = "
    beq x0, x0, target
    addi x1, x0, 1
target:
    addi x3, x0, 3
";
    let mut cpu = cpu(src, true);
    cpu.branch_predictor.seed(0, true, Some(8));
    cpu.run();
    assert_eq!(cpu.stats.branch_mispredictions, 0);
    assert_eq!(cpu.stats.control_hazards, 0);
    assert_eq!(cpu.regs.read(1), 0, "predicted path skips the fall-through");
    assert_eq!(cpu.regs.read(3), 3);
    assert_eq!(cpu.stats.branch_correct, 1);
}

/// Tests the end-to-end program and the exit marker.
#[test]
fn test_end_to_end_exit() {
    let src = "
    addi x1, x0, 5
    addi x2, x0, 10
    add x3, x1, x2
    addi x0, x0, 1
";
    let mut cpu = cpu(src, true);
    assert_eq!(cpu.run(), HaltReason::ExitInstruction { pc: 12 });
    assert_eq!(cpu.regs.read(3), 15);
    assert_eq!(cpu.stats.instructions, 4);
    assert_eq!(cpu.stats.cycles, 7);
    assert_eq!(cpu.stats.instructions_retired, 4, "the exit marker retires");
    assert_eq!(cpu.stats.inst_alu, 4);
}

/// Tests that instructions behind the exit marker never commit.
#[test]
fn test_exit_stops_younger_instructions() {
    let src = "
    addi x0, x0, 1
    addi x5, x0, 9
    addi x6, x0, 9
";
    let mut cpu = cpu(src, true);
    assert_eq!(cpu.run(), HaltReason::ExitInstruction { pc: 0 });
    assert_eq!(cpu.regs.read(5), 0);
    assert_eq!(cpu.regs.read(6), 0);
}

/// Tests that x0 stays zero whatever is written to it.
#[test]
fn test_x0_hardwired() {
    let mut cpu = cpu("addi x0, x0, 5\nadd x1, x0, x0\nlui x0, 0x1", true);
    cpu.run();
    assert_eq!(cpu.regs.read(0), 0);
    assert_eq!(cpu.regs.read(1), 0);
}

/// Tests that a branch to itself halts once the pipeline drains.
#[test]
fn test_infinite_loop_branch() {
    let mut cpu = cpu("loop: beq x0, x0, loop", true);
    assert_eq!(cpu.run_for(100), Some(HaltReason::InfiniteLoop { pc: 0 }));
}

/// Tests that a jump to itself halts too.
#[test]
fn test_infinite_loop_jump() {
    let mut cpu = cpu("addi x1, x0, 1\nspin: jal x0, spin", true);
    assert_eq!(cpu.run_for(100), Some(HaltReason::InfiniteLoop { pc: 4 }));
    assert_eq!(cpu.regs.read(1), 1);
}

/// Tests a call and return through jal/jalr.
#[test]
fn test_call_return() {
    let src = "
    jal ra, func
    addi x5, x0, 7
    addi x0, x0, 1
func:
    addi x6, x0, 3
    jalr x0, 0(ra)
";
    let mut cpu = cpu(src, true);
    assert_eq!(cpu.run(), HaltReason::ExitInstruction { pc: 8 });
    assert_eq!(cpu.regs.read(1), 4, "jal links pc + 4");
    assert_eq!(cpu.regs.read(5), 7);
    assert_eq!(cpu.regs.read(6), 3);
    assert_eq!(cpu.stats.branch_mispredictions, 0, "jumps are not branch mispredictions");
    assert_eq!(cpu.stats.control_hazards, 2);
}

/// Tests a loop gives the same architectural result in every mode.
#[test]
fn test_modes_agree() {
    let mut reference = Config::default();
    reference.pipeline.enabled = false;
    let expected = simulate(image(SUM_LOOP), &reference);
    assert_eq!(expected.regs.read(3), 10);
    assert_eq!(expected.memory.read_le(0x1000_0000, 4), 10);
    assert_eq!(expected.stats.cycles, expected.stats.instructions);

    for forwarding in [true, false] {
        let outcome = simulate(image(SUM_LOOP), &config(forwarding));
        assert_eq!(outcome.halt, expected.halt);
        assert_eq!(outcome.regs, expected.regs, "registers with forwarding={forwarding}");
        assert_eq!(outcome.memory, expected.memory, "memory with forwarding={forwarding}");
        assert_eq!(outcome.stats.instructions_retired, expected.stats.instructions_retired);
        assert_eq!(outcome.stats.inst_alu, expected.stats.inst_alu);
        assert_eq!(outcome.stats.inst_data_transfer, expected.stats.inst_data_transfer);
        assert_eq!(outcome.stats.inst_control, expected.stats.inst_control);
        assert!(outcome.stats.cycles > expected.stats.cycles);
    }
}

/// Tests the loop branch trains the predictor.
#[test]
fn test_loop_trains_predictor() {
    let mut cpu = cpu(SUM_LOOP, true);
    cpu.run();
    // first iteration and the final exit both mispredict
    assert_eq!(cpu.stats.branch_mispredictions, 2);
    assert_eq!(cpu.stats.branch_predictions, 5);
    assert_eq!(cpu.stats.branch_correct, 3);
}

/// Tests the instruction tracer's stage lookup.
#[test]
fn test_locate_by_sequence() {
    let mut cpu = cpu("addi x1, x0, 1\naddi x2, x0, 2\naddi x3, x0, 3", true);
    cpu.tick();
    assert_eq!(cpu.locate(0), Some(Stage::Decode));
    cpu.tick();
    assert_eq!(cpu.locate(0), Some(Stage::Execute));
    assert_eq!(cpu.locate(1), Some(Stage::Decode));
    assert_eq!(cpu.locate(7), None);
}

/// Tests that a run budget can expire before a halt.
#[test]
fn test_run_for_budget() {
    let mut cpu = cpu(SUM_LOOP, true);
    assert_eq!(cpu.run_for(3), None);
    assert_eq!(cpu.stats.cycles, 3);
    assert!(cpu.halted().is_none());
}

/// Tests optional stack pointer seeding.
#[test]
fn test_seed_stack() {
    let mut config = Config::default();
    config.memory.seed_stack = true;
    let cpu = Cpu::new(image("addi x1, x0, 1"), &config);
    assert_eq!(cpu.regs.read(2), 0x7FFF_FFFC);
    assert_eq!(cpu.regs.read(8), 0x7FFF_FFFC);

    let cpu = Cpu::new(image("addi x1, x0, 1"), &Config::default());
    assert_eq!(cpu.regs.read(2), 0, "registers start at zero by default");
}
