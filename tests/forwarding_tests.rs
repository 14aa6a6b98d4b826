//! Tests for hazard detection and register forwarding.

use rvpipe::core::pipeline::hazards::{self, ForwardSource};
use rvpipe::core::pipeline::latches::*;
use rvpipe::core::pipeline::signals::ControlSignals;
use rvpipe::isa::encoder::encode;
use rvpipe::isa::{Instruction, Mnemonic};

fn addi(rd: usize, rs1: usize, imm: i64) -> Instruction {
    Instruction::i_type(Mnemonic::Addi, rd, rs1, imm)
}

fn add(rd: usize, rs1: usize, rs2: usize) -> Instruction {
    Instruction::r_type(Mnemonic::Add, rd, rs1, rs2)
}

fn lw(rd: usize, rs1: usize) -> Instruction {
    Instruction::i_type(Mnemonic::Lw, rd, rs1, 0)
}

/// Creates an IF/ID latch holding the encoded form of `inst`.
fn if_id(inst: Instruction) -> IfId {
    let word = encode(&inst).expect("test instruction encodes");
    IfId {
        entry: Some(IfIdEntry {
            seq: 0,
            pc: 0x100,
            inst: word,
            pred_taken: false,
            pred_target: 0x104,
        }),
    }
}

/// Creates an ID/EX latch entry for testing.
fn id_ex_entry(inst: Instruction, rv1: i64, rv2: i64) -> IdExEntry {
    IdExEntry {
        seq: 1,
        pc: 0xfc,
        inst,
        ctrl: ControlSignals::for_mnemonic(inst.mnemonic),
        rv1,
        rv2,
        pred_taken: false,
        pred_target: 0x100,
    }
}

/// Creates an EX/MEM latch for testing.
fn ex_mem(inst: Instruction, alu: i64) -> ExMem {
    ExMem {
        entry: Some(ExMemEntry {
            seq: 2,
            pc: 0xf8,
            inst,
            ctrl: ControlSignals::for_mnemonic(inst.mnemonic),
            alu,
            store_data: 0,
            taken: false,
            target: 0xfc,
            pred_taken: false,
            pred_target: 0xfc,
        }),
    }
}

/// Creates a MEM/WB latch for testing.
fn mem_wb(inst: Instruction, wb: i64) -> MemWb {
    MemWb {
        entry: Some(MemWbEntry {
            seq: 3,
            pc: 0xf4,
            inst,
            ctrl: ControlSignals::for_mnemonic(inst.mnemonic),
            alu: wb,
            load_data: None,
            wb,
        }),
    }
}

/// Tests that no hazard is reported with empty latches.
#[test]
fn test_no_hazard_when_empty() {
    let report = hazards::detect(&if_id(add(3, 1, 2)), &IdEx::default(), &ExMem::default(), &MemWb::default());
    assert!(!report.any());
    assert!(!report.needs_stall(true));
    assert!(!report.needs_stall(false));
}

/// Tests an ALU producer in ID/EX: forwarded with forwarding on, stalled without.
#[test]
fn test_alu_producer_in_id_ex() {
    let id_ex = IdEx {
        entry: Some(id_ex_entry(addi(1, 0, 5), 0, 0)),
    };
    let report = hazards::detect(&if_id(addi(2, 1, 1)), &id_ex, &ExMem::default(), &MemWb::default());
    assert!(report.id_ex);
    assert!(!report.load_use);
    assert!(!report.needs_stall(true), "forwarding covers an ALU result");
    assert!(report.needs_stall(false), "without forwarding every hazard stalls");
}

/// Tests that a load in ID/EX is a load-use hazard.
#[test]
fn test_load_use() {
    let id_ex = IdEx {
        entry: Some(id_ex_entry(lw(5, 2), 0, 0)),
    };
    let consumer = if_id(add(6, 5, 0));
    let report = hazards::detect(&consumer, &id_ex, &ExMem::default(), &MemWb::default());
    assert!(report.load_use);
    assert!(report.needs_stall(true));
    assert!(hazards::need_stall_load_use(&id_ex, &consumer));
}

/// Tests that writes to x0 never create a dependency.
#[test]
fn test_x0_never_hazards() {
    let id_ex = IdEx {
        entry: Some(id_ex_entry(lw(0, 2), 0, 0)),
    };
    let report = hazards::detect(&if_id(add(6, 0, 0)), &id_ex, &ExMem::default(), &MemWb::default());
    assert!(!report.any());
}

/// Tests that a MEM/WB producer is reported but does not stall.
#[test]
fn test_mem_wb_producer_never_stalls() {
    let report = hazards::detect(
        &if_id(add(3, 1, 2)),
        &IdEx::default(),
        &ExMem::default(),
        &mem_wb(addi(2, 0, 7), 7),
    );
    assert!(report.mem_wb);
    assert!(!report.needs_stall(false));
}

/// Tests that LUI does not read rs1 bits that happen to match.
#[test]
fn test_source_registers_by_format() {
    let lui = encode(&Instruction::u_type(Mnemonic::Lui, 1, 0x0000_8000)).expect("lui encodes");
    assert_eq!(hazards::source_registers(lui), (None, None));
    let sw = encode(&Instruction::s_type(Mnemonic::Sw, 3, 4, 0)).expect("sw encodes");
    assert_eq!(hazards::source_registers(sw), (Some(3), Some(4)));
}

/// Tests EX/MEM forwarding to both operands.
#[test]
fn test_forward_from_ex_mem() {
    let entry = id_ex_entry(add(3, 1, 1), 0, 0);
    let (a, b, sa, sb) = hazards::forward_rs(&entry, &ex_mem(addi(1, 0, 5), 5), &MemWb::default());
    assert_eq!((a, b), (5, 5));
    assert_eq!((sa, sb), (ForwardSource::ExMem, ForwardSource::ExMem));
}

/// Tests that EX/MEM wins over MEM/WB for the same register.
#[test]
fn test_ex_mem_priority() {
    let entry = id_ex_entry(add(3, 1, 2), 0, 0);
    let (a, b, sa, sb) = hazards::forward_rs(&entry, &ex_mem(addi(1, 0, 10), 10), &mem_wb(addi(1, 0, 20), 20));
    assert_eq!(a, 10, "the younger producer wins");
    assert_eq!(sa, ForwardSource::ExMem);
    assert_eq!((b, sb), (0, ForwardSource::RegFile));
}

/// Tests that a load in EX/MEM cannot forward its address.
#[test]
fn test_load_in_ex_mem_not_forwarded() {
    let entry = id_ex_entry(add(3, 5, 0), 99, 0);
    let (a, _, sa, _) = hazards::forward_rs(&entry, &ex_mem(lw(5, 2), 0x1000_0000), &MemWb::default());
    assert_eq!(a, 99);
    assert_eq!(sa, ForwardSource::RegFile);
}

/// Tests MEM/WB forwarding of loaded data.
#[test]
fn test_forward_load_from_mem_wb() {
    let mut wb = mem_wb(lw(5, 2), 0);
    if let Some(e) = wb.entry.as_mut() {
        e.load_data = Some(-3);
        e.wb = -3;
    }
    let entry = id_ex_entry(add(3, 0, 5), 0, 0);
    let (_, b, _, sb) = hazards::forward_rs(&entry, &ExMem::default(), &wb);
    assert_eq!((b, sb), (-3, ForwardSource::MemWb));
}
