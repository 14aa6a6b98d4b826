//! End-to-end tests: assemble, write a listing, load it back and simulate.

use rvpipe::asm::{assemble, listing, Assembler};
use rvpipe::common::error::{ConfigError, LoadError};
use rvpipe::config::Config;
use rvpipe::core::HaltReason;
use rvpipe::sim::{loader, simulate, ProgramImage};

const PROGRAM: &str = "
.data
nums: .word 3, 4, 5
out:  .word 0
.text
    lui x10, 0x10000        # &nums
    addi x11, x0, 3          # count
    addi x12, x0, 0          # sum
next:
    lw x13, 0(x10)
    add x12, x12, x13
    addi x10, x10, 4
    addi x11, x11, -1
    bne x11, x0, next
    sw x12, 0(x10)           # x10 now points at out
    mul x14, x12, x12
    addi x0, x0, 1
";

/// Tests that a listing round trip yields the same image as direct assembly.
#[test]
fn test_listing_round_trip() {
    let assembly = assemble(PROGRAM);
    assert!(assembly.is_clean());
    let direct = ProgramImage::from_assembly(&assembly);
    let loaded = loader::parse_listing(&listing::render(&assembly)).expect("listing parses");
    assert_eq!(loaded, direct);
}

/// Tests the full program through the loader and pipeline.
#[test]
fn test_simulate_from_listing() {
    let assembly = assemble(PROGRAM);
    let image = loader::parse_listing(&listing::render(&assembly)).expect("listing parses");
    let outcome = simulate(image, &Config::default());
    assert!(matches!(outcome.halt, HaltReason::ExitInstruction { .. }));
    assert_eq!(outcome.regs.read(12), 12);
    assert_eq!(outcome.regs.read(14), 144);
    assert_eq!(outcome.memory.read_le(0x1000_000c, 4), 12);
    assert_eq!(outcome.stats.inst_control, 3, "three bne retire");
    assert_eq!(outcome.stats.inst_data_transfer, 4);
    assert!(outcome.stats.pipeline_stalls >= 3, "each lw feeds the next add");
}

/// Tests that a listing built at a custom text base runs under the same configuration.
#[test]
fn test_custom_text_base_round_trip() {
    let config = Config::from_toml("[memory]\ntext_base = \"0x400\"").expect("config parses");
    let assembler = Assembler::with_bases(config.memory.text_base_val(), config.memory.data_base_val());
    let assembly = assembler.assemble("addi x5, x0, 42\naddi x0, x0, 1");
    let text = listing::render(&assembly);
    assert!(text.starts_with("0x400 , "), "{text}");

    let image = loader::parse_listing(&text).expect("listing parses");
    let outcome = simulate(image.clone(), &config);
    assert_eq!(outcome.halt, HaltReason::ExitInstruction { pc: 0x404 });
    assert_eq!(outcome.regs.read(5), 42);

    let stranded = simulate(image, &Config::default());
    assert_eq!(stranded.halt, HaltReason::Drained, "nothing to fetch at the default base");
}

/// Tests the statistics report layout.
#[test]
fn test_stats_report() {
    let outcome = simulate(ProgramImage::from_assembly(&assemble(PROGRAM)), &Config::default());
    let report = outcome.stats.report();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 12);
    assert!(lines[0].starts_with("Stat1: Total number of cycles: "));
    assert!(lines[7].starts_with("Stat8: Number of cycles with data hazards: "));
    assert!(lines[11].starts_with("Stat12: "));
    let json = outcome.stats.to_json().expect("stats serialize");
    assert!(json.contains("\"branch_mispredictions\""));
}

/// Tests the register dump format.
#[test]
fn test_register_dump() {
    let outcome = simulate(
        ProgramImage::from_assembly(&assemble("addi x5, x0, 42\naddi x0, x0, 1")),
        &Config::default(),
    );
    let dump = outcome.regs.to_string();
    assert_eq!(dump.lines().count(), 32);
    assert!(dump.contains("x5  (  t0) = 0x000000000000002a"), "{dump}");
}

/// Tests that malformed listings are rejected with a line number.
#[test]
fn test_loader_errors() {
    assert!(matches!(
        loader::parse_listing("0x0 , 0xZZ addi x1, x0, 1"),
        Err(LoadError::InvalidHex { line_no: 1, .. })
    ));
    assert!(matches!(
        loader::parse_listing("0x2 , 0x00500093 addi x1, x0, 5"),
        Err(LoadError::MisalignedInstruction { line_no: 1, addr: 2 })
    ));
    assert!(matches!(
        loader::parse_listing("Data Segment\n0x10000000   05 GG"),
        Err(LoadError::InvalidHex { line_no: 2, .. })
    ));
    assert!(matches!(
        loader::parse_listing("0x0 , 0x00500093 addi x1, x0, 5\n0x4 0x00000013"),
        Err(LoadError::MalformedLine { line_no: 2, .. })
    ));
    assert!(matches!(
        loader::parse_listing("this is garbage"),
        Err(LoadError::MalformedLine { line_no: 1, .. })
    ));
    assert!(matches!(
        loader::parse_listing("0x0 ,"),
        Err(LoadError::MalformedLine { line_no: 1, .. })
    ));
}

/// Tests that blank lines, error lines and separators are skipped.
#[test]
fn test_loader_skips_noise() {
    let text = "\
0x0 , 0x00500093 addi x1, x0, 5 # summary
Error in encoding instruction: addi x2, x0, 5000

*****
Data Segment
0x10000000   01 02 03 04
";
    let image = loader::parse_listing(text).expect("listing parses");
    assert_eq!(image.text.len(), 1);
    assert_eq!(image.data.read_le(0x1000_0000, 4), 0x0403_0201);
}

/// Tests configuration parsing and defaults.
#[test]
fn test_config_from_toml() {
    let config = Config::from_toml(
        "
[pipeline]
data_forwarding = false

[trace]
trace_instruction = 3

[memory]
seed_stack = true
",
    )
    .expect("config parses");
    assert!(config.pipeline.enabled);
    assert!(!config.pipeline.data_forwarding);
    assert_eq!(config.trace.trace_instruction, Some(3));
    assert!(config.memory.seed_stack);
    assert_eq!(config.memory.data_base_val(), 0x1000_0000);

    assert_eq!(Config::from_toml("").expect("empty config parses"), Config::default());
}

/// Tests the bundled default configuration file.
#[test]
fn test_default_config_file() {
    let text = include_str!("../configs/default.toml");
    assert_eq!(Config::from_toml(text).expect("default config parses"), Config::default());
}

/// Tests that bad addresses are rejected.
#[test]
fn test_config_invalid_address() {
    let err = Config::from_toml("[memory]\ndata_base = \"nope\"").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidAddress { field: "data_base", .. }));
    assert!(matches!(Config::from_toml("[pipeline\n"), Err(ConfigError::Toml(_))));
}
