//! RV64 assembler and pipeline simulator CLI.
//!
//! # Usage
//!
//! * `rvpipe assemble prog.asm -o prog.mc` writes a machine-code listing.
//! * `rvpipe simulate prog.mc` runs a listing.
//! * `rvpipe run prog.asm` assembles in memory and runs the result.
//!
//! Diagnostics are emitted through `tracing`; `-v` raises the level and
//! `RUST_LOG` overrides it entirely.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rvpipe::asm::{listing, Assembler, Assembly};
use rvpipe::config::Config;
use rvpipe::sim::{self, loader, ProgramImage, SimOutcome};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(author, version, about = "RV64 assembler and five-stage pipeline simulator")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a source file into a machine-code listing.
    Assemble {
        input: PathBuf,
        #[arg(short, long, default_value = "out.mc")]
        output: PathBuf,
        /// Configuration supplying the text and data base addresses.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Simulate a machine-code listing.
    Simulate {
        input: PathBuf,
        #[command(flatten)]
        opts: SimArgs,
    },
    /// Assemble a source file and simulate it without writing a listing.
    Run {
        input: PathBuf,
        #[command(flatten)]
        opts: SimArgs,
    },
}

/// Options shared by `simulate` and `run`.
#[derive(Args, Debug)]
struct SimArgs {
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the single-cycle driver.
    #[arg(long)]
    no_pipeline: bool,

    /// Stall on every data hazard instead of forwarding.
    #[arg(long)]
    no_forwarding: bool,

    #[arg(long)]
    print_registers: bool,

    #[arg(long)]
    print_pipeline: bool,

    /// Follow the instruction with this fetch sequence number.
    #[arg(long, value_name = "N")]
    trace_instruction: Option<u64>,

    #[arg(long)]
    print_predictor: bool,

    /// Write the statistics report to FILE instead of stdout.
    #[arg(long, value_name = "FILE")]
    stats: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    stats_json: Option<PathBuf>,

    /// Write the final register file to FILE.
    #[arg(long, value_name = "FILE")]
    regs: Option<PathBuf>,

    /// Write the final data memory to FILE.
    #[arg(long, value_name = "FILE")]
    memory: Option<PathBuf>,
}

impl SimArgs {
    /// Loads the configuration file, if any, and applies flag overrides.
    fn config(&self) -> Result<Config> {
        let mut config = load_config(self.config.as_deref())?;

        if self.no_pipeline {
            config.pipeline.enabled = false;
        }
        if self.no_forwarding {
            config.pipeline.data_forwarding = false;
        }
        config.trace.print_registers |= self.print_registers;
        config.trace.print_pipeline_registers |= self.print_pipeline;
        config.trace.print_branch_predictor |= self.print_predictor;
        if self.trace_instruction.is_some() {
            config.trace.trace_instruction = self.trace_instruction;
        }
        Ok(config)
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let text = read(path)?;
            Config::from_toml(&text)
                .with_context(|| format!("invalid configuration {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = dispatch(cli.command) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Assemble { input, output, config } => {
            let config = load_config(config.as_deref())?;
            let assembly = assemble_file(&input, &config)?;
            fs::write(&output, listing::render(&assembly))
                .with_context(|| format!("cannot write {}", output.display()))?;
            println!(
                "[*] Wrote {} instructions to {}",
                assembly.instructions().count(),
                output.display()
            );
            if !assembly.is_clean() {
                bail!("assembly finished with errors");
            }
            Ok(())
        }
        Command::Simulate { input, opts } => {
            let config = opts.config()?;
            let text = read(&input)?;
            let image = loader::parse_listing(&text)
                .with_context(|| format!("cannot load {}", input.display()))?;
            run_image(image, &config, &opts)
        }
        Command::Run { input, opts } => {
            let config = opts.config()?;
            let assembly = assemble_file(&input, &config)?;
            if !assembly.is_clean() {
                bail!("assembly finished with errors");
            }
            run_image(ProgramImage::from_assembly(&assembly), &config, &opts)
        }
    }
}

/// Assembles `path` and prints one line per failed instruction or directive.
fn assemble_file(path: &Path, config: &Config) -> Result<Assembly> {
    let source = read(path)?;
    let assembler = Assembler::with_bases(
        config.memory.text_base_val(),
        config.memory.data_base_val(),
    );
    let assembly = assembler.assemble(&source);
    for err in assembly.errors() {
        eprintln!("{err}");
    }
    Ok(assembly)
}

fn run_image(image: ProgramImage, config: &Config, opts: &SimArgs) -> Result<()> {
    let outcome = sim::simulate(image, config);
    println!("[*] Halted: {:?}", outcome.halt);
    write_outputs(&outcome, opts)
}

fn write_outputs(outcome: &SimOutcome, opts: &SimArgs) -> Result<()> {
    match &opts.stats {
        Some(path) => write(path, &outcome.stats.report())?,
        None => outcome.stats.print(),
    }
    if let Some(path) = &opts.stats_json {
        let json = outcome.stats.to_json().context("cannot serialize statistics")?;
        write(path, &json)?;
    }
    match &opts.regs {
        Some(path) => write(path, &outcome.regs.to_string())?,
        None => print!("{}", outcome.regs),
    }
    if let Some(path) = &opts.memory {
        write(path, &outcome.memory.word_dump())?;
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("cannot write {}", path.display()))
}
