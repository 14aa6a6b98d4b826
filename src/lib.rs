//! RV64 assembler and pipelined simulator library.
//!
//! This crate assembles a subset of RV64I plus the M extension into a
//! machine-code listing, and runs that listing on a cycle-level model of the
//! classic five-stage in-order pipeline.
//!
//! # Architecture
//!
//! * **Assembler**: two-pass, with labels, data directives and a textual
//!   listing that doubles as the simulator's input format.
//! * **Core**: Fetch, Decode, Execute, Memory, Writeback with hazard
//!   detection, optional forwarding and a 1-bit branch predictor with BTB.
//!   A single-cycle driver shares the same execution units.
//!
//! # Modules
//!
//! * `asm`: Assembler passes, symbols, directives and listing output.
//! * `common`: Shared constants and error types.
//! * `config`: Configuration loading and parsing.
//! * `core`: Pipelined and single-cycle CPU models.
//! * `isa`: Instruction formats, immediates, encoder and decoder.
//! * `sim`: Program images, listing loader and simulation entry point.
//! * `soc`: Byte-addressed data memory.
//! * `stats`: Performance statistics collection.

/// Two-pass assembler producing encoded instructions and initial data.
pub mod asm;

/// Shared constants and error types.
pub mod common;

/// Configuration system for the execution model, diagnostics and memory layout.
///
/// Loads and validates TOML documents; every field has a default.
pub mod config;

/// CPU implementations: the five-stage pipeline and the single-cycle reference.
pub mod core;

/// Instruction Set Architecture definitions, encoder and decoder.
///
/// Covers the R, I, S, B, U and J formats used by the supported RV64I and
/// RV64M instructions, including the immediate scrambling of each format.
pub mod isa;

/// Simulation harness and listing loader.
pub mod sim;

/// Data memory.
pub mod soc;

/// Performance statistics collection and reporting.
pub mod stats;
