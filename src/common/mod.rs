//! Common types used throughout the assembler and simulator.
//!
//! This module provides the error taxonomy and the fixed addresses that
//! are shared between the assembler, the loader, and the simulator core.

/// Common constants used throughout the toolchain.
pub mod constants;

/// Error types for assembly, loading, and configuration.
pub mod error;

pub use constants::{DATA_BASE, INSTRUCTION_BYTES, STACK_POINTER, TEXT_BASE};
pub use error::{ConfigError, EncodeError, LoadError, ParseError};
