//! Simulator configuration.
//!
//! Loaded from TOML. Every section and field has a default, so an empty
//! document is a valid configuration. Addresses are hex strings, as in
//! `data_base = "0x10000000"`, and are checked when the file is parsed.

use serde::{Deserialize, Serialize};

use crate::common::constants::{DATA_BASE, STACK_POINTER, TEXT_BASE};
use crate::common::error::ConfigError;

/// Top-level configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.memory.validate()?;
        Ok(config)
    }
}

/// Execution model.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Run the five-stage pipeline; `false` selects the single-cycle driver.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Resolve non-load hazards by forwarding instead of stalling.
    #[serde(default = "default_true")]
    pub data_forwarding: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            data_forwarding: true,
        }
    }
}

/// Per-cycle diagnostic output.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TraceConfig {
    /// Log the register file after every cycle.
    #[serde(default)]
    pub print_registers: bool,
    /// Log all four pipeline registers after every cycle.
    #[serde(default)]
    pub print_pipeline_registers: bool,
    /// Follow one instruction, by fetch sequence number, through the pipeline.
    #[serde(default)]
    pub trace_instruction: Option<u64>,
    /// Log the predictor tables after every cycle.
    #[serde(default)]
    pub print_branch_predictor: bool,
}

/// Memory layout.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct MemoryConfig {
    #[serde(default = "default_text_base")]
    pub text_base: String,

    #[serde(default = "default_data_base")]
    pub data_base: String,

    #[serde(default = "default_stack_pointer")]
    pub stack_pointer: String,

    /// Start `sp` and `s0` at `stack_pointer` instead of zero.
    #[serde(default)]
    pub seed_stack: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            text_base: default_text_base(),
            data_base: default_data_base(),
            stack_pointer: default_stack_pointer(),
            seed_stack: false,
        }
    }
}

impl MemoryConfig {
    pub fn text_base_val(&self) -> u64 {
        parse_hex(&self.text_base).unwrap_or(TEXT_BASE)
    }

    pub fn data_base_val(&self) -> u64 {
        parse_hex(&self.data_base).unwrap_or(DATA_BASE)
    }

    pub fn stack_pointer_val(&self) -> u64 {
        parse_hex(&self.stack_pointer).unwrap_or(STACK_POINTER)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("text_base", &self.text_base),
            ("data_base", &self.data_base),
            ("stack_pointer", &self.stack_pointer),
        ];
        for (field, value) in fields {
            if parse_hex(value).is_none() {
                return Err(ConfigError::InvalidAddress {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

fn parse_hex(s: &str) -> Option<u64> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(digits, 16).ok()
}

fn default_true() -> bool {
    true
}

fn default_text_base() -> String {
    format!("{:#x}", TEXT_BASE)
}

fn default_data_base() -> String {
    format!("{:#x}", DATA_BASE)
}

fn default_stack_pointer() -> String {
    format!("{:#x}", STACK_POINTER)
}
