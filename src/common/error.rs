//! Error taxonomy.
//!
//! Assembly errors are per-instruction and never abort a whole run: the
//! assembler records an [`EncodeError`] for the offending line and keeps
//! going. Loader and configuration errors are returned to the caller,
//! which decides whether to abort.

use thiserror::Error;

/// A failure while parsing or encoding a single field of an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text is not a well-formed numeric literal.
    #[error("malformed numeric literal `{0}`")]
    InvalidLiteral(String),

    /// A signed immediate does not fit in its field.
    #[error("immediate {value} does not fit in a signed {bits}-bit field")]
    ImmediateOutOfRange { value: i64, bits: u32 },

    /// An upper immediate does not fit in 20 unsigned bits.
    #[error("upper immediate {0} does not fit in 20 bits")]
    UpperImmediateOutOfRange(i64),

    /// A register operand is neither `x0`..`x31` nor an ABI name.
    #[error("unknown register `{0}`")]
    InvalidRegister(String),

    /// The mnemonic is not part of the supported instruction set.
    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),

    /// A branch or jump refers to a label that was never defined.
    #[error("unresolved symbol `{0}`")]
    UnresolvedSymbol(String),

    /// A branch or jump offset is not a multiple of 4.
    #[error("target offset {0} is not a multiple of 4")]
    MisalignedTarget(i64),

    /// The instruction has the wrong number of operands.
    #[error("`{mnemonic}` expects {expected} operands, found {found}")]
    OperandCount {
        mnemonic: String,
        expected: usize,
        found: usize,
    },

    /// A memory operand is not of the form `offset(register)`.
    #[error("malformed memory operand `{0}`")]
    InvalidMemoryOperand(String),

    /// A data directive is not recognised or is missing its values.
    #[error("malformed data directive `{0}`")]
    InvalidDirective(String),
}

/// A source line that could not be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error in encoding instruction: {line}")]
pub struct EncodeError {
    /// The offending source text, trimmed.
    pub line: String,
    /// The first field that failed.
    #[source]
    pub source: ParseError,
}

/// A failure while reading a machine-code listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// A text or data line does not follow the listing format.
    #[error("line {line_no}: malformed listing line `{text}`")]
    MalformedLine { line_no: usize, text: String },

    /// A hex field could not be parsed.
    #[error("line {line_no}: invalid hex value `{value}`")]
    InvalidHex { line_no: usize, value: String },

    /// An instruction address is not 4-byte aligned.
    #[error("line {line_no}: instruction address {addr:#x} is not word aligned")]
    MisalignedInstruction { line_no: usize, addr: u64 },
}

/// A failure while reading simulator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be deserialized.
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// An address field is not a valid hex string.
    #[error("invalid hex address `{value}` for `{field}`")]
    InvalidAddress { field: &'static str, value: String },
}
