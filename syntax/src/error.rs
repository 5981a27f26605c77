//! Error types for the ProbeScript syntax pipeline.

use thiserror::Error;

/// Reasons a script line is rejected before anything runs.
///
/// Positions are 1-based character offsets into the submitted line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("integer parse failed at position {position}")]
    IntegerParse { position: usize },

    #[error("string missing terminating '\"' at position {position}")]
    UnterminatedString { position: usize },

    #[error("unknown syntax '{symbol}' at position {position}")]
    UnknownSyntax { symbol: char, position: usize },

    #[error("missing IO number for command {symbol} at position {position}, try {symbol}.0")]
    MissingPin { symbol: char, position: usize },

    #[error("pin IO{pin} is invalid")]
    InvalidPin { pin: u32, position: usize },

    #[error("at position {position} IO{pin} is already in use")]
    PinInUse { pin: u8, position: usize },

    #[error("invalid bit width {bits} at position {position}, try 1-32")]
    InvalidBitWidth { bits: u32, position: usize },

    #[error("repeat count {repeat} at position {position} exceeds 65535")]
    RepeatOverflow { repeat: u32, position: usize },

    #[error("syntax exceeds available space ({capacity} slots)")]
    ExceedsCapacity { capacity: usize },
}

/// Invalid session settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("default bit width {0} is out of range, expected 1-32")]
    BitWidth(u8),

    #[error("pin count {0} is out of range, expected 1-32")]
    PinCount(u8),

    #[error("slot capacity {0} is too small")]
    Capacity(usize),
}

/// Failures of a whole compile, run and format pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("syntax compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("nothing to execute")]
    EmptyProgram,
}
