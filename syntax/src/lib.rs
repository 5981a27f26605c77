//! ProbeScript bus syntax.
//!
//! A line such as `[0x40 r:4]` goes through three phases:
//!
//! 1. the [`Compiler`] turns it into a bounded [`Program`],
//! 2. the [`Engine`] runs the program against a [`ProtocolDriver`] and records
//!    a [`Trace`],
//! 3. the [`Formatter`] renders the trace as text.
//!
//! [`Session`] wires the three together for one submitted line.

pub mod compiler;
mod config;
pub mod drivers;
pub mod error;
pub mod execution;
pub mod format;
mod instruction;
mod opcodes;
mod pins;
mod session;
mod stats;
mod util;

pub use compiler::{CharSource, Compiler, LineCursor};
pub use config::{DisplayFormat, SessionConfig};
pub use error::{CompileError, ConfigError, SyntaxError};
pub use execution::{Board, Engine, ProtocolDriver, SimulatedBoard, Trace};
pub use format::Formatter;
pub use instruction::{
    bit_mask, Instruction, NumberFormat, Program, Severity, MAX_REPEAT, MAX_SLOTS,
};
pub use opcodes::Opcode;
pub use pins::{PinFunction, PinRegistry, PinTable};
pub use session::{Session, SessionOutput};
pub use stats::DispatchStats;
pub use util::init_logger;
