//! Phase two: runs a compiled [`Program`](crate::Program) against the active
//! bus protocol.
//!
//! Repeats of WRITE, READ and READ_BIT are expanded into independent trace
//! entries. Delays and the aux pin opcodes are handled by the engine itself
//! through the [`Board`]; everything else goes to the [`ProtocolDriver`].

mod board;
mod context;
mod driver;
mod engine;
mod trace;

pub use board::{Board, PinDirection, SimulatedBoard};
pub use context::ExecutionContext;
pub use driver::{no_effect, ProtocolDriver, NO_EFFECT};
pub use engine::Engine;
pub use trace::Trace;
