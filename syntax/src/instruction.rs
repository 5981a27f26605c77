//! The instruction record shared by the compiler, the engine and the formatter.

use std::borrow::Cow;
use std::ops::Deref;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::Opcode;

/// Default capacity of compiled programs and execution traces, in slots.
pub const MAX_SLOTS: usize = 1024;

/// Largest repeat count an instruction can carry.
pub const MAX_REPEAT: u16 = u16::MAX;

/// Radix a literal was written in, or that a value should be rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NumberFormat {
    #[default]
    Hex,
    Dec,
    Bin,
    Ascii,
}

/// Severity attached to an instruction by a driver or the engine.
///
/// Anything at or above [`Severity::Error`] halts execution.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(u8)]
pub enum Severity {
    #[default]
    None = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Severity {
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

/// One scripted operation.
///
/// The same record is compiled, cloned into the execution trace, filled in by
/// the protocol driver and finally rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub number_format: NumberFormat,
    /// Significant bits of `out_data`/`in_data`, always in `1..=32`.
    pub bit_width: u8,
    /// Slot count for repeatable opcodes, magnitude for delays and clock ticks.
    pub repeat: u16,
    /// IO pin index for pin opcodes.
    pub pin: u8,
    pub has_bits: bool,
    pub has_repeat: bool,
    /// Set by full-duplex drivers when `in_data` holds the echo of a write.
    pub read_with_write: bool,
    pub out_data: u32,
    pub in_data: u32,
    pub error: Severity,
    pub error_message: Option<Cow<'static, str>>,
    pub data_message: Option<Cow<'static, str>>,
}

impl Instruction {
    pub fn new(opcode: Opcode, bit_width: u8) -> Self {
        Self {
            opcode,
            number_format: NumberFormat::default(),
            bit_width,
            repeat: 1,
            pin: 0,
            has_bits: false,
            has_repeat: false,
            read_with_write: false,
            out_data: 0,
            in_data: 0,
            error: Severity::None,
            error_message: None,
            data_message: None,
        }
    }

    /// A WRITE of `value` as it was written in the script.
    pub fn write(value: u32, number_format: NumberFormat, bit_width: u8) -> Self {
        Self {
            out_data: value,
            number_format,
            ..Self::new(Opcode::Write, bit_width)
        }
    }

    /// Records a driver or engine diagnostic on this instruction.
    pub fn set_error(&mut self, severity: Severity, message: impl Into<Cow<'static, str>>) {
        self.error = severity;
        self.error_message = Some(message.into());
    }

    pub fn set_data_message(&mut self, message: impl Into<Cow<'static, str>>) {
        self.data_message = Some(message.into());
    }

    pub const fn is_fatal(&self) -> bool {
        self.error.is_fatal()
    }

    /// Mask selecting the `bit_width` low bits.
    pub const fn mask(&self) -> u32 {
        bit_mask(self.bit_width)
    }
}

/// Mask selecting the `bits` low bits of a 32-bit word.
pub const fn bit_mask(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// A compiled program: instructions in execution order.
///
/// Built only by the [`Compiler`](crate::Compiler), which guarantees that the
/// slots it expands to stay below `capacity`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    slots: usize,
}

impl Program {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            instructions: Vec::with_capacity(capacity.min(MAX_SLOTS)),
            slots: 0,
        }
    }

    pub(crate) fn push(&mut self, instruction: Instruction) {
        self.slots += instruction.opcode.slot_cost(instruction.repeat);
        self.instructions.push(instruction);
    }

    /// Number of trace slots the program is expected to expand to.
    pub const fn slots(&self) -> usize {
        self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }
}

impl Deref for Program {
    type Target = [Instruction];

    fn deref(&self) -> &Self::Target {
        &self.instructions
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        let mut program = Program::default();
        for instruction in iter {
            program.push(instruction);
        }
        program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_mask() {
        assert_eq!(bit_mask(1), 0b1);
        assert_eq!(bit_mask(4), 0x0f);
        assert_eq!(bit_mask(8), 0xff);
        assert_eq!(bit_mask(32), u32::MAX);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::None < Severity::Debug);
        assert!(Severity::Error.is_fatal());
        assert!(!Severity::Warn.is_fatal());
    }

    #[test]
    fn test_program_counts_slots() {
        let mut read = Instruction::new(Opcode::Read, 8);
        read.repeat = 3;
        let mut delay = Instruction::new(Opcode::DelayMs, 8);
        delay.repeat = 250;
        let program: Program = [read, delay].into_iter().collect();
        assert_eq!(program.len(), 2);
        assert_eq!(program.slots(), 4);
    }
}
