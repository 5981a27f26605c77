//! Phase one: turns a line of bus syntax into a [`Program`].
//!
//! The compiler walks the line one character at a time. Digits start a
//! numeric literal, `"` starts a string whose characters are written one by
//! one, and everything else is looked up in the opcode symbol table. Each
//! command can be followed by a `.N` bit width (or pin index) and a `:N`
//! repeat count, in either order.
//!
//! Nothing is executed here. Scripts that would overflow the trace or drive a
//! pin owned by something else are rejected before the engine sees them.

mod cursor;
mod literal;

pub use cursor::{CharSource, LineCursor};
use literal::{parse_attribute, parse_number};
use tracing::{debug, instrument, trace, warn};

use crate::{
    error::CompileError, Instruction, NumberFormat, Opcode, PinFunction, PinTable, Program,
    SessionConfig, MAX_REPEAT,
};

/// Characters between commands that carry no meaning.
fn is_separator(c: char) -> bool {
    c <= ' ' || c > '~' || c == '>' || c == ','
}

/// Attribute values as written, before they are validated for the opcode.
#[derive(Debug, Default)]
struct Attributes {
    bits: Option<u32>,
    repeat: Option<u32>,
}

pub struct Compiler<'a> {
    config: &'a SessionConfig,
    pins: &'a dyn PinTable,
}

impl<'a> Compiler<'a> {
    pub fn new(config: &'a SessionConfig, pins: &'a dyn PinTable) -> Self {
        Self { config, pins }
    }

    /// Compiles everything left in `src`.
    ///
    /// Either the whole line compiles or nothing does: on error no program is
    /// returned and the rest of the line is left unread.
    #[instrument(level = "debug", skip_all, fields(capacity = self.config.capacity))]
    pub fn compile<S>(&self, src: &mut S) -> Result<Program, CompileError>
    where
        S: CharSource + ?Sized,
    {
        let result = self.compile_line(src);
        match &result {
            Ok(program) => trace!(
                instructions = program.len(),
                slots = program.slots(),
                "compiled"
            ),
            Err(err) => warn!(%err, "rejected syntax"),
        }
        result
    }

    /// Convenience wrapper compiling a whole string.
    pub fn compile_str(&self, line: &str) -> Result<Program, CompileError> {
        self.compile(&mut LineCursor::new(line))
    }

    fn compile_line<S>(&self, src: &mut S) -> Result<Program, CompileError>
    where
        S: CharSource + ?Sized,
    {
        let mut program = Program::with_capacity(self.config.capacity);

        while let Some(c) = src.peek(0) {
            let position = src.position() + 1;

            if is_separator(c) {
                src.discard(1);
                continue;
            }

            let mut instruction = if c.is_ascii_digit() {
                let (value, format) =
                    parse_number(src).ok_or(CompileError::IntegerParse { position })?;
                Instruction::write(value, format, self.config.bit_width)
            } else if c == '"' {
                self.compile_string(src, &mut program, position)?;
                continue;
            } else {
                let opcode = Opcode::from_symbol(c)
                    .ok_or(CompileError::UnknownSyntax { symbol: c, position })?;
                src.discard(1);
                Instruction::new(opcode, self.config.bit_width)
            };

            let attributes = Self::parse_attributes(src, position)?;
            self.apply_attributes(&mut instruction, attributes, c, position)?;
            self.reserve(&program, instruction.opcode.slot_cost(instruction.repeat))?;

            debug!(
                opcode = instruction.opcode.name(),
                out_data = instruction.out_data,
                bits = instruction.bit_width,
                repeat = instruction.repeat,
                position,
                "instruction"
            );
            program.push(instruction);
        }

        Ok(program)
    }

    /// Expands a quoted string into one ASCII write per UTF-8 byte.
    fn compile_string<S>(
        &self,
        src: &mut S,
        program: &mut Program,
        position: usize,
    ) -> Result<(), CompileError>
    where
        S: CharSource + ?Sized,
    {
        src.discard(1);

        let mut length = 0;
        loop {
            match src.peek(length) {
                Some('"') => break,
                Some(_) => length += 1,
                None => return Err(CompileError::UnterminatedString { position }),
            }
        }

        let mut utf8 = [0u8; 4];
        for _ in 0..length {
            let Some(c) = src.remove() else {
                break;
            };
            // one write per byte on the wire
            for byte in c.encode_utf8(&mut utf8).bytes() {
                self.reserve(program, 1)?;
                program.push(Instruction::write(
                    byte as u32,
                    NumberFormat::Ascii,
                    self.config.bit_width,
                ));
            }
        }

        // closing quote
        src.discard(1);
        Ok(())
    }

    /// Reads the optional `.N` and `:N` attributes, each at most once.
    fn parse_attributes<S>(src: &mut S, position: usize) -> Result<Attributes, CompileError>
    where
        S: CharSource + ?Sized,
    {
        let mut attributes = Attributes::default();
        loop {
            if attributes.bits.is_none() {
                if let Some(bits) = parse_attribute(src, '.') {
                    attributes.bits = Some(bits.ok_or(CompileError::IntegerParse { position })?);
                    continue;
                }
            }
            if attributes.repeat.is_none() {
                if let Some(repeat) = parse_attribute(src, ':') {
                    attributes.repeat =
                        Some(repeat.ok_or(CompileError::IntegerParse { position })?);
                    continue;
                }
            }
            return Ok(attributes);
        }
    }

    fn apply_attributes(
        &self,
        instruction: &mut Instruction,
        attributes: Attributes,
        symbol: char,
        position: usize,
    ) -> Result<(), CompileError> {
        if let Some(repeat) = attributes.repeat {
            if repeat > MAX_REPEAT as u32 {
                return Err(CompileError::RepeatOverflow { repeat, position });
            }
            instruction.repeat = (repeat as u16).max(1);
            instruction.has_repeat = true;
        }

        if instruction.opcode.is_pin_opcode() {
            let pin = attributes
                .bits
                .ok_or(CompileError::MissingPin { symbol, position })?;
            if pin >= self.config.pin_count as u32 {
                return Err(CompileError::InvalidPin { pin, position });
            }
            let pin = pin as u8;
            if instruction.opcode.claims_pin() && self.pins.get(pin) != PinFunction::Io {
                return Err(CompileError::PinInUse { pin, position });
            }
            instruction.pin = pin;
            instruction.has_bits = true;
        } else if let Some(bits) = attributes.bits {
            if !(1..=32).contains(&bits) {
                return Err(CompileError::InvalidBitWidth { bits, position });
            }
            instruction.bit_width = bits as u8;
            instruction.has_bits = true;
        }

        Ok(())
    }

    /// Fails when `cost` more slots would not leave room in the trace.
    fn reserve(&self, program: &Program, cost: usize) -> Result<(), CompileError> {
        if program.slots() + cost >= self.config.capacity {
            return Err(CompileError::ExceedsCapacity {
                capacity: self.config.capacity,
            });
        }
        Ok(())
    }
}
