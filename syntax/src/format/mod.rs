//! Phase three: renders an execution trace for the terminal.
//!
//! Consecutive writes or reads of the same radix share a `TX:`/`RX:` line,
//! wrapped every eight values (four for binary or ASCII). Everything else gets
//! a line of its own.

mod number;
mod style;

use std::fmt::Write;

pub use number::{adc_millivolts, effective_format, render_number};
pub use style::Palette;
use tracing::instrument;

use crate::{DisplayFormat, Instruction, NumberFormat, Opcode, SessionConfig, Severity};

/// Grouping state carried from one trace entry to the next.
#[derive(Debug, Default)]
struct OutputState {
    previous_opcode: Option<Opcode>,
    previous_number_format: Option<NumberFormat>,
    row_counter: u8,
}

pub struct Formatter<'a> {
    config: &'a SessionConfig,
    palette: Palette,
}

impl<'a> Formatter<'a> {
    pub fn new(config: &'a SessionConfig) -> Self {
        Self {
            config,
            palette: Palette::new(config.color),
        }
    }

    /// Renders `trace`, one output line per `\n`.
    ///
    /// Entries carrying a diagnostic get its message in parentheses right
    /// after them. Trailing whitespace and blank lines are dropped.
    #[instrument(level = "debug", skip_all, fields(entries = trace.len()))]
    pub fn format(&self, trace: &[Instruction]) -> String {
        let mut out = String::new();
        let mut state = OutputState::default();

        for entry in trace {
            self.format_entry(&mut out, &mut state, entry);
            state.previous_opcode = Some(entry.opcode);

            if entry.error != Severity::None {
                let message = entry.error_message.as_deref().unwrap_or_default();
                let _ = write!(out, "({message}) ");
            }
        }

        out.lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_entry(&self, out: &mut String, state: &mut OutputState, entry: &Instruction) {
        let p = &self.palette;
        match entry.opcode {
            Opcode::Write | Opcode::Read => self.format_data(out, state, entry),
            Opcode::Start | Opcode::Stop | Opcode::StartAlt | Opcode::StopAlt => {
                if let Some(message) = &entry.data_message {
                    let _ = write!(out, "\n{message}");
                }
            }
            Opcode::DelayUs | Opcode::DelayMs => {
                let unit = if entry.opcode == Opcode::DelayUs {
                    "us"
                } else {
                    "ms"
                };
                self.label(out, "Delay", entry.repeat as u32);
                out.push_str(unit);
            }
            Opcode::TickClock => self.label(out, "Tick clock", entry.repeat as u32),
            Opcode::ClockHigh | Opcode::ClockLow => {
                self.label(out, "Set CLK", (entry.opcode == Opcode::ClockHigh) as u32);
                self.annotate(out, entry);
            }
            Opcode::DataHigh | Opcode::DataLow => {
                self.label(out, "Set DAT", (entry.opcode == Opcode::DataHigh) as u32);
                self.annotate(out, entry);
            }
            Opcode::ReadBit => {
                self.label(out, "Read DAT", entry.in_data);
                self.annotate(out, entry);
            }
            Opcode::AuxOutputHigh | Opcode::AuxOutputLow => {
                let level = (entry.opcode == Opcode::AuxOutputHigh) as u32;
                let _ = write!(
                    out,
                    "\nIO{}{}{} set to OUTPUT: {}{level}{}",
                    p.number, entry.pin, p.reset, p.number, p.reset
                );
            }
            Opcode::AuxInput => {
                let _ = write!(
                    out,
                    "\nIO{}{}{} set to INPUT: {}{}{}",
                    p.number, entry.pin, p.reset, p.number, entry.in_data, p.reset
                );
            }
            Opcode::AdcRead => {
                let mv = adc_millivolts(entry.in_data);
                let _ = write!(
                    out,
                    "\n{}Volts on IO{}:{} {}{}.{:03}{} V",
                    p.info,
                    entry.pin,
                    p.reset,
                    p.number,
                    mv / 1000,
                    mv % 1000,
                    p.reset
                );
            }
        }
    }

    /// A `label: value` line in the notice colour.
    fn label(&self, out: &mut String, label: &str, value: u32) {
        let p = &self.palette;
        let _ = write!(
            out,
            "\n{}{label}:{} {}{value}{}",
            p.notice, p.reset, p.number, p.reset
        );
    }

    fn annotate(&self, out: &mut String, entry: &Instruction) {
        if let Some(message) = &entry.data_message {
            let _ = write!(out, " {message}");
        }
    }

    /// One value of a `TX:`/`RX:` row.
    fn format_data(&self, out: &mut String, state: &mut OutputState, entry: &Instruction) {
        let p = &self.palette;
        let display = self.config.display_format;
        let read = entry.opcode == Opcode::Read;

        let row_length = if entry.number_format == NumberFormat::Bin
            || display == DisplayFormat::Ascii
        {
            4
        } else {
            8
        };

        if state.previous_number_format != Some(entry.number_format)
            || state.previous_opcode != Some(entry.opcode)
        {
            state.row_counter = row_length;
            state.previous_number_format = Some(entry.number_format);
            let direction = if read { "RX" } else { "TX" };
            let _ = write!(out, "\n{}{direction}:{} ", p.info, p.reset);
        }

        let value = if read { entry.in_data } else { entry.out_data };
        let format = effective_format(entry, read, display);
        render_number(out, value, entry.bit_width, format, p);

        if entry.read_with_write {
            out.push('(');
            let echo_format = effective_format(entry, false, display);
            render_number(out, entry.in_data, entry.bit_width, echo_format, p);
            out.push(')');
        }

        match &entry.data_message {
            Some(message) => {
                let _ = write!(out, " {message} ");
            }
            None => out.push(' '),
        }

        state.row_counter = state.row_counter.saturating_sub(1);
        if state.row_counter == 0 {
            out.push_str("\n    ");
            state.row_counter = row_length;
        }
    }
}
