use tracing::{debug, instrument};

use super::{ExecutionContext, Trace};
use crate::{DispatchStats, Instruction, Opcode, Program, Severity};

/// Runs compiled programs and records what happened in a [`Trace`].
#[derive(Debug)]
pub struct Engine {
    capacity: usize,
    stats: DispatchStats,
}

impl Engine {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            stats: DispatchStats::new(),
        }
    }

    pub const fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Executes `program` in order.
    ///
    /// Stops right after the first entry at [`Severity::Error`]. If the trace
    /// runs out of room, a last entry carrying the overflow error is pushed
    /// instead of running the next slot.
    #[instrument(
        level = "debug",
        skip_all,
        fields(driver = ctx.driver.name(), instructions = program.len())
    )]
    pub fn run(&mut self, program: &Program, ctx: &mut ExecutionContext<'_>) -> Trace {
        let mut trace = Trace::new(self.capacity);

        for (pos, source) in program.iter().enumerate() {
            let next = program.get(pos + 1);
            let count = if source.opcode.expands_repeat() {
                source.repeat.max(1)
            } else {
                1
            };

            for j in 0..count {
                let mut entry = source.clone();

                if trace.is_full() {
                    entry.set_error(
                        Severity::Error,
                        format!("result exceeds available space ({} slots)", trace.capacity()),
                    );
                    debug!(pos, capacity = trace.capacity(), "trace full");
                    trace.push(entry);
                    return trace;
                }

                // Only the final read of a run gets to look past it.
                let lookahead = if j + 1 == count { next } else { None };
                source.opcode.dispatch(ctx, &mut entry, lookahead, &mut self.stats);

                let fatal = entry.is_fatal();
                trace.push(entry);
                if fatal {
                    debug!(pos, repeat = j, "halted");
                    return trace;
                }
            }
        }

        trace
    }
}

impl Opcode {
    /// Runs one trace entry, through the driver or the board.
    #[instrument(
        level = "trace",
        skip(ctx, entry, next, stats),
        fields(
            out_data = %format!("0x{:x}", entry.out_data),
            bits = entry.bit_width,
            repeat = entry.repeat,
        )
    )]
    pub(crate) fn dispatch(
        self,
        ctx: &mut ExecutionContext<'_>,
        entry: &mut Instruction,
        next: Option<&Instruction>,
        stats: &mut DispatchStats,
    ) {
        stats.record(self, || match self {
            Opcode::Write => ctx.driver.write(entry, None),
            Opcode::Read => ctx.driver.read(entry, next),
            Opcode::Start => ctx.driver.start(entry),
            Opcode::Stop => ctx.driver.stop(entry),
            Opcode::StartAlt => ctx.driver.start_alt(entry),
            Opcode::StopAlt => ctx.driver.stop_alt(entry),
            Opcode::TickClock => {
                for _ in 0..entry.repeat {
                    ctx.driver.tick_clock(entry);
                }
            }
            Opcode::ClockHigh => ctx.driver.clock_high(entry),
            Opcode::ClockLow => ctx.driver.clock_low(entry),
            Opcode::DataHigh => ctx.driver.data_high(entry),
            Opcode::DataLow => ctx.driver.data_low(entry),
            Opcode::ReadBit => ctx.driver.read_bit(entry),
            Opcode::DelayUs => ctx.board.delay_us(entry.repeat as u32),
            Opcode::DelayMs => ctx.board.delay_ms(entry.repeat as u32),
            Opcode::AuxOutputHigh => ctx.aux_output(entry, true),
            Opcode::AuxOutputLow => ctx.aux_output(entry, false),
            Opcode::AuxInput => ctx.aux_input(entry),
            Opcode::AdcRead => ctx.adc_read(entry),
        })
    }
}
