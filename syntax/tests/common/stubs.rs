use std::collections::VecDeque;

use probescript_syntax::{Instruction, Opcode, ProtocolDriver, Severity};

/// One driver call as seen by a stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub opcode: Opcode,
    pub lookahead: Option<Opcode>,
}

/// Reads return 1, 2, 3... and every call is recorded. Optionally flags the
/// nth call with a diagnostic.
#[derive(Debug, Default)]
pub struct CountingDriver {
    pub calls: Vec<Call>,
    pub flag_on: Option<(usize, Severity)>,
    pub preflights: usize,
    pub wait_dones: usize,
    counter: u32,
}

impl CountingDriver {
    pub fn failing_on(call: usize) -> Self {
        Self::flagging_on(call, Severity::Error)
    }

    pub fn flagging_on(call: usize, severity: Severity) -> Self {
        Self {
            flag_on: Some((call, severity)),
            ..Self::default()
        }
    }

    pub fn count(&self, opcode: Opcode) -> usize {
        self.calls.iter().filter(|c| c.opcode == opcode).count()
    }

    fn record(&mut self, instr: &mut Instruction, next: Option<&Instruction>) {
        self.calls.push(Call {
            opcode: instr.opcode,
            lookahead: next.map(|n| n.opcode),
        });
        if let Some((call, severity)) = self.flag_on {
            if call == self.calls.len() {
                instr.set_error(severity, "stub failure");
            }
        }
    }
}

impl ProtocolDriver for CountingDriver {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn preflight(&mut self) {
        self.preflights += 1;
    }

    fn wait_done(&mut self) {
        self.wait_dones += 1;
    }

    fn write(&mut self, instr: &mut Instruction, next: Option<&Instruction>) {
        self.record(instr, next);
    }

    fn read(&mut self, instr: &mut Instruction, next: Option<&Instruction>) {
        self.counter += 1;
        instr.in_data = self.counter;
        self.record(instr, next);
    }

    fn start(&mut self, instr: &mut Instruction) {
        self.record(instr, None);
    }

    fn stop(&mut self, instr: &mut Instruction) {
        self.record(instr, None);
    }

    fn tick_clock(&mut self, instr: &mut Instruction) {
        self.record(instr, None);
    }

    fn read_bit(&mut self, instr: &mut Instruction) {
        instr.in_data = 1;
        self.record(instr, None);
    }
}

/// Minimal I2C bus: framing messages and canned read data.
#[derive(Debug, Default)]
pub struct FakeI2c {
    pub reads: VecDeque<u32>,
    pub dispatched: usize,
}

impl FakeI2c {
    pub fn new(reads: impl IntoIterator<Item = u32>) -> Self {
        Self {
            reads: reads.into_iter().collect(),
            dispatched: 0,
        }
    }
}

impl ProtocolDriver for FakeI2c {
    fn name(&self) -> &'static str {
        "fake i2c"
    }

    fn start(&mut self, instr: &mut Instruction) {
        self.dispatched += 1;
        instr.set_data_message("I2C START");
    }

    fn stop(&mut self, instr: &mut Instruction) {
        self.dispatched += 1;
        instr.set_data_message("I2C STOP");
    }

    fn write(&mut self, _instr: &mut Instruction, _next: Option<&Instruction>) {
        self.dispatched += 1;
    }

    fn read(&mut self, instr: &mut Instruction, _next: Option<&Instruction>) {
        self.dispatched += 1;
        instr.in_data = self.reads.pop_front().unwrap_or(0xff);
    }
}
