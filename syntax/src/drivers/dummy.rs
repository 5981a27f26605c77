use crate::{Instruction, ProtocolDriver, Severity};

/// Template bus mode: annotates every call and halts when `0xFF` is written.
#[derive(Debug, Clone, Default)]
pub struct Dummy {
    read_value: u32,
}

impl Dummy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value returned by every read.
    pub fn with_read_value(mut self, value: u32) -> Self {
        self.read_value = value;
        self
    }
}

impl ProtocolDriver for Dummy {
    fn name(&self) -> &'static str {
        "DUMMY1"
    }

    fn write(&mut self, instr: &mut Instruction, _next: Option<&Instruction>) {
        if instr.out_data == 0xff {
            instr.set_error(Severity::Error, "Halting: 0xff entered");
            return;
        }
        instr.set_data_message("--DUMMY1- write()");
    }

    fn read(&mut self, instr: &mut Instruction, _next: Option<&Instruction>) {
        instr.in_data = self.read_value & instr.mask();
        instr.set_data_message("--DUMMY1- read()");
    }

    fn start(&mut self, instr: &mut Instruction) {
        instr.set_data_message("-DUMMY1- start()");
    }

    fn start_alt(&mut self, instr: &mut Instruction) {
        self.start(instr);
    }

    fn stop(&mut self, instr: &mut Instruction) {
        instr.set_data_message("-DUMMY1- stop()");
    }

    fn stop_alt(&mut self, instr: &mut Instruction) {
        self.stop(instr);
    }

    fn tick_clock(&mut self, instr: &mut Instruction) {
        instr.set_data_message("-DUMMY1- clk()");
    }

    fn clock_high(&mut self, instr: &mut Instruction) {
        instr.set_data_message("-DUMMY1- clkh()");
    }

    fn clock_low(&mut self, instr: &mut Instruction) {
        instr.set_data_message("-DUMMY1- clkl()");
    }

    fn data_high(&mut self, instr: &mut Instruction) {
        instr.set_data_message("-DUMMY1- dath()");
    }

    fn data_low(&mut self, instr: &mut Instruction) {
        instr.set_data_message("-DUMMY1- datl()");
    }

    fn read_bit(&mut self, instr: &mut Instruction) {
        instr.in_data = self.read_value & 1;
        instr.set_data_message("-DUMMY1- bitr()");
    }
}
