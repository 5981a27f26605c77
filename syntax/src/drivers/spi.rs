use std::collections::VecDeque;

use crate::{Instruction, ProtocolDriver};

/// Simulated SPI controller.
///
/// MISO is looped back to MOSI unless responses were queued, in which case
/// every transfer shifts in the next queued value. `{` selects the chip and
/// turns on echoing the data read during writes.
#[derive(Debug, Clone, Default)]
pub struct SimSpi {
    responses: VecDeque<u32>,
    selected: bool,
    read_with_write: bool,
}

impl SimSpi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues values to be shifted in by the next transfers.
    pub fn with_responses(mut self, responses: impl IntoIterator<Item = u32>) -> Self {
        self.responses.extend(responses);
        self
    }

    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    fn transfer(&mut self, out: u32) -> u32 {
        self.responses.pop_front().unwrap_or(out)
    }

    fn select(&mut self, instr: &mut Instruction, read_with_write: bool) {
        self.read_with_write = read_with_write;
        self.selected = true;
        instr.set_data_message("CS Enabled");
    }

    fn deselect(&mut self, instr: &mut Instruction) {
        self.read_with_write = false;
        self.selected = false;
        instr.set_data_message("CS Disabled");
    }
}

impl ProtocolDriver for SimSpi {
    fn name(&self) -> &'static str {
        "SPI"
    }

    fn start(&mut self, instr: &mut Instruction) {
        self.select(instr, false);
    }

    fn start_alt(&mut self, instr: &mut Instruction) {
        self.select(instr, true);
    }

    fn stop(&mut self, instr: &mut Instruction) {
        self.deselect(instr);
    }

    fn stop_alt(&mut self, instr: &mut Instruction) {
        self.deselect(instr);
    }

    fn write(&mut self, instr: &mut Instruction, _next: Option<&Instruction>) {
        instr.in_data = self.transfer(instr.out_data) & instr.mask();
        instr.read_with_write = self.read_with_write;
    }

    fn read(&mut self, instr: &mut Instruction, _next: Option<&Instruction>) {
        instr.in_data = self.transfer(u32::MAX) & instr.mask();
    }
}
