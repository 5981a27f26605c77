use super::{Board, ProtocolDriver};
use crate::{Instruction, PinFunction, PinTable};

/// Pin labels of script-driven aux outputs, indexed by level.
const AUX_LABELS: [&str; 2] = ["AUXL", "AUXH"];

/// The collaborators a running program touches.
pub struct ExecutionContext<'a> {
    pub driver: &'a mut dyn ProtocolDriver,
    pub board: &'a mut dyn Board,
    pub pins: &'a mut dyn PinTable,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        driver: &'a mut dyn ProtocolDriver,
        board: &'a mut dyn Board,
        pins: &'a mut dyn PinTable,
    ) -> Self {
        Self {
            driver,
            board,
            pins,
        }
    }

    /// Drives an aux pin and marks it as owned by the script.
    pub(crate) fn aux_output(&mut self, entry: &Instruction, level: bool) {
        let pin = entry.pin;
        self.board.set_output(pin);
        self.board.put(pin, level);
        self.pins.claim(pin, PinFunction::Io, AUX_LABELS[level as usize]);
        self.pins.set_aux_active(pin, true);
    }

    /// Turns an aux pin back into an input and captures its level.
    pub(crate) fn aux_input(&mut self, entry: &mut Instruction) {
        let pin = entry.pin;
        self.board.set_input(pin);
        entry.in_data = self.board.get(pin) as u32;
        self.pins.release(pin);
        self.pins.set_aux_active(pin, false);
    }

    pub(crate) fn adc_read(&mut self, entry: &mut Instruction) {
        entry.in_data = self.board.adc_sample(entry.pin);
    }
}
