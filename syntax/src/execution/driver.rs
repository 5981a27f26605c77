use crate::{Instruction, Severity};

/// Message attached to capabilities a driver does not implement.
pub const NO_EFFECT: &str = "command has no effect here";

/// Marks `instr` as a no-op on the active bus.
pub fn no_effect(instr: &mut Instruction) {
    instr.set_error(Severity::Warn, NO_EFFECT);
}

/// A bus protocol the engine dispatches instructions to.
///
/// Every capability receives the trace entry to fill in (`in_data`, `error`,
/// `error_message`, `data_message`, `read_with_write`) and, where it applies,
/// the next compiled instruction as lookahead. Repeats are expanded by the
/// engine, so a call always handles exactly one entry.
///
/// Capabilities a protocol has no use for keep the default implementation,
/// which leaves a [`Severity::Warn`] entry saying the command has no effect.
pub trait ProtocolDriver {
    /// Name of the bus mode, for logs.
    fn name(&self) -> &'static str;

    /// Called once before a line runs.
    fn preflight(&mut self) {}

    /// Called once after a line ran, before the results are formatted.
    fn wait_done(&mut self) {}

    fn write(&mut self, instr: &mut Instruction, next: Option<&Instruction>) {
        let _ = next;
        no_effect(instr);
    }

    fn read(&mut self, instr: &mut Instruction, next: Option<&Instruction>) {
        let _ = next;
        no_effect(instr);
    }

    fn start(&mut self, instr: &mut Instruction) {
        no_effect(instr);
    }

    fn start_alt(&mut self, instr: &mut Instruction) {
        no_effect(instr);
    }

    fn stop(&mut self, instr: &mut Instruction) {
        no_effect(instr);
    }

    fn stop_alt(&mut self, instr: &mut Instruction) {
        no_effect(instr);
    }

    fn tick_clock(&mut self, instr: &mut Instruction) {
        no_effect(instr);
    }

    fn clock_high(&mut self, instr: &mut Instruction) {
        no_effect(instr);
    }

    fn clock_low(&mut self, instr: &mut Instruction) {
        no_effect(instr);
    }

    fn data_high(&mut self, instr: &mut Instruction) {
        no_effect(instr);
    }

    fn data_low(&mut self, instr: &mut Instruction) {
        no_effect(instr);
    }

    fn read_bit(&mut self, instr: &mut Instruction) {
        no_effect(instr);
    }
}
