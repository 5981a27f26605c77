use crate::ProtocolDriver;

/// High impedance: no bus is active, so every command has no effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct HiZ;

impl ProtocolDriver for HiZ {
    fn name(&self) -> &'static str {
        "HiZ"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{execution::NO_EFFECT, Instruction, Opcode, Severity};

    #[test]
    fn test_everything_has_no_effect() {
        let mut driver = HiZ;
        let mut entry = Instruction::new(Opcode::Read, 8);
        driver.read(&mut entry, None);
        assert_eq!(entry.error, Severity::Warn);
        assert_eq!(entry.error_message.as_deref(), Some(NO_EFFECT));

        let mut entry = Instruction::new(Opcode::TickClock, 8);
        driver.tick_clock(&mut entry);
        assert_eq!(entry.error, Severity::Warn);
    }
}
