use tracing::warn;

use crate::{Instruction, ProtocolDriver, Severity};

const NO_PULL_UP: &str = "no pull-up detected. Use P to enable onboard pull-up resistors";

/// A target device on the simulated bus: a 7-bit address and a register file.
#[derive(Debug, Clone)]
struct Target {
    address: u8,
    registers: [u8; 256],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    /// START sent, the next write is an address byte.
    Address,
    /// A target acknowledged its address. The first byte written sets the
    /// register pointer.
    Addressed { target: usize, pointer_set: bool },
    /// Nobody answered the address.
    Nacked,
}

/// Simulated I2C controller with register-file targets.
///
/// Reads acknowledge every byte except the last one before a START or STOP,
/// which is NACKed as the protocol requires. A stuck bus makes START time out.
#[derive(Debug, Clone)]
pub struct SimI2c {
    targets: Vec<Target>,
    pull_ups: bool,
    stuck: bool,
    start_sent: bool,
    phase: Phase,
    pointer: u8,
}

impl Default for SimI2c {
    fn default() -> Self {
        Self::new()
    }
}

impl SimI2c {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            pull_ups: true,
            stuck: false,
            start_sent: false,
            phase: Phase::Idle,
            pointer: 0,
        }
    }

    /// Adds a target answering at the 7-bit `address`, registers starting at 0.
    pub fn with_target(mut self, address: u8, registers: &[u8]) -> Self {
        let mut file = [0u8; 256];
        for (slot, value) in file.iter_mut().zip(registers) {
            *slot = *value;
        }
        self.targets.push(Target {
            address: address & 0x7f,
            registers: file,
        });
        self
    }

    pub fn with_pull_ups(mut self, enabled: bool) -> Self {
        self.pull_ups = enabled;
        self
    }

    /// Holds SDA low so bus conditions can't be generated.
    pub fn with_stuck_bus(mut self) -> Self {
        self.stuck = true;
        self
    }

    /// Register `index` of the target at `address`.
    pub fn register(&self, address: u8, index: u8) -> Option<u8> {
        self.targets
            .iter()
            .find(|t| t.address == address)
            .map(|t| t.registers[index as usize])
    }

    fn condition(&mut self, instr: &mut Instruction) -> bool {
        if self.stuck {
            instr.set_error(Severity::Error, "I2C timeout");
            return false;
        }
        true
    }
}

impl ProtocolDriver for SimI2c {
    fn name(&self) -> &'static str {
        "I2C"
    }

    fn preflight(&mut self) {
        if !self.pull_ups {
            warn!("{}", NO_PULL_UP);
        }
    }

    fn start(&mut self, instr: &mut Instruction) {
        if self.start_sent {
            instr.set_data_message("I2C REPEATED START");
        } else {
            if !self.pull_ups {
                instr.set_error(Severity::Warn, NO_PULL_UP);
            }
            instr.set_data_message("I2C START");
        }

        if self.condition(instr) {
            self.start_sent = true;
            self.phase = Phase::Address;
        }
    }

    fn start_alt(&mut self, instr: &mut Instruction) {
        self.start(instr);
    }

    fn stop(&mut self, instr: &mut Instruction) {
        instr.set_data_message("I2C STOP");
        self.condition(instr);
        self.start_sent = false;
        self.phase = Phase::Idle;
    }

    fn stop_alt(&mut self, instr: &mut Instruction) {
        self.stop(instr);
    }

    fn write(&mut self, instr: &mut Instruction, _next: Option<&Instruction>) {
        let byte = (instr.out_data & 0xff) as u8;
        let ack = match self.phase {
            Phase::Address => match self.targets.iter().position(|t| t.address == byte >> 1) {
                Some(target) => {
                    self.phase = Phase::Addressed {
                        target,
                        pointer_set: false,
                    };
                    true
                }
                None => {
                    self.phase = Phase::Nacked;
                    false
                }
            },
            Phase::Addressed {
                target,
                pointer_set: false,
            } => {
                self.pointer = byte;
                self.phase = Phase::Addressed {
                    target,
                    pointer_set: true,
                };
                true
            }
            Phase::Addressed { target, .. } => {
                self.targets[target].registers[self.pointer as usize] = byte;
                self.pointer = self.pointer.wrapping_add(1);
                true
            }
            Phase::Idle | Phase::Nacked => false,
        };
        instr.set_data_message(if ack { "ACK" } else { "NACK" });
    }

    fn read(&mut self, instr: &mut Instruction, next: Option<&Instruction>) {
        // NACK the last byte before a bus condition
        let ack = !next.is_some_and(|n| n.opcode.is_framing());

        instr.in_data = match self.phase {
            Phase::Addressed { target, .. } => {
                let value = self.targets[target].registers[self.pointer as usize];
                self.pointer = self.pointer.wrapping_add(1);
                value as u32
            }
            // released bus reads high
            _ => 0xff,
        };
        instr.set_data_message(if ack { "ACK" } else { "NACK" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NumberFormat, Opcode};

    fn write(driver: &mut SimI2c, value: u32) -> Instruction {
        let mut entry = Instruction::write(value, NumberFormat::Hex, 8);
        driver.write(&mut entry, None);
        entry
    }

    #[test]
    fn test_address_ack_and_nack() {
        let mut driver = SimI2c::new().with_target(0x20, &[]);
        let mut start = Instruction::new(Opcode::Start, 8);
        driver.start(&mut start);
        assert_eq!(start.data_message.as_deref(), Some("I2C START"));
        assert_eq!(write(&mut driver, 0x40).data_message.as_deref(), Some("ACK"));

        let mut restart = Instruction::new(Opcode::Start, 8);
        driver.start(&mut restart);
        assert_eq!(restart.data_message.as_deref(), Some("I2C REPEATED START"));
        assert_eq!(write(&mut driver, 0x42).data_message.as_deref(), Some("NACK"));
    }

    #[test]
    fn test_register_pointer_write_then_read() {
        let mut driver = SimI2c::new().with_target(0x50, &[0xaa, 0xbb]);
        driver.start(&mut Instruction::new(Opcode::Start, 8));
        write(&mut driver, 0xa0);
        write(&mut driver, 0x01);
        write(&mut driver, 0x77);
        assert_eq!(driver.register(0x50, 1), Some(0x77));

        driver.start(&mut Instruction::new(Opcode::Start, 8));
        write(&mut driver, 0xa0);
        write(&mut driver, 0x00);
        let mut read = Instruction::new(Opcode::Read, 8);
        let stop = Instruction::new(Opcode::Stop, 8);
        driver.read(&mut read, Some(&stop));
        assert_eq!(read.in_data, 0xaa);
        assert_eq!(read.data_message.as_deref(), Some("NACK"));
    }

    #[test]
    fn test_read_acks_unless_framing_follows() {
        let mut driver = SimI2c::new();
        let mut read = Instruction::new(Opcode::Read, 8);
        let next = Instruction::new(Opcode::Read, 8);
        driver.read(&mut read, Some(&next));
        assert_eq!(read.data_message.as_deref(), Some("ACK"));
        assert_eq!(read.in_data, 0xff);
    }

    #[test]
    fn test_missing_pull_ups_warn() {
        let mut driver = SimI2c::new().with_pull_ups(false);
        let mut start = Instruction::new(Opcode::Start, 8);
        driver.start(&mut start);
        assert_eq!(start.error, Severity::Warn);
        assert_eq!(start.error_message.as_deref(), Some(NO_PULL_UP));
    }

    #[test]
    fn test_stuck_bus_times_out() {
        let mut driver = SimI2c::new().with_stuck_bus();
        let mut start = Instruction::new(Opcode::Start, 8);
        driver.start(&mut start);
        assert!(start.is_fatal());
        assert_eq!(start.error_message.as_deref(), Some("I2C timeout"));
    }
}
