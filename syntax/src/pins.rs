//! Pin ownership bookkeeping.
//!
//! The compiler only reads the table to reject scripts that would drive a pin
//! owned by something else. The engine claims and releases pins when it runs
//! the aux opcodes.

use std::borrow::Cow;

/// Purpose a physical pin is currently claimed for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PinFunction {
    /// Free for general IO, usable by the aux opcodes.
    #[default]
    Io,
    /// Owned by the active protocol mode.
    Mode,
    /// Owned by the power supply.
    Psu,
    /// Owned by a PWM or frequency generator.
    Pwm,
    /// Owned by a frequency counter.
    Freq,
}

/// The pin function table, as seen by the syntax pipeline.
pub trait PinTable {
    fn get(&self, pin: u8) -> PinFunction;

    fn claim(&mut self, pin: u8, purpose: PinFunction, label: &'static str);

    fn release(&mut self, pin: u8);

    /// Marks a pin in the register of aux pins driven by scripts.
    fn set_aux_active(&mut self, pin: u8, active: bool);

    fn aux_active(&self) -> u32;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PinEntry {
    function: PinFunction,
    label: Option<Cow<'static, str>>,
}

/// In-memory [`PinTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRegistry {
    pins: Vec<PinEntry>,
    aux_active: u32,
}

impl PinRegistry {
    /// A registry with every pin free for general IO.
    pub fn new(pin_count: u8) -> Self {
        Self {
            pins: vec![PinEntry::default(); pin_count as usize],
            aux_active: 0,
        }
    }

    pub fn label(&self, pin: u8) -> Option<&str> {
        self.pins
            .get(pin as usize)
            .and_then(|entry| entry.label.as_deref())
    }
}

impl PinTable for PinRegistry {
    fn get(&self, pin: u8) -> PinFunction {
        self.pins
            .get(pin as usize)
            .map(|entry| entry.function)
            .unwrap_or_default()
    }

    fn claim(&mut self, pin: u8, purpose: PinFunction, label: &'static str) {
        if let Some(entry) = self.pins.get_mut(pin as usize) {
            entry.function = purpose;
            entry.label = Some(Cow::Borrowed(label));
        }
    }

    fn release(&mut self, pin: u8) {
        if let Some(entry) = self.pins.get_mut(pin as usize) {
            *entry = PinEntry::default();
        }
    }

    fn set_aux_active(&mut self, pin: u8, active: bool) {
        if pin >= 32 {
            return;
        }
        if active {
            self.aux_active |= 1 << pin;
        } else {
            self.aux_active &= !(1 << pin);
        }
    }

    fn aux_active(&self) -> u32 {
        self.aux_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_and_release() {
        let mut registry = PinRegistry::new(8);
        assert_eq!(registry.get(3), PinFunction::Io);

        registry.claim(3, PinFunction::Mode, "SCL");
        assert_eq!(registry.get(3), PinFunction::Mode);
        assert_eq!(registry.label(3), Some("SCL"));

        registry.release(3);
        assert_eq!(registry.get(3), PinFunction::Io);
        assert_eq!(registry.label(3), None);
    }

    #[test]
    fn test_aux_active_register() {
        let mut registry = PinRegistry::new(8);
        registry.set_aux_active(0, true);
        registry.set_aux_active(5, true);
        assert_eq!(registry.aux_active(), 0b10_0001);
        registry.set_aux_active(0, false);
        assert_eq!(registry.aux_active(), 0b10_0000);
    }
}
