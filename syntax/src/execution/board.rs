use std::time::{Duration, Instant};

use tracing::trace;

/// Board services used by the opcodes the engine runs itself: aux pins, the
/// analog front-end and delays.
pub trait Board {
    fn set_output(&mut self, pin: u8);

    fn put(&mut self, pin: u8, level: bool);

    fn set_input(&mut self, pin: u8);

    fn get(&self, pin: u8) -> bool;

    /// Raw 12-bit ADC reading of the pin's analog mux channel.
    fn adc_sample(&mut self, pin: u8) -> u32;

    fn delay_us(&mut self, us: u32);

    fn delay_ms(&mut self, ms: u32);
}

/// Direction of a simulated pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PinDirection {
    #[default]
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, Default)]
struct SimPin {
    direction: PinDirection,
    level: bool,
    adc: u32,
}

/// Host-side [`Board`].
///
/// Output levels are remembered per pin and read back by `get`. Inputs read
/// whatever was set with [`SimulatedBoard::set_input_level`], ADC channels
/// return what was set with [`SimulatedBoard::set_adc`]. Delays are added to
/// a running total and only actually waited when `realtime` is on.
#[derive(Debug, Clone)]
pub struct SimulatedBoard {
    pins: Vec<SimPin>,
    realtime: bool,
    delayed_us: u64,
}

impl SimulatedBoard {
    pub fn new(pin_count: u8) -> Self {
        Self {
            pins: vec![SimPin::default(); pin_count as usize],
            realtime: false,
            delayed_us: 0,
        }
    }

    /// Busy-waits for real on every delay.
    pub fn realtime(mut self) -> Self {
        self.realtime = true;
        self
    }

    pub fn set_input_level(&mut self, pin: u8, level: bool) {
        if let Some(p) = self.pins.get_mut(pin as usize) {
            p.level = level;
        }
    }

    pub fn set_adc(&mut self, pin: u8, raw: u32) {
        if let Some(p) = self.pins.get_mut(pin as usize) {
            p.adc = raw & 0xfff;
        }
    }

    pub fn direction(&self, pin: u8) -> PinDirection {
        self.pins
            .get(pin as usize)
            .map(|p| p.direction)
            .unwrap_or_default()
    }

    /// Total time requested through `delay_us` and `delay_ms`, in microseconds.
    pub fn delayed_us(&self) -> u64 {
        self.delayed_us
    }

    fn wait(&mut self, us: u64) {
        self.delayed_us += us;
        if self.realtime {
            let deadline = Instant::now() + Duration::from_micros(us);
            while Instant::now() < deadline {
                std::hint::spin_loop();
            }
        }
    }
}

impl Board for SimulatedBoard {
    fn set_output(&mut self, pin: u8) {
        if let Some(p) = self.pins.get_mut(pin as usize) {
            p.direction = PinDirection::Output;
        }
    }

    fn put(&mut self, pin: u8, level: bool) {
        trace!(pin, level, "put");
        if let Some(p) = self.pins.get_mut(pin as usize) {
            p.level = level;
        }
    }

    fn set_input(&mut self, pin: u8) {
        if let Some(p) = self.pins.get_mut(pin as usize) {
            p.direction = PinDirection::Input;
        }
    }

    fn get(&self, pin: u8) -> bool {
        self.pins.get(pin as usize).is_some_and(|p| p.level)
    }

    fn adc_sample(&mut self, pin: u8) -> u32 {
        self.pins.get(pin as usize).map_or(0, |p| p.adc)
    }

    fn delay_us(&mut self, us: u32) {
        self.wait(us as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.wait(ms as u64 * 1000);
    }
}
