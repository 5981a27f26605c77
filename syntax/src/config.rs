use crate::{error::ConfigError, NumberFormat, MAX_SLOTS};

/// Session-wide radix used to render values.
///
/// `Auto` shows writes the way they were typed and reads in hexadecimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DisplayFormat {
    #[default]
    Auto,
    Hex,
    Dec,
    Bin,
    Ascii,
}

impl From<NumberFormat> for DisplayFormat {
    fn from(format: NumberFormat) -> Self {
        match format {
            NumberFormat::Hex => DisplayFormat::Hex,
            NumberFormat::Dec => DisplayFormat::Dec,
            NumberFormat::Bin => DisplayFormat::Bin,
            NumberFormat::Ascii => DisplayFormat::Ascii,
        }
    }
}

/// Settings read by every phase of the pipeline. Never mutated by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub bit_width: u8,
    pub display_format: DisplayFormat,
    pub pin_count: u8,
    pub capacity: usize,
    pub color: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bit_width: 8,
            display_format: DisplayFormat::Auto,
            pin_count: 8,
            capacity: MAX_SLOTS,
            color: false,
        }
    }
}

impl SessionConfig {
    pub fn with_bit_width(mut self, bit_width: u8) -> Self {
        self.bit_width = bit_width;
        self
    }

    pub fn with_display_format(mut self, display_format: DisplayFormat) -> Self {
        self.display_format = display_format;
        self
    }

    pub fn with_pin_count(mut self, pin_count: u8) -> Self {
        self.pin_count = pin_count;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Checks the invariants the compiler and engine rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=32).contains(&self.bit_width) {
            return Err(ConfigError::BitWidth(self.bit_width));
        }
        if self.pin_count == 0 || self.pin_count > 32 {
            return Err(ConfigError::PinCount(self.pin_count));
        }
        if self.capacity < 2 {
            return Err(ConfigError::Capacity(self.capacity));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_settings() {
        let config = SessionConfig::default().with_bit_width(0);
        assert_eq!(config.validate(), Err(ConfigError::BitWidth(0)));

        let config = SessionConfig::default().with_bit_width(33);
        assert_eq!(config.validate(), Err(ConfigError::BitWidth(33)));

        let config = SessionConfig::default().with_pin_count(40);
        assert_eq!(config.validate(), Err(ConfigError::PinCount(40)));

        let config = SessionConfig::default().with_capacity(1);
        assert_eq!(config.validate(), Err(ConfigError::Capacity(1)));
    }
}
