use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::EnumCount;
use strum_macros::{EnumCount, IntoStaticStr};

/// Every operation a compiled bus script can carry.
///
/// The discriminants are stable and double as indices into per-opcode tables
/// such as [`DispatchStats`](crate::DispatchStats).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumCount,
    IntoStaticStr,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(u8)]
pub enum Opcode {
    // Bus data
    Write = 0x00,
    Read = 0x01,

    // Bus framing
    Start = 0x02,
    Stop = 0x03,
    StartAlt = 0x04,
    StopAlt = 0x05,

    // Bit-level control
    TickClock = 0x06,
    ClockHigh = 0x07,
    ClockLow = 0x08,
    DataHigh = 0x09,
    DataLow = 0x0a,
    ReadBit = 0x0b,

    // Executed by the engine itself
    DelayUs = 0x0c,
    DelayMs = 0x0d,

    // Pin opcodes, the `.N` attribute names the IO pin
    AuxOutputHigh = 0x0e,
    AuxOutputLow = 0x0f,
    AuxInput = 0x10,
    AdcRead = 0x11,
}

/// Symbol table for the single-character commands of the syntax.
///
/// Numeric literals and quoted strings are not in here, they compile to
/// [`Opcode::Write`].
const SYMBOLS: [(char, Opcode); 17] = [
    ('r', Opcode::Read),
    ('[', Opcode::Start),
    ('{', Opcode::StartAlt),
    (']', Opcode::Stop),
    ('}', Opcode::StopAlt),
    ('d', Opcode::DelayUs),
    ('D', Opcode::DelayMs),
    ('^', Opcode::TickClock),
    ('/', Opcode::ClockHigh),
    ('\\', Opcode::ClockLow),
    ('_', Opcode::DataLow),
    ('-', Opcode::DataHigh),
    ('.', Opcode::ReadBit),
    ('a', Opcode::AuxOutputLow),
    ('A', Opcode::AuxOutputHigh),
    ('@', Opcode::AuxInput),
    ('v', Opcode::AdcRead),
];

impl Opcode {
    pub const OP_COUNT: usize = Self::COUNT;

    /// Resolves a command character, returns `None` for anything that is not
    /// in the symbol table.
    pub fn from_symbol(c: char) -> Option<Self> {
        SYMBOLS
            .iter()
            .find(|(symbol, _)| *symbol == c)
            .map(|(_, opcode)| *opcode)
    }

    /// The character that produces this opcode, `None` for [`Opcode::Write`].
    pub fn symbol(&self) -> Option<char> {
        SYMBOLS
            .iter()
            .find(|(_, opcode)| opcode == self)
            .map(|(symbol, _)| *symbol)
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Opcodes whose `.N` attribute is an IO pin index rather than a bit width.
    pub const fn is_pin_opcode(&self) -> bool {
        matches!(
            self,
            Opcode::AuxOutputHigh | Opcode::AuxOutputLow | Opcode::AuxInput | Opcode::AdcRead
        )
    }

    /// Pin opcodes that need exclusive use of the pin. ADC sampling only senses.
    pub const fn claims_pin(&self) -> bool {
        self.is_pin_opcode() && !matches!(self, Opcode::AdcRead)
    }

    /// Whether `repeat` is a magnitude consumed as one slot instead of a count of
    /// slots.
    pub const fn repeat_is_magnitude(&self) -> bool {
        matches!(self, Opcode::DelayUs | Opcode::DelayMs | Opcode::TickClock)
    }

    /// Opcodes expanded into one trace entry per repeat.
    pub const fn expands_repeat(&self) -> bool {
        matches!(self, Opcode::Write | Opcode::Read | Opcode::ReadBit)
    }

    /// Bus framing opcodes, used by drivers inspecting the lookahead.
    pub const fn is_framing(&self) -> bool {
        matches!(
            self,
            Opcode::Start | Opcode::Stop | Opcode::StartAlt | Opcode::StopAlt
        )
    }

    /// Number of compile slots an instruction with the given repeat consumes.
    pub fn slot_cost(&self, repeat: u16) -> usize {
        if self.repeat_is_magnitude() {
            1
        } else {
            repeat as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_table_round_trips() {
        for (symbol, opcode) in SYMBOLS {
            assert_eq!(Opcode::from_symbol(symbol), Some(opcode));
            assert_eq!(opcode.symbol(), Some(symbol));
        }
        assert_eq!(Opcode::Write.symbol(), None);
        assert_eq!(Opcode::from_symbol('x'), None);
    }

    #[test]
    fn test_primitive_indices_cover_all_opcodes() {
        for index in 0..Opcode::OP_COUNT as u8 {
            let opcode = Opcode::try_from(index).expect("every index below COUNT is an opcode");
            assert_eq!(u8::from(opcode), index);
        }
        assert!(Opcode::try_from(Opcode::OP_COUNT as u8).is_err());
    }

    #[test]
    fn test_slot_cost() {
        assert_eq!(Opcode::Read.slot_cost(5), 5);
        assert_eq!(Opcode::DelayMs.slot_cost(500), 1);
        assert_eq!(Opcode::TickClock.slot_cost(9), 1);
        assert!(Opcode::AdcRead.is_pin_opcode());
        assert!(!Opcode::AdcRead.claims_pin());
        assert!(Opcode::AuxInput.claims_pin());
    }
}
