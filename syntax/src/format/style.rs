/// ANSI colours used by the formatter. All empty when colour is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub info: &'static str,
    pub notice: &'static str,
    pub number: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub const PLAIN: Palette = Palette {
        info: "",
        notice: "",
        number: "",
        reset: "",
    };

    pub const ANSI: Palette = Palette {
        info: "\x1b[38;5;178m",
        notice: "\x1b[38;5;109m",
        number: "\x1b[38;5;103m",
        reset: "\x1b[0m",
    };

    pub const fn new(color: bool) -> Self {
        if color {
            Self::ANSI
        } else {
            Self::PLAIN
        }
    }
}
