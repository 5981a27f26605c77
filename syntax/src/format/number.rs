use std::fmt::Write;

use super::style::Palette;
use crate::{bit_mask, DisplayFormat, Instruction, NumberFormat};

/// Picks how a value of `instr` is shown.
///
/// Writes keep the radix they were typed in unless the session forces one;
/// ASCII literals always do. Reads follow the session.
pub fn effective_format(
    instr: &Instruction,
    read: bool,
    session: DisplayFormat,
) -> DisplayFormat {
    let own = instr.number_format == NumberFormat::Ascii;
    if !read && (matches!(session, DisplayFormat::Auto | DisplayFormat::Ascii) || own) {
        instr.number_format.into()
    } else {
        session
    }
}

/// Renders `value` masked to `bits` in the given display format.
///
/// ASCII shows the quoted character first, then falls back to hex like AUTO.
/// Widths other than 8 bits get a `.N` suffix.
pub fn render_number(
    out: &mut String,
    value: u32,
    bits: u8,
    format: DisplayFormat,
    palette: &Palette,
) {
    let bits = bits.clamp(1, 32);
    let value = value & bit_mask(bits);

    if format == DisplayFormat::Ascii {
        match char::from_u32(value & 0xff) {
            Some(c) if (' '..='~').contains(&c) => {
                let _ = write!(out, "'{c}' ");
            }
            _ => out.push_str("''  "),
        }
    }

    match format {
        DisplayFormat::Auto | DisplayFormat::Hex | DisplayFormat::Ascii => {
            render_hex(out, value, bits, palette)
        }
        DisplayFormat::Dec => {
            let _ = write!(out, "{value}");
        }
        DisplayFormat::Bin => render_bin(out, value, bits, palette),
    }

    if bits != 8 {
        let _ = write!(out, ".{bits}");
    }
}

/// `0x` and an even number of uppercase nibbles, byte pairs in alternating
/// colours.
fn render_hex(out: &mut String, value: u32, bits: u8, palette: &Palette) {
    let nibbles = (bits as usize).div_ceil(4).next_multiple_of(2);
    out.push_str("0x");
    let mut highlight = true;
    for byte in (0..nibbles / 2).rev() {
        out.push_str(if highlight { palette.number } else { palette.reset });
        highlight = !highlight;
        let _ = write!(out, "{:02X}", (value >> (byte * 8)) & 0xff);
    }
    out.push_str(palette.reset);
}

/// `0b` and exactly `bits` digits, nibbles in alternating colours counted from
/// the least significant end.
fn render_bin(out: &mut String, value: u32, bits: u8, palette: &Palette) {
    out.push_str("0b");
    out.push_str(palette.number);
    let mut highlight = true;
    let mut left = match bits % 4 {
        0 => 4,
        n => n,
    };
    for i in (0..bits).rev() {
        if left == 0 {
            highlight = !highlight;
            out.push_str(if highlight { palette.number } else { palette.reset });
            left = 4;
        }
        left -= 1;
        out.push(if (value >> i) & 1 == 1 { '1' } else { '0' });
    }
    out.push_str(palette.reset);
}

/// Millivolts measured by a raw 12-bit sample of the 0 to 6.6V front-end.
pub const fn adc_millivolts(raw: u32) -> u64 {
    (6600 * raw as u64) / 4096
}
