use super::CharSource;
use crate::NumberFormat;

/// Parses an unsigned literal at the cursor: `0x` hex, `0b` binary, otherwise
/// decimal. Prefixes are case-insensitive.
///
/// Consumes the literal only when it parses. Returns `None` when there are no
/// digits after the prefix or the value does not fit in 32 bits.
pub(crate) fn parse_number<S>(src: &mut S) -> Option<(u32, NumberFormat)>
where
    S: CharSource + ?Sized,
{
    let (radix, format, prefix_len) = match (src.peek(0), src.peek(1)) {
        (Some('0'), Some('x' | 'X')) => (16, NumberFormat::Hex, 2),
        (Some('0'), Some('b' | 'B')) => (2, NumberFormat::Bin, 2),
        (Some(c), _) if c.is_ascii_digit() => (10, NumberFormat::Dec, 0),
        _ => return None,
    };

    let mut value: u32 = 0;
    let mut digits = 0;
    while let Some(digit) = src
        .peek(prefix_len + digits)
        .and_then(|c| c.to_digit(radix))
    {
        value = value.checked_mul(radix)?.checked_add(digit)?;
        digits += 1;
    }

    if digits == 0 {
        return None;
    }

    src.discard(prefix_len + digits);
    Some((value, format))
}

/// Parses a `.N` or `:N` attribute introduced by `delimiter`.
///
/// The delimiter only counts when a decimal digit follows it, so `..` stays two
/// separate commands. Returns `Some(None)` when the attribute is present but its
/// value does not parse.
pub(crate) fn parse_attribute<S>(src: &mut S, delimiter: char) -> Option<Option<u32>>
where
    S: CharSource + ?Sized,
{
    if src.peek(0) != Some(delimiter) || !src.peek(1).is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    src.discard(1);
    Some(parse_number(src).map(|(value, _)| value))
}
