//! Hex color notation.
//! Spec: <https://www.w3.org/TR/css-color-4/#hex-notation>

use crate::ColorError;
use crate::space::ColorSpace;
use crate::value::ColorValue;
use css_syntax::{Pattern, grammar};
use once_cell::sync::Lazy;

/// Alpha for every byte value. A byte maps to the two-decimal alpha that encodes back to
/// the same byte when one exists (`0x80` → `0.5`), otherwise to three decimals.
static HEX_ALPHA: Lazy<[f64; 256]> = Lazy::new(|| {
    let mut table = [0.0; 256];
    for (byte, slot) in (0_u8..=255).zip(table.iter_mut()) {
        let exact = f64::from(byte) / 255.0;
        let percent = (exact * 100.0).round() / 100.0;
        *slot = if (percent * 255.0).round() == f64::from(byte) {
            percent
        } else {
            (exact * 1000.0).round() / 1000.0
        };
    }
    table
});

/// Alpha encoded by a hex byte.
#[inline]
pub fn hex_alpha(byte: u8) -> f64 {
    HEX_ALPHA[usize::from(byte)]
}

fn nibble(digit: u8) -> Option<u8> {
    char::from(digit)
        .to_digit(16)
        .and_then(|value| u8::try_from(value).ok())
}

/// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` (lower-case).
///
/// # Errors
/// Returns [`ColorError::Syntax`] for any other shape.
pub fn parse_hex(text: &str) -> Result<ColorValue, ColorError> {
    let invalid = || ColorError::Syntax(text.to_owned());
    if !grammar().is_match(Pattern::Hex, text) {
        return Err(invalid());
    }
    let digits = text.get(1..).ok_or_else(invalid)?.as_bytes();
    let nibbles = digits
        .iter()
        .map(|digit| nibble(*digit))
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(invalid)?;
    let bytes: Vec<u8> = match nibbles.len() {
        3 | 4 => nibbles.iter().map(|value| value * 17).collect(),
        6 | 8 => nibbles
            .chunks(2)
            .map(|pair| pair[0] * 16 + pair[1])
            .collect(),
        _ => return Err(invalid()),
    };
    let alpha = bytes.get(3).map_or(1.0, |byte| hex_alpha(*byte));
    Ok(ColorValue::new(
        ColorSpace::Rgb,
        [
            f64::from(bytes[0]),
            f64::from(bytes[1]),
            f64::from(bytes[2]),
        ],
        alpha,
    ))
}
