//! CSS Values & Units Level 4 — §4 Numbers
//! Spec: <https://www.w3.org/TR/css-values-4/#numbers>

use crate::ValueError;
use crate::chapter_5_percentages::parse_percentage;
use css_syntax::{Pattern, grammar};

/// Alpha values below this threshold collapse to exactly zero.
const ALPHA_FLOOR: f64 = 0.001;
/// Alpha is kept to three decimal places.
const ALPHA_SCALE: f64 = 1000.0;
/// Highest accepted precision bit.
const MAX_PRECISION_BIT: u32 = 16;

/// Rounding stages used across the conversion pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Precision {
    /// RGB channel math (4 significant digits).
    Channel,
    /// Color-to-color conversion results (5 significant digits).
    Conversion,
    /// Values re-serialized into CSS text (6 significant digits).
    Serialization,
}

impl Precision {
    /// The numeric precision bit accepted by [`round_to_precision`].
    #[inline]
    pub const fn bit(self) -> u32 {
        match self {
            Self::Channel => 8,
            Self::Conversion => 10,
            Self::Serialization => 16,
        }
    }

    const fn significant_digits(self) -> usize {
        match self {
            Self::Channel => 4,
            Self::Conversion => 5,
            Self::Serialization => 6,
        }
    }
}

/// Extra digits formatted past the rounding position to tell ties from near-ties.
const GUARD_DIGITS: usize = 20;
/// Enough fractional digits to print any finite `f64` exactly in scientific notation.
const EXACT_DIGITS: usize = 767;

/// Round `value` to `digits` significant digits, ties away from zero.
///
/// Works on the decimal expansion of the exact binary value, so `0.125` at two digits
/// gives `0.13` while `1.005` (stored just below the tie) gives `1`.
fn significant(value: f64, digits: usize) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }
    let keep = digits.max(1);
    let magnitude = value.abs();
    let guarded = keep - 1 + GUARD_DIGITS;
    let wide = format!("{magnitude:.guarded$e}");
    let rounded = if near_tie(&wide, keep) {
        let exact = EXACT_DIGITS;
        half_up(&format!("{magnitude:.exact$e}"), keep)
    } else {
        half_up(&wide, keep)
    };
    match rounded {
        Some(rounded) if value < 0.0 => -rounded,
        Some(rounded) => rounded,
        None => value,
    }
}

/// Split `d.ddd…e±x` into its digits and exponent.
fn decimal_digits(text: &str) -> Option<(Vec<u8>, i32)> {
    let (mantissa, exponent) = text.split_once('e')?;
    let digits = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|byte| byte - b'0')
        .collect();
    Some((digits, exponent.parse().ok()?))
}

/// Whether the digits past `keep` read as `5000…`, which the guard digits cannot settle.
fn near_tie(text: &str, keep: usize) -> bool {
    decimal_digits(text).is_some_and(|(digits, _)| {
        digits
            .get(keep..)
            .and_then(<[u8]>::split_first)
            .is_some_and(|(first, rest)| *first == 5 && rest.iter().all(|digit| *digit == 0))
    })
}

/// Keep the first `keep` digits of `text`, rounding up when the next digit is 5 or more.
fn half_up(text: &str, keep: usize) -> Option<f64> {
    let (mut digits, mut exponent) = decimal_digits(text)?;
    let round_up = digits.get(keep).is_some_and(|digit| *digit >= 5);
    digits.truncate(keep);
    if round_up {
        let overflowed = digits.iter_mut().rev().all(|digit| {
            if *digit == 9 {
                *digit = 0;
                true
            } else {
                *digit += 1;
                false
            }
        });
        if overflowed {
            digits.insert(0, 1);
            digits.truncate(keep);
            exponent += 1;
        }
    }
    let mantissa: String = digits.iter().map(|digit| char::from(b'0' + digit)).collect();
    let scale = exponent - (digits.len() as i32 - 1);
    format!("{mantissa}e{scale}").parse().ok()
}

/// Round `value` to the significant precision implied by `bit`.
///
/// `0` rounds to the nearest integer (half away from zero), `1..=9` keeps 4 significant
/// digits, `10..=15` keeps 5 and `16` keeps 6.
///
/// # Errors
/// Returns [`ValueError::Range`] when `bit` is above 16.
pub fn round_to_precision(value: f64, bit: u32) -> Result<f64, ValueError> {
    let digits = match bit {
        0 => return Ok(value.round() + 0.0),
        1..=9 => Precision::Channel.significant_digits(),
        10..=15 => Precision::Conversion.significant_digits(),
        MAX_PRECISION_BIT => Precision::Serialization.significant_digits(),
        _ => {
            return Err(ValueError::Range {
                what: "precision",
                value: f64::from(bit),
                min: 0.0,
                max: f64::from(MAX_PRECISION_BIT),
            });
        }
    };
    Ok(significant(value, digits))
}

/// Round `value` for the given pipeline stage.
#[inline]
pub fn round_with(value: f64, precision: Precision) -> f64 {
    significant(value, precision.significant_digits())
}

/// Parse a CSS `<number>` from text.
///
/// # Errors
/// Returns [`ValueError::Syntax`] when `text` is not a finite `<number>`.
pub fn parse_number(text: &str) -> Result<f64, ValueError> {
    let trimmed = text.trim();
    if !grammar().is_match(Pattern::Number, &trimmed.to_ascii_lowercase()) {
        return Err(ValueError::Syntax(trimmed.to_owned()));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValueError::Syntax(trimmed.to_owned()))
}

/// Parse a `<number>` and clamp it into `min..=max`.
///
/// # Errors
/// Returns [`ValueError::Syntax`] when `text` is not a finite `<number>`.
pub fn parse_number_clamped(text: &str, min: f64, max: f64) -> Result<f64, ValueError> {
    parse_number(text).map(|value| value.clamp(min, max))
}

/// Clamp an alpha value into `[0, 1]`, flush values under 0.001 to zero and keep
/// three decimal places.
pub fn normalize_alpha(value: f64) -> f64 {
    let clamped = value.clamp(0.0, 1.0);
    if clamped < ALPHA_FLOOR {
        return 0.0;
    }
    (clamped * ALPHA_SCALE).round() / ALPHA_SCALE
}

/// Parse an `<alpha-value>` (`<number>` or `<percentage>`).
///
/// # Errors
/// Returns [`ValueError::Syntax`] when `text` is neither form.
pub fn parse_alpha(text: &str) -> Result<f64, ValueError> {
    let trimmed = text.trim();
    let raw = if trimmed.ends_with('%') {
        parse_percentage(trimmed)? / 100.0
    } else {
        parse_number(trimmed)?
    };
    Ok(normalize_alpha(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_digits() {
        assert_eq!(round_to_precision(2.5, 0), Ok(3.0));
        assert_eq!(round_to_precision(-2.5, 0), Ok(-3.0));
        assert_eq!(round_to_precision(123.456_78, 8), Ok(123.5));
        assert_eq!(round_to_precision(123.456_78, 10), Ok(123.46));
        assert_eq!(round_to_precision(123.456_78, 16), Ok(123.457));
        assert!(round_to_precision(1.0, 17).is_err());
    }

    #[test]
    fn exact_ties_round_away_from_zero() {
        assert_eq!(round_to_precision(2.062_5, 8), Ok(2.063));
        assert_eq!(round_to_precision(-2.062_5, 8), Ok(-2.063));
        assert_eq!(round_to_precision(1.031_25, 10), Ok(1.031_3));
        assert_eq!(round_to_precision(1.015_625, 16), Ok(1.015_63));
        assert_eq!(round_to_precision(99_995.0, 8), Ok(100_000.0));
        assert_eq!(significant(0.125, 2), 0.13);
        assert_eq!(significant(2.5, 1), 3.0);
        assert_eq!(significant(1.005, 3), 1.0);
    }

    #[test]
    fn rounding_never_yields_negative_zero() {
        let rounded = round_to_precision(-0.000_000_1, 0).unwrap_or(1.0);
        assert!(rounded.is_sign_positive());
    }

    #[test]
    fn alpha_clamps_and_floors() {
        assert_eq!(parse_alpha("150%"), Ok(1.0));
        assert_eq!(parse_alpha("-5%"), Ok(0.0));
        assert_eq!(parse_alpha("0.05%"), Ok(0.0));
        assert_eq!(parse_alpha("0.12345"), Ok(0.123));
        assert!(parse_alpha("half").is_err());
    }

    #[test]
    fn numbers_reject_units() {
        assert_eq!(parse_number(" 1e2 "), Ok(100.0));
        assert!(parse_number("1px").is_err());
        assert_eq!(parse_number_clamped("300", 0.0, 255.0), Ok(255.0));
    }
}
