//! CSS Values & Units Level 4 — §5 Percentages
//! Spec: <https://www.w3.org/TR/css-values-4/#percentages>

use crate::ValueError;
use css_syntax::{Pattern, grammar};

/// Parse a CSS `<percentage>`, returning the number before the `%` (`"50%"` → `50.0`).
///
/// # Errors
/// Returns [`ValueError::Syntax`] when `text` is not a finite `<percentage>`.
pub fn parse_percentage(text: &str) -> Result<f64, ValueError> {
    let trimmed = text.trim();
    if !grammar().is_match(Pattern::Percentage, &trimmed.to_ascii_lowercase()) {
        return Err(ValueError::Syntax(trimmed.to_owned()));
    }
    trimmed
        .strip_suffix('%')
        .and_then(|digits| digits.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValueError::Syntax(trimmed.to_owned()))
}

/// Parse a `<percentage>` as a fraction of one (`"50%"` → `0.5`).
///
/// # Errors
/// Returns [`ValueError::Syntax`] when `text` is not a finite `<percentage>`.
#[inline]
pub fn percentage_to_fraction(text: &str) -> Result<f64, ValueError> {
    parse_percentage(text).map(|value| value / 100.0)
}
