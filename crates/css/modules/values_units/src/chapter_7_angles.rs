//! CSS Values & Units Level 4 — §7.1 Angle Units, and hue interpolation
//! Spec: <https://www.w3.org/TR/css-values-4/#angles>
//! Spec: <https://www.w3.org/TR/css-color-4/#hue-interpolation>

use crate::ValueError;
use crate::chapter_4_numbers::parse_number;
use css_syntax::{Pattern, grammar};

/// Degrees in a full turn.
const FULL_TURN: f64 = 360.0;
/// Degrees in a half turn.
const HALF_TURN: f64 = 180.0;

/// Convert an angle in `unit` to degrees.
pub fn angle_to_degrees(value: f64, unit: &str) -> Option<f64> {
    match unit {
        "deg" => Some(value),
        "grad" => Some(value * 0.9),
        "rad" => Some(value.to_degrees()),
        "turn" => Some(value * FULL_TURN),
        _ => None,
    }
}

/// Normalize a hue into `[0, 360)`.
#[inline]
pub fn normalize_hue(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(FULL_TURN);
    if wrapped >= FULL_TURN || wrapped == 0.0 {
        0.0
    } else {
        wrapped
    }
}

/// Parse a `<hue>` (`<number>` or `<angle>`) into normalized degrees.
///
/// # Errors
/// Returns [`ValueError::Syntax`] for any other input.
pub fn parse_hue(text: &str) -> Result<f64, ValueError> {
    let lower = text.trim().to_ascii_lowercase();
    if grammar().is_match(Pattern::Angle, &lower) {
        let split = lower
            .find(|ch: char| ch.is_ascii_alphabetic() && ch != 'e')
            .ok_or_else(|| ValueError::Syntax(lower.clone()))?;
        let (digits, unit) = lower.split_at(split);
        let value = parse_number(digits)?;
        let degrees = angle_to_degrees(value, unit).ok_or_else(|| ValueError::Syntax(lower.clone()))?;
        return Ok(normalize_hue(degrees));
    }
    parse_number(&lower).map(normalize_hue)
}

/// Hue interpolation method for polar color spaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HueArc {
    /// Take the arc of at most 180 degrees.
    #[default]
    Shorter,
    /// Take the arc of at least 180 degrees.
    Longer,
    /// Always move with increasing hue.
    Increasing,
    /// Always move with decreasing hue.
    Decreasing,
}

impl HueArc {
    /// Parse the keyword preceding `hue` in an interpolation method.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "shorter" => Some(Self::Shorter),
            "longer" => Some(Self::Longer),
            "increasing" => Some(Self::Increasing),
            "decreasing" => Some(Self::Decreasing),
            _ => None,
        }
    }

    /// The CSS keyword for this arc.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Shorter => "shorter",
            Self::Longer => "longer",
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
        }
    }

    /// Fix up a pair of hues so that linear interpolation between them follows this arc.
    pub fn adjust(self, first: f64, second: f64) -> (f64, f64) {
        let mut start = normalize_hue(first);
        let mut end = normalize_hue(second);
        let delta = end - start;
        match self {
            Self::Shorter => {
                if delta > HALF_TURN {
                    start += FULL_TURN;
                } else if delta < -HALF_TURN {
                    end += FULL_TURN;
                }
            }
            Self::Longer => {
                if delta > 0.0 && delta < HALF_TURN {
                    start += FULL_TURN;
                } else if delta > -HALF_TURN && delta <= 0.0 {
                    end += FULL_TURN;
                }
            }
            Self::Increasing => {
                if end < start {
                    end += FULL_TURN;
                }
            }
            Self::Decreasing => {
                if start < end {
                    start += FULL_TURN;
                }
            }
        }
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn midpoint(arc: HueArc, first: f64, second: f64) -> f64 {
        let (start, end) = arc.adjust(first, second);
        normalize_hue(start + (end - start) / 2.0)
    }

    #[test]
    fn angle_units() {
        assert_eq!(angle_to_degrees(0.5, "turn"), Some(180.0));
        assert_eq!(angle_to_degrees(100.0, "grad"), Some(90.0));
        assert!(angle_to_degrees(1.0, "px").is_none());
        assert_eq!(parse_hue("-90deg"), Ok(270.0));
        assert_eq!(parse_hue("720"), Ok(0.0));
        assert_eq!(parse_hue("0.25turn"), Ok(90.0));
    }

    #[test]
    fn arcs() {
        assert!((midpoint(HueArc::Shorter, 10.0, 350.0) - 0.0).abs() < 1e-9);
        assert!((midpoint(HueArc::Longer, 10.0, 350.0) - 180.0).abs() < 1e-9);
        assert!((midpoint(HueArc::Increasing, 350.0, 10.0) - 0.0).abs() < 1e-9);
        assert!((midpoint(HueArc::Decreasing, 350.0, 10.0) - 180.0).abs() < 1e-9);
    }
}
