//! Reading individual color channels.
//! Spec: <https://www.w3.org/TR/css-color-4/#color-syntax>

use crate::ColorError;
use crate::value::Channel;
use css_syntax::{Pattern, grammar};
use css_values_units::{
    CalcContext, CalcValue, Dimensions, angle_to_degrees, evaluate_math, normalize_alpha,
    normalize_hue, parse_number, parse_percentage,
};

/// A channel as written, before scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawComponent {
    Number(f64),
    /// On the 0..=100 scale.
    Percentage(f64),
    /// In degrees.
    Angle(f64),
    None,
}

impl RawComponent {
    /// Whether this is the `none` keyword.
    #[inline]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Whether this was written as a percentage.
    #[inline]
    pub const fn is_percentage(self) -> bool {
        matches!(self, Self::Percentage(_))
    }
}

/// How a channel's number and percentage forms map onto the stored value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChannelKind {
    /// `<number>` degrees or `<angle>`, normalised into `[0, 360)`.
    Hue,
    /// `<number>` as is, `<percentage>` relative to `percent` (the value of `100%`),
    /// clamped into `min..=max`.
    Scaled { percent: f64, min: f64, max: f64 },
    /// `<alpha-value>`.
    Alpha,
}

impl ChannelKind {
    /// A scaled channel without clamping.
    pub const fn unbounded(percent: f64) -> Self {
        Self::Scaled {
            percent,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    /// A scaled channel clamped into `min..=max`.
    pub const fn bounded(percent: f64, min: f64, max: f64) -> Self {
        Self::Scaled { percent, min, max }
    }

    /// Scale a raw component into the stored channel value.
    ///
    /// # Errors
    /// Returns [`ColorError::Syntax`] when the written type is not allowed here.
    pub fn apply(self, raw: RawComponent, text: &str) -> Result<Channel, ColorError> {
        let invalid = || ColorError::Syntax(text.to_owned());
        let value = match (self, raw) {
            (_, RawComponent::None) => return Ok(Channel::None),
            (Self::Hue, RawComponent::Number(degrees) | RawComponent::Angle(degrees)) => {
                normalize_hue(degrees)
            }
            (Self::Scaled { min, max, .. }, RawComponent::Number(number)) => number.clamp(min, max),
            (Self::Scaled { percent, min, max }, RawComponent::Percentage(pct)) => {
                (pct / 100.0 * percent).clamp(min, max)
            }
            (Self::Alpha, RawComponent::Number(number)) => normalize_alpha(number),
            (Self::Alpha, RawComponent::Percentage(pct)) => normalize_alpha(pct / 100.0),
            (Self::Hue, RawComponent::Percentage(_))
            | (Self::Scaled { .. } | Self::Alpha, RawComponent::Angle(_)) => return Err(invalid()),
        };
        if value.is_nan() {
            return Err(invalid());
        }
        Ok(Channel::Number(value))
    }
}

/// Split an `<angle>` such as `1.5turn` into its number and unit.
fn split_angle(text: &str) -> Option<f64> {
    let unit_start = text.find(|ch: char| ch.is_ascii_alphabetic() && ch != 'e')?;
    let (number, unit) = text.split_at(unit_start);
    angle_to_degrees(number.parse::<f64>().ok()?, unit)
}

/// Read one channel component: a number, percentage, angle, `none` or a math function.
///
/// # Errors
/// Returns [`ColorError`] when the text is none of these or a math function does not
/// fold to a single value.
pub fn read_component(text: &str, dimensions: &Dimensions) -> Result<RawComponent, ColorError> {
    let table = grammar();
    if text == "none" {
        return Ok(RawComponent::None);
    }
    if table.is_match(Pattern::Number, text) {
        return Ok(RawComponent::Number(parse_number(text)?));
    }
    if table.is_match(Pattern::Percentage, text) {
        return Ok(RawComponent::Percentage(parse_percentage(text)?));
    }
    if table.is_match(Pattern::Angle, text) {
        return split_angle(text)
            .map(RawComponent::Angle)
            .ok_or_else(|| ColorError::Syntax(text.to_owned()));
    }
    if table.is_match(Pattern::MathFunctionStart, text) {
        let folded = evaluate_math(text, &CalcContext::new(dimensions))?;
        return match folded.single_value() {
            Some(CalcValue::Number(value)) => Ok(RawComponent::Number(value)),
            Some(CalcValue::Percentage(value)) => Ok(RawComponent::Percentage(value)),
            Some(CalcValue::Dimension { value, unit }) => angle_to_degrees(value, &unit)
                .map(RawComponent::Angle)
                .ok_or_else(|| ColorError::Syntax(text.to_owned())),
            None => Err(ColorError::Syntax(text.to_owned())),
        };
    }
    Err(ColorError::Syntax(text.to_owned()))
}
