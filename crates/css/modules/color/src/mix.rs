//! `color-mix()`.
//! Spec: <https://www.w3.org/TR/css-color-5/#color-mix>

use crate::conversion::convert;
use crate::parse::components::{RawComponent, read_component};
use crate::parse::{ParseContext, parse_color};
use crate::space::ColorSpace;
use crate::value::{Channel, ColorValue};
use crate::ColorError;
use css_syntax::{Pattern, function_arguments, grammar, split_components, split_value};
use css_values_units::{Dimensions, HueArc, normalize_alpha, normalize_hue};

/// One color argument of `color-mix()`.
#[derive(Clone, Debug, PartialEq)]
pub struct MixOperand {
    /// The color text, still unparsed.
    pub color: String,
    /// The percentage as written (0..=100), if any.
    pub percentage: Option<f64>,
}

/// The parsed shape of a `color-mix()` call.
#[derive(Clone, Debug, PartialEq)]
pub struct MixSyntax {
    /// Interpolation space.
    pub space: ColorSpace,
    /// Hue interpolation method, when written.
    pub arc: Option<HueArc>,
    /// The two colors in source order.
    pub operands: [MixOperand; 2],
}

/// Weights applied to each operand after percentage normalisation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixWeights {
    /// Share of the first color, in `0..=1`.
    pub first: f64,
    /// Share of the second color; `first + second == 1`.
    pub second: f64,
    /// `min(sum, 100%)`, applied to the resulting alpha.
    pub alpha_multiplier: f64,
}

fn read_percentage(component: &str, dimensions: &Dimensions) -> Option<f64> {
    let table = grammar();
    if !table.is_match(Pattern::Percentage, component)
        && !table.is_match(Pattern::MathFunctionStart, component)
    {
        return None;
    }
    match read_component(component, dimensions) {
        Ok(RawComponent::Percentage(value)) => Some(value),
        _ => None,
    }
}

fn read_operand(part: &str, dimensions: &Dimensions) -> Result<MixOperand, ColorError> {
    let invalid = || ColorError::Syntax(part.to_owned());
    match split_components(part).as_slice() {
        [color] => Ok(MixOperand {
            color: color.clone(),
            percentage: None,
        }),
        [first, second] => {
            let (color, percentage) = match (
                read_percentage(first, dimensions),
                read_percentage(second, dimensions),
            ) {
                (Some(percentage), None) => (second, percentage),
                (None, Some(percentage)) => (first, percentage),
                _ => return Err(invalid()),
            };
            Ok(MixOperand {
                color: color.clone(),
                percentage: Some(percentage),
            })
        }
        _ => Err(invalid()),
    }
}

/// Split `color-mix()` text into its interpolation method and operands.
///
/// # Errors
/// Returns [`ColorError::Syntax`] when the text is not a `color-mix()` call.
pub fn parse_mix_syntax(text: &str, dimensions: &Dimensions) -> Result<MixSyntax, ColorError> {
    let invalid = || ColorError::Syntax(text.to_owned());
    let (name, arguments) = function_arguments(text).ok_or_else(invalid)?;
    if name != "color-mix" {
        return Err(invalid());
    }
    let parts = split_value(arguments, ',');
    let [method, first, second] = parts.as_slice() else {
        return Err(invalid());
    };
    let captures = grammar()
        .captures(Pattern::MixInterpolation, method)
        .ok_or_else(invalid)?;
    let space = captures
        .name("polar")
        .or_else(|| captures.name("rect"))
        .and_then(|space| ColorSpace::from_interpolation(space.as_str()))
        .ok_or_else(invalid)?;
    let arc = captures
        .name("arc")
        .map(|arc| HueArc::from_keyword(arc.as_str()).ok_or_else(invalid))
        .transpose()?;
    Ok(MixSyntax {
        space,
        arc,
        operands: [read_operand(first, dimensions)?, read_operand(second, dimensions)?],
    })
}

/// Normalise the two optional percentages.
///
/// # Errors
/// Returns [`ColorError::Syntax`] when a percentage is outside `0%..=100%` or both are
/// zero.
pub fn mix_weights(first: Option<f64>, second: Option<f64>) -> Result<MixWeights, ColorError> {
    let out_of_range = |value: &f64| !(0.0..=100.0).contains(value);
    if first.as_ref().is_some_and(out_of_range) || second.as_ref().is_some_and(out_of_range) {
        return Err(ColorError::Syntax("color-mix() percentage out of range".to_owned()));
    }
    let (left, right) = match (first, second) {
        (None, None) => (50.0, 50.0),
        (Some(left), None) => (left, 100.0 - left),
        (None, Some(right)) => (100.0 - right, right),
        (Some(left), Some(right)) => (left, right),
    };
    let sum = left + right;
    if sum <= 0.0 {
        return Err(ColorError::Syntax("color-mix() percentages sum to zero".to_owned()));
    }
    Ok(MixWeights {
        first: left / sum,
        second: right / sum,
        alpha_multiplier: (sum / 100.0).min(1.0),
    })
}

/// Values used for arithmetic on a pair of channels, and whether both were missing.
///
/// A missing channel takes its sibling's value; when both are missing both act as zero
/// and the result stays missing.
const fn pair(first: Channel, second: Channel) -> (f64, f64, bool) {
    match (first, second) {
        (Channel::Number(left), Channel::Number(right)) => (left, right, false),
        (Channel::Number(value), Channel::None) | (Channel::None, Channel::Number(value)) => {
            (value, value, false)
        }
        (Channel::None, Channel::None) => (0.0, 0.0, true),
    }
}

/// Interpolate two colors already expressed in `space`, with premultiplied alpha.
pub fn interpolate(
    space: ColorSpace,
    arc: HueArc,
    first: &ColorValue,
    second: &ColorValue,
    weights: &MixWeights,
) -> ColorValue {
    let (alpha_first, alpha_second, alpha_missing) = pair(first.alpha, second.alpha);
    let alpha = alpha_first * weights.first + alpha_second * weights.second;
    let premultiplied = alpha > 0.0;
    let hue_index = space.hue_index();
    let mut channels = [Channel::None; 3];
    for (index, slot) in channels.iter_mut().enumerate() {
        let (start, end, missing) = pair(first.channels[index], second.channels[index]);
        let value = if hue_index == Some(index) {
            let (from, to) = arc.adjust(start, end);
            normalize_hue(from * weights.first + to * weights.second)
        } else if premultiplied {
            (start * alpha_first * weights.first + end * alpha_second * weights.second) / alpha
        } else {
            start * weights.first + end * weights.second
        };
        *slot = if missing {
            Channel::None
        } else {
            Channel::Number(value)
        };
    }
    let alpha = if alpha_missing {
        Channel::None
    } else {
        Channel::Number(normalize_alpha(alpha * weights.alpha_multiplier))
    };
    ColorValue::with_channels(space, channels, alpha)
}

/// Resolve a `color-mix()` call. Mixes in `srgb` come back as `rgb()` channels.
///
/// # Errors
/// Returns [`ColorError`] when the syntax or either operand is invalid.
pub fn mix_colors(text: &str, context: &ParseContext<'_>) -> Result<ColorValue, ColorError> {
    let syntax = parse_mix_syntax(text, context.dimensions)?;
    let [first, second] = &syntax.operands;
    let weights = mix_weights(first.percentage, second.percentage)?;
    let nested = context.deeper()?;
    let first_color = convert(&parse_color(&first.color, &nested)?, syntax.space);
    let second_color = convert(&parse_color(&second.color, &nested)?, syntax.space);
    let mixed = interpolate(
        syntax.space,
        syntax.arc.unwrap_or_default(),
        &first_color,
        &second_color,
        &weights,
    );
    if syntax.space == ColorSpace::Srgb {
        return Ok(convert(&mixed, ColorSpace::Rgb));
    }
    Ok(mixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mix(text: &str) -> Option<ColorValue> {
        let dimensions = Dimensions::new();
        mix_colors(text, &ParseContext::new(&dimensions)).ok()
    }

    #[test]
    fn weights_normalise() {
        let halves = MixWeights {
            first: 0.5,
            second: 0.5,
            alpha_multiplier: 1.0,
        };
        assert_eq!(mix_weights(None, None), Ok(halves));
        assert_eq!(
            mix_weights(Some(30.0), None),
            Ok(MixWeights {
                first: 0.3,
                second: 0.7,
                alpha_multiplier: 1.0,
            })
        );
        assert_eq!(
            mix_weights(Some(20.0), Some(20.0)),
            Ok(MixWeights {
                first: 0.5,
                second: 0.5,
                alpha_multiplier: 0.4,
            })
        );
        assert!(mix_weights(Some(0.0), Some(0.0)).is_err());
        assert!(mix_weights(Some(120.0), None).is_err());
    }

    #[test]
    fn srgb_midpoint() {
        assert_eq!(
            mix("color-mix(in srgb, red, blue)"),
            Some(ColorValue::new(ColorSpace::Rgb, [127.5, 0.0, 127.5], 1.0))
        );
    }

    #[test]
    fn longer_hue_goes_the_long_way() {
        let mixed = mix("color-mix(in hsl longer hue, hsl(10 100% 50%), hsl(350 100% 50%))");
        let hue = mixed.and_then(|color| color.channels[0].value()).unwrap_or(0.0);
        assert!((hue - 180.0).abs() < 1e-9);
        let shorter = mix("color-mix(in hsl, hsl(10 100% 50%), hsl(350 100% 50%))");
        let hue = shorter.and_then(|color| color.channels[0].value()).unwrap_or(180.0);
        assert!(hue.abs() < 1e-9 || (hue - 360.0).abs() < 1e-9);
    }

    #[test]
    fn premultiplies_alpha() {
        let mixed = mix("color-mix(in srgb, rgb(255 0 0 / 0), blue)");
        assert_eq!(
            mixed,
            Some(ColorValue::new(ColorSpace::Rgb, [0.0, 0.0, 255.0], 0.5))
        );
    }

    #[test]
    fn dilution_scales_alpha() {
        let mixed = mix("color-mix(in oklab, red 20%, blue 20%)");
        assert_eq!(mixed.map(|color| color.alpha), Some(Channel::Number(0.4)));
    }

    #[test]
    fn missing_components() {
        let mixed = mix("color-mix(in lch, lch(50 none none), lch(none 30 120))");
        let channels = mixed.map(|color| color.channels);
        assert_eq!(
            channels,
            Some([Channel::Number(50.0), Channel::Number(30.0), Channel::Number(120.0)])
        );
        let both = mix("color-mix(in lch, lch(50 10 none), lch(70 30 none))");
        assert!(both.is_some_and(|color| color.channels[2].is_none()));
    }

    #[test]
    fn nested_mixes_and_errors() {
        assert!(mix("color-mix(in srgb, color-mix(in srgb, red, blue), white)").is_some());
        assert_eq!(mix("color-mix(in srgb longer hue, red, blue)"), None);
        assert_eq!(mix("color-mix(in srgb, red)"), None);
        assert_eq!(mix("color-mix(in srgb, red 10% 20%, blue)"), None);
        assert_eq!(mix("color-mix(in nowhere, red, blue)"), None);
    }
}
