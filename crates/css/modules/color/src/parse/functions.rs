//! Absolute color functions: `rgb()`, `hsl()`, `hwb()`, `lab()`, `lch()`, `oklab()`,
//! `oklch()` and `color()`.
//! Spec: <https://www.w3.org/TR/css-color-4/#color-syntax>

use super::components::{ChannelKind, RawComponent, read_component};
use crate::ColorError;
use crate::space::ColorSpace;
use crate::value::{Channel, ColorValue};
use css_syntax::{function_arguments, split_components};
use css_values_units::Dimensions;

/// Channel rules of each function, in channel order.
pub fn channel_kinds(space: ColorSpace) -> [ChannelKind; 3] {
    match space {
        ColorSpace::Rgb => [ChannelKind::bounded(255.0, 0.0, 255.0); 3],
        ColorSpace::Hsl => [
            ChannelKind::Hue,
            ChannelKind::bounded(100.0, 0.0, f64::INFINITY),
            ChannelKind::bounded(100.0, 0.0, 100.0),
        ],
        ColorSpace::Hwb => [
            ChannelKind::Hue,
            ChannelKind::bounded(100.0, 0.0, 100.0),
            ChannelKind::bounded(100.0, 0.0, 100.0),
        ],
        ColorSpace::Lab => [
            ChannelKind::bounded(100.0, 0.0, 100.0),
            ChannelKind::unbounded(125.0),
            ChannelKind::unbounded(125.0),
        ],
        ColorSpace::Lch => [
            ChannelKind::bounded(100.0, 0.0, 100.0),
            ChannelKind::bounded(150.0, 0.0, f64::INFINITY),
            ChannelKind::Hue,
        ],
        ColorSpace::Oklab => [
            ChannelKind::bounded(1.0, 0.0, 1.0),
            ChannelKind::unbounded(0.4),
            ChannelKind::unbounded(0.4),
        ],
        ColorSpace::Oklch => [
            ChannelKind::bounded(1.0, 0.0, 1.0),
            ChannelKind::bounded(0.4, 0.0, f64::INFINITY),
            ChannelKind::Hue,
        ],
        ColorSpace::Srgb
        | ColorSpace::SrgbLinear
        | ColorSpace::DisplayP3
        | ColorSpace::A98Rgb
        | ColorSpace::ProphotoRgb
        | ColorSpace::Rec2020
        | ColorSpace::XyzD65
        | ColorSpace::XyzD50 => [ChannelKind::unbounded(1.0); 3],
    }
}

/// The space a color function name produces. `color` needs its first argument instead.
pub fn function_space(name: &str) -> Option<ColorSpace> {
    match name {
        "rgb" | "rgba" => Some(ColorSpace::Rgb),
        "hsl" | "hsla" => Some(ColorSpace::Hsl),
        "hwb" => Some(ColorSpace::Hwb),
        "lab" => Some(ColorSpace::Lab),
        "lch" => Some(ColorSpace::Lch),
        "oklab" => Some(ColorSpace::Oklab),
        "oklch" => Some(ColorSpace::Oklch),
        _ => None,
    }
}

/// Arguments split into three channel texts and an optional alpha text.
#[derive(Debug)]
pub struct ChannelArguments<'parts> {
    pub channels: [&'parts str; 3],
    pub alpha: Option<&'parts str>,
    /// Written with the legacy comma-separated syntax.
    pub legacy: bool,
}

/// Split function arguments into channels and alpha.
///
/// The modern form is `c1 c2 c3 [/ alpha]`. With `allow_legacy`, the comma form
/// `c1, c2, c3[, alpha]` is accepted too.
///
/// # Errors
/// Returns [`ColorError::Syntax`] when the arguments have any other shape.
pub fn split_channels<'parts>(
    parts: &'parts [String],
    allow_legacy: bool,
    text: &str,
) -> Result<ChannelArguments<'parts>, ColorError> {
    let invalid = || ColorError::Syntax(text.to_owned());
    let parts: Vec<&'parts str> = parts.iter().map(String::as_str).collect();
    let legacy = parts.contains(&",");
    if legacy && (!allow_legacy || parts.contains(&"/")) {
        return Err(invalid());
    }
    let (channels, alpha) = match parts.as_slice() {
        [first, ",", second, ",", third] if legacy => ([*first, *second, *third], None),
        [first, ",", second, ",", third, ",", alpha] if legacy => {
            ([*first, *second, *third], Some(*alpha))
        }
        [first, second, third] if !legacy => ([*first, *second, *third], None),
        [first, second, third, "/", alpha] if !legacy => {
            ([*first, *second, *third], Some(*alpha))
        }
        _ => return Err(invalid()),
    };
    let separators = [",", "/"];
    if channels.iter().chain(alpha.iter()).any(|part| separators.contains(part)) {
        return Err(invalid());
    }
    Ok(ChannelArguments {
        channels,
        alpha,
        legacy,
    })
}

/// Legacy syntax forbids `none`, and `rgb()` may not mix numbers with percentages while
/// `hsl()` needs percentages for saturation and lightness.
fn check_legacy(
    space: ColorSpace,
    raw: &[RawComponent; 3],
    alpha: Option<RawComponent>,
    text: &str,
) -> Result<(), ColorError> {
    let invalid = || ColorError::Syntax(text.to_owned());
    if raw.iter().any(|component| component.is_none())
        || alpha.is_some_and(RawComponent::is_none)
    {
        return Err(invalid());
    }
    let consistent = match space {
        ColorSpace::Rgb => {
            raw.iter().all(|component| component.is_percentage())
                || raw.iter().all(|component| matches!(component, RawComponent::Number(_)))
        }
        ColorSpace::Hsl => raw[1].is_percentage() && raw[2].is_percentage(),
        _ => true,
    };
    if consistent { Ok(()) } else { Err(invalid()) }
}

/// Build a color in `space` from already-split channel texts.
///
/// A missing alpha defaults to `default_alpha`.
///
/// # Errors
/// Returns [`ColorError`] when a channel is malformed or breaks the legacy rules.
pub fn build_color(
    space: ColorSpace,
    arguments: &ChannelArguments<'_>,
    default_alpha: Channel,
    dimensions: &Dimensions,
    text: &str,
) -> Result<ColorValue, ColorError> {
    let raw = [
        read_component(arguments.channels[0], dimensions)?,
        read_component(arguments.channels[1], dimensions)?,
        read_component(arguments.channels[2], dimensions)?,
    ];
    let raw_alpha = arguments
        .alpha
        .map(|alpha| read_component(alpha, dimensions))
        .transpose()?;
    if arguments.legacy {
        check_legacy(space, &raw, raw_alpha, text)?;
    }
    let kinds = channel_kinds(space);
    let channels = [
        kinds[0].apply(raw[0], arguments.channels[0])?,
        kinds[1].apply(raw[1], arguments.channels[1])?,
        kinds[2].apply(raw[2], arguments.channels[2])?,
    ];
    let alpha = match (raw_alpha, arguments.alpha) {
        (Some(component), Some(alpha_text)) => ChannelKind::Alpha.apply(component, alpha_text)?,
        _ => default_alpha,
    };
    Ok(ColorValue::with_channels(space, channels, alpha))
}

/// Parse an absolute color function.
///
/// # Errors
/// Returns [`ColorError`] when `text` is not a well-formed color function.
pub fn parse_function(text: &str, dimensions: &Dimensions) -> Result<ColorValue, ColorError> {
    let invalid = || ColorError::Syntax(text.to_owned());
    let (name, arguments) = function_arguments(text).ok_or_else(invalid)?;
    let parts = split_components(arguments);
    if name == "color" {
        let (space_name, rest) = parts.split_first().ok_or_else(invalid)?;
        let space = ColorSpace::from_predefined(space_name).ok_or_else(invalid)?;
        let split = split_channels(rest, false, text)?;
        return build_color(space, &split, Channel::Number(1.0), dimensions, text);
    }
    let space = function_space(name).ok_or_else(invalid)?;
    let allow_legacy = matches!(space, ColorSpace::Rgb | ColorSpace::Hsl);
    let split = split_channels(&parts, allow_legacy, text)?;
    build_color(space, &split, Channel::Number(1.0), dimensions, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<ColorValue> {
        parse_function(text, &Dimensions::new()).ok()
    }

    #[test]
    fn legacy_and_modern_rgb() {
        let expected = ColorValue::new(ColorSpace::Rgb, [255.0, 0.0, 0.0], 1.0);
        assert_eq!(parse("rgb(255, 0, 0)"), Some(expected));
        assert_eq!(parse("rgb(255 0 0)"), Some(expected));
        assert_eq!(parse("rgba(100%, 0%, 0%, 1)"), Some(expected));
        assert_eq!(
            parse("rgb(255 0 0 / 50%)"),
            Some(ColorValue::new(ColorSpace::Rgb, [255.0, 0.0, 0.0], 0.5))
        );
    }

    #[test]
    fn legacy_restrictions() {
        assert_eq!(parse("rgb(255, 0%, 0)"), None);
        assert_eq!(parse("rgb(none, 0, 0)"), None);
        assert_eq!(parse("hsl(120, 100, 50)"), None);
        assert_eq!(parse("hwb(120, 10%, 10%)"), None);
        assert_eq!(parse("rgb(1, 2, 3 / 0.5)"), None);
        assert!(parse("rgb(none 0 0)").is_some_and(|color| color.channels[0].is_none()));
    }

    #[test]
    fn modern_functions() {
        assert_eq!(
            parse("lab(50% 100% -50%)"),
            Some(ColorValue::new(ColorSpace::Lab, [50.0, 125.0, -62.5], 1.0))
        );
        assert_eq!(
            parse("oklch(100% 50% 1turn)"),
            Some(ColorValue::new(ColorSpace::Oklch, [1.0, 0.2, 0.0], 1.0))
        );
        assert_eq!(
            parse("color(display-p3 1 50% 0 / none)"),
            Some(ColorValue::with_channels(
                ColorSpace::DisplayP3,
                [Channel::Number(1.0), Channel::Number(0.5), Channel::Number(0.0)],
                Channel::None,
            ))
        );
        assert_eq!(
            parse("color(xyz 0.1 0.2 0.3)").map(|color| color.space),
            Some(ColorSpace::XyzD65)
        );
        assert_eq!(parse("color(unknown 1 1 1)"), None);
        assert_eq!(parse("lab(50 10)"), None);
    }

    #[test]
    fn channels_may_be_math() {
        assert_eq!(
            parse("rgb(calc(100 + 55) 0 0)"),
            Some(ColorValue::new(ColorSpace::Rgb, [155.0, 0.0, 0.0], 1.0))
        );
        assert_eq!(
            parse("hsl(calc(90deg * 2) 50% 50%)").map(|color| color.channels[0]),
            Some(Channel::Number(180.0))
        );
    }
}
