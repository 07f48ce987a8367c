//! Serializing colors.
//! Spec: <https://www.w3.org/TR/css-color-4/#serializing-color-values>

use crate::conversion::{convert, to_srgb_clipped};
use crate::mix::{mix_weights, parse_mix_syntax};
use crate::named::is_named_color;
use crate::parse::hex::parse_hex;
use crate::parse::{ParseContext, parse_color};
use crate::space::ColorSpace;
use crate::value::{Channel, ColorValue};
use crate::ColorError;
use css_syntax::{Pattern, grammar, serialize_number};
use css_values_units::{Precision, normalize_alpha, round_with};

/// A channel in modern syntax: rounded to six significant digits, or `none`.
fn modern_channel(channel: Channel) -> String {
    channel.value().map_or_else(
        || "none".to_owned(),
        |value| serialize_number(round_with(value, Precision::Serialization)),
    )
}

/// ` / <alpha>` unless the color is fully opaque.
fn modern_alpha(alpha: Channel) -> String {
    match alpha {
        Channel::Number(value) if value >= 1.0 => String::new(),
        Channel::Number(value) => format!(" / {}", serialize_number(normalize_alpha(value))),
        Channel::None => " / none".to_owned(),
    }
}

/// `rgb(r, g, b)` or `rgba(r, g, b, a)` with integer channels.
pub fn serialize_legacy(color: &ColorValue) -> String {
    let rgb = convert(color, ColorSpace::Rgb);
    let [red, green, blue] = rgb
        .numbers()
        .map(|channel| serialize_number(channel.clamp(0.0, 255.0).round()));
    let alpha = normalize_alpha(rgb.alpha.or_zero());
    if alpha >= 1.0 {
        format!("rgb({red}, {green}, {blue})")
    } else {
        format!("rgba({red}, {green}, {blue}, {})", serialize_number(alpha))
    }
}

/// Serialize in the notation belonging to the color's space.
///
/// Legacy spaces use `rgb()`/`rgba()`, the Lab family keeps its own function and every
/// other space uses `color()`.
pub fn serialize_computed(color: &ColorValue) -> String {
    if color.space.is_legacy() {
        return serialize_legacy(color);
    }
    let [first, second, third] = color.channels.map(modern_channel);
    let alpha = modern_alpha(color.alpha);
    if color.space.is_predefined() {
        format!("color({} {first} {second} {third}{alpha})", color.space)
    } else {
        format!("{}({first} {second} {third}{alpha})", color.space)
    }
}

/// `#rrggbb`, or `#rrggbbaa` with `with_alpha`, clipped to the sRGB gamut.
pub fn to_hex(color: &ColorValue, with_alpha: bool) -> String {
    let [red, green, blue] =
        to_srgb_clipped(color).map(|channel| (channel * 255.0).round() as u8);
    let hex = format!("#{red:02x}{green:02x}{blue:02x}");
    if !with_alpha {
        return hex;
    }
    let alpha = (color.alpha.or_zero().clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("{hex}{alpha:02x}")
}

/// The specified value of a color: keywords and hex stay as written (lower-cased),
/// `color-mix()` keeps its structure with canonical operands and everything else
/// serializes like its computed value.
///
/// # Errors
/// Returns [`ColorError`] when `text` is not a color.
pub fn specified_value(text: &str, context: &ParseContext<'_>) -> Result<String, ColorError> {
    let value = text.trim().to_ascii_lowercase();
    if value == "transparent" || value == "currentcolor" || is_named_color(&value) {
        return Ok(value);
    }
    if value.starts_with('#') {
        parse_hex(&value)?;
        return Ok(value);
    }
    if grammar().is_match(Pattern::ColorMix, &value) {
        return specified_mix(&value, context);
    }
    parse_color(&value, context).map(|color| serialize_computed(&color))
}

fn specified_mix(text: &str, context: &ParseContext<'_>) -> Result<String, ColorError> {
    let syntax = parse_mix_syntax(text, context.dimensions)?;
    let [first, second] = &syntax.operands;
    mix_weights(first.percentage, second.percentage)?;
    let nested = context.deeper()?;
    let mut method = format!("in {}", syntax.space);
    if let Some(arc) = syntax.arc {
        method = format!("{method} {} hue", arc.keyword());
    }
    let mut arguments = vec![method];
    for operand in &syntax.operands {
        let color = specified_value(&operand.color, &nested)?;
        arguments.push(match operand.percentage {
            Some(percentage) => format!("{color} {}%", serialize_number(percentage)),
            None => color,
        });
    }
    Ok(format!("color-mix({})", arguments.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_values_units::Dimensions;

    fn specified(text: &str) -> Option<String> {
        let dimensions = Dimensions::new();
        specified_value(text, &ParseContext::new(&dimensions)).ok()
    }

    #[test]
    fn legacy_output() {
        let color = ColorValue::new(ColorSpace::Rgb, [127.5, 0.0, 300.0], 1.0);
        assert_eq!(serialize_legacy(&color), "rgb(128, 0, 255)");
        let translucent = ColorValue::new(ColorSpace::Hsl, [120.0, 100.0, 50.0], 0.25);
        assert_eq!(serialize_computed(&translucent), "rgba(0, 255, 0, 0.25)");
    }

    #[test]
    fn modern_output() {
        let lab = ColorValue::with_channels(
            ColorSpace::Lab,
            [Channel::Number(50.0), Channel::None, Channel::Number(-20.123_456_7)],
            Channel::Number(0.5),
        );
        assert_eq!(serialize_computed(&lab), "lab(50 none -20.1235 / 0.5)");
        let p3 = ColorValue::new(ColorSpace::DisplayP3, [1.0, 0.5, 0.0], 1.0);
        assert_eq!(serialize_computed(&p3), "color(display-p3 1 0.5 0)");
    }

    #[test]
    fn hex_output() {
        let red = ColorValue::new(ColorSpace::Rgb, [255.0, 0.0, 0.0], 1.0);
        assert_eq!(to_hex(&red, false), "#ff0000");
        let half = ColorValue::new(ColorSpace::Rgb, [0.0, 0.0, 0.0], 0.5);
        assert_eq!(to_hex(&half, true), "#00000080");
        let wide = ColorValue::new(ColorSpace::DisplayP3, [1.2, -0.1, 0.0], 1.0);
        assert!(to_hex(&wide, false).starts_with("#ff00"));
    }

    #[test]
    fn specified_forms() {
        assert_eq!(specified("RebeccaPurple").as_deref(), Some("rebeccapurple"));
        assert_eq!(specified("#ABC").as_deref(), Some("#abc"));
        assert_eq!(specified("hsl(120 100% 50%)").as_deref(), Some("rgb(0, 255, 0)"));
        assert_eq!(
            specified("color-mix(in oklch longer hue, Red 40%, #00f)").as_deref(),
            Some("color-mix(in oklch longer hue, red 40%, #00f)")
        );
        assert_eq!(specified("#abcd1"), None);
        assert_eq!(specified("rgb(1 2)"), None);
    }
}
