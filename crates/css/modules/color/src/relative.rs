//! Relative color syntax (`rgb(from <color> r g b / alpha)`).
//! Spec: <https://www.w3.org/TR/css-color-5/#relative-colors>
//!
//! The origin color is converted into the function's space, each channel keyword is
//! replaced by the origin's value for that channel, and the channels are read again as
//! ordinary components (so `calc(l + 10)` folds like any other math function).

use crate::conversion::convert;
use crate::parse::functions::{build_color, function_space, split_channels};
use crate::parse::{ParseContext, parse_color};
use crate::space::ColorSpace;
use crate::value::ColorValue;
use crate::ColorError;
use css_syntax::{ValueToken, function_arguments, serialize_number, split_components, tokenize};

/// Replace channel keywords in `component` with their values.
fn substitute(component: &str, keywords: &[(&str, f64)]) -> String {
    tokenize(component)
        .into_iter()
        .map(|token| match token {
            ValueToken::Ident(name) => keywords
                .iter()
                .find(|(keyword, _)| *keyword == name)
                .map_or(name, |(_, value)| serialize_number(*value)),
            other => other.to_css(),
        })
        .collect()
}

/// Parse relative color syntax for any color function.
///
/// # Errors
/// Returns [`ColorError`] when the origin or a channel expression is invalid.
pub fn parse_relative(text: &str, context: &ParseContext<'_>) -> Result<ColorValue, ColorError> {
    let invalid = || ColorError::Syntax(text.to_owned());
    let (name, arguments) = function_arguments(text).ok_or_else(invalid)?;
    let parts = split_components(arguments);
    let [from, origin_text, rest @ ..] = parts.as_slice() else {
        return Err(invalid());
    };
    if from != "from" {
        return Err(invalid());
    }
    let (space, channel_parts) = if name == "color" {
        let (space_name, channels) = rest.split_first().ok_or_else(invalid)?;
        let space = ColorSpace::from_predefined(space_name).ok_or_else(invalid)?;
        (space, channels)
    } else {
        (function_space(name).ok_or_else(invalid)?, rest)
    };
    let origin = convert(&parse_color(origin_text, &context.deeper()?)?, space);
    let [first, second, third] = space.channel_keywords();
    let [value1, value2, value3] = origin.numbers();
    let keywords = [
        (first, value1),
        (second, value2),
        (third, value3),
        ("alpha", origin.alpha.or_zero()),
    ];
    let substituted: Vec<String> = channel_parts
        .iter()
        .map(|part| {
            if part == "/" {
                part.clone()
            } else {
                substitute(part, &keywords)
            }
        })
        .collect();
    let arguments = split_channels(&substituted, false, text)?;
    build_color(space, &arguments, origin.alpha, context.dimensions, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Channel;
    use css_values_units::Dimensions;

    fn parse(text: &str) -> Option<ColorValue> {
        let dimensions = Dimensions::new();
        parse_relative(text, &ParseContext::new(&dimensions)).ok()
    }

    #[test]
    fn keywords_take_origin_values() {
        assert_eq!(
            parse("rgb(from red r g b)"),
            Some(ColorValue::new(ColorSpace::Rgb, [255.0, 0.0, 0.0], 1.0))
        );
        assert_eq!(
            parse("rgb(from red b g r / 0.5)"),
            Some(ColorValue::new(ColorSpace::Rgb, [0.0, 0.0, 255.0], 0.5))
        );
        assert_eq!(
            parse("rgb(from #00000080 r g b)").map(|color| color.alpha),
            Some(Channel::Number(0.5))
        );
    }

    #[test]
    fn channels_fold_math() {
        let color = parse("hsl(from rgb(255 0 0) calc(h + 120) s l)");
        assert_eq!(
            color.map(|value| value.channels[0]),
            Some(Channel::Number(120.0))
        );
        assert_eq!(
            parse("color(from color(srgb 0.2 0.4 0.6) srgb calc(r * 2) g b / calc(alpha / 2))"),
            Some(ColorValue::new(ColorSpace::Srgb, [0.4, 0.4, 0.6], 0.5))
        );
    }

    #[test]
    fn malformed_is_rejected() {
        assert_eq!(parse("rgb(from red r g)"), None);
        assert_eq!(parse("rgb(from nothing r g b)"), None);
        assert_eq!(parse("rgb(from red r, g, b)"), None);
    }
}
