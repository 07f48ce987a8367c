//! Color value parsing.
//! Spec: <https://www.w3.org/TR/css-color-4/#typedef-color>
//!
//! Text is dispatched on its leading syntax: keywords, hex, `color-mix()`, relative color
//! syntax and then the absolute color functions. Nested colors (mix operands, relative
//! origins, `currentcolor` substitutions) recurse through [`parse_color`] with one more
//! level of depth.

pub mod components;
pub mod functions;
pub mod hex;

use crate::named::named_color;
use crate::space::ColorSpace;
use crate::value::{ColorValue, ParseOutcome};
use crate::{ColorError, MAX_DEPTH, mix, relative, serialize};
use css_syntax::{Pattern, grammar};
use css_values_units::Dimensions;

/// Inputs shared by every parser in one resolution.
#[derive(Clone, Copy, Debug)]
pub struct ParseContext<'ctx> {
    /// Unit ratios for lengths inside math functions.
    pub dimensions: &'ctx Dimensions,
    /// The color `currentcolor` stands for, if known.
    pub current_color: Option<&'ctx str>,
    depth: usize,
}

impl<'ctx> ParseContext<'ctx> {
    /// A top-level context.
    #[inline]
    pub const fn new(dimensions: &'ctx Dimensions) -> Self {
        Self {
            dimensions,
            current_color: None,
            depth: 0,
        }
    }

    /// Substitute `current_color` for the `currentcolor` keyword.
    #[inline]
    #[must_use]
    pub const fn with_current_color(mut self, current_color: Option<&'ctx str>) -> Self {
        self.current_color = current_color;
        self
    }

    /// The context for a nested color.
    ///
    /// # Errors
    /// Returns [`ColorError::NestingTooDeep`] past [`MAX_DEPTH`] levels.
    pub fn deeper(self) -> Result<Self, ColorError> {
        if self.depth >= MAX_DEPTH {
            return Err(ColorError::NestingTooDeep);
        }
        Ok(Self {
            depth: self.depth + 1,
            ..self
        })
    }
}

/// Parse any `<color>` into its numeric value.
///
/// # Errors
/// Returns [`ColorError`] when `text` is not a color, or names `currentcolor` without a
/// substitute.
pub fn parse_color(text: &str, context: &ParseContext<'_>) -> Result<ColorValue, ColorError> {
    let value = text.trim().to_ascii_lowercase();
    let table = grammar();
    match value.as_str() {
        "transparent" => return Ok(ColorValue::transparent()),
        "currentcolor" => {
            let current = context.current_color.ok_or(ColorError::UnresolvedCurrentColor)?;
            return parse_color(current, &context.deeper()?);
        }
        _ => {}
    }
    if value.starts_with('#') {
        return hex::parse_hex(&value);
    }
    if let Some([red, green, blue]) = named_color(&value) {
        return Ok(ColorValue::new(
            ColorSpace::Rgb,
            [f64::from(red), f64::from(green), f64::from(blue)],
            1.0,
        ));
    }
    if table.is_match(Pattern::ColorMix, &value) {
        return mix::mix_colors(&value, context);
    }
    if table.is_match(Pattern::RelativeColor, &value) {
        return relative::parse_relative(&value, context);
    }
    if table.is_match(Pattern::ColorFunction, &value) {
        return functions::parse_function(&value, context.dimensions);
    }
    Err(ColorError::Syntax(value))
}

/// Whether `text` parses as a color. `currentcolor` always counts.
pub fn is_color(text: &str, context: &ParseContext<'_>) -> bool {
    let value = text.trim().to_ascii_lowercase();
    value == "currentcolor" || parse_color(&value, context).is_ok()
}

/// Parse for a computed value.
pub fn parse_computed(text: &str, context: &ParseContext<'_>) -> ParseOutcome {
    match parse_color(text, context) {
        Ok(color) => ParseOutcome::Computed(color),
        Err(error) => {
            log::debug!("{text:?} is not a computable color: {error}");
            ParseOutcome::Invalid
        }
    }
}

/// Parse for a specified value.
pub fn parse_specified(text: &str, context: &ParseContext<'_>) -> ParseOutcome {
    match serialize::specified_value(text, context) {
        Ok(specified) => ParseOutcome::Specified(specified),
        Err(error) => {
            log::debug!("{text:?} is not a specified color: {error}");
            ParseOutcome::Invalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        let dimensions = Dimensions::new();
        let context = ParseContext::new(&dimensions);
        assert_eq!(parse_color("Transparent", &context), Ok(ColorValue::transparent()));
        assert_eq!(
            parse_color("currentColor", &context),
            Err(ColorError::UnresolvedCurrentColor)
        );
        let themed = context.with_current_color(Some("lime"));
        assert_eq!(
            parse_color("currentcolor", &themed),
            Ok(ColorValue::new(ColorSpace::Rgb, [0.0, 255.0, 0.0], 1.0))
        );
        assert!(is_color("currentcolor", &context));
        assert!(!is_color("not-a-color", &context));
    }

    #[test]
    fn self_referencing_current_color_terminates() {
        let dimensions = Dimensions::new();
        let context = ParseContext::new(&dimensions).with_current_color(Some("currentcolor"));
        assert_eq!(
            parse_color("currentcolor", &context),
            Err(ColorError::NestingTooDeep)
        );
    }
}
