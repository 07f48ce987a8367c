//! CSS Color Module Level 4 — Color spaces, color values, and opacity.
//! Spec: <https://www.w3.org/TR/css-color-4/>
//! Spec: <https://www.w3.org/TR/css-color-5/> (`color-mix()`, relative colors)

#![forbid(unsafe_code)]

pub mod conversion;
pub mod matrix;
pub mod mix;
pub mod named;
pub mod parse;
pub mod relative;
pub mod serialize;
pub mod space;
pub mod value;

use core::error::Error;
use core::fmt::{Display, Formatter, Result as FmtResult};
use css_values_units::{CalcError, ValueError};

pub use conversion::{convert, convert_numbers, to_srgb_clipped};
pub use mix::{MixSyntax, MixWeights, mix_colors, mix_weights, parse_mix_syntax};
pub use named::{is_named_color, named_color};
pub use parse::{ParseContext, is_color, parse_color, parse_computed, parse_specified};
pub use serialize::{serialize_computed, serialize_legacy, specified_value, to_hex};
pub use space::{ColorSpace, Component, WhitePoint};
pub use value::{Channel, ColorValue, ParseOutcome};

/// Deepest accepted nesting of colors inside colors (`color-mix()` operands, relative
/// origins, `currentcolor` substitutions).
pub const MAX_DEPTH: usize = 32;

/// Why a text did not resolve to a color.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorError {
    /// The text does not match any color syntax.
    Syntax(String),
    /// `currentcolor` was used without a color to substitute.
    UnresolvedCurrentColor,
    /// Colors nested deeper than [`MAX_DEPTH`].
    NestingTooDeep,
    /// A math function inside a channel failed to fold.
    Calc(CalcError),
    /// A numeric channel failed to parse.
    Value(ValueError),
}

impl Display for ColorError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Syntax(text) => write!(formatter, "not a color: {text:?}"),
            Self::UnresolvedCurrentColor => write!(formatter, "currentcolor has no value"),
            Self::NestingTooDeep => write!(formatter, "colors nested deeper than {MAX_DEPTH}"),
            Self::Calc(error) => write!(formatter, "{error}"),
            Self::Value(error) => write!(formatter, "{error}"),
        }
    }
}

impl Error for ColorError {}

impl From<CalcError> for ColorError {
    fn from(error: CalcError) -> Self {
        Self::Calc(error)
    }
}

impl From<ValueError> for ColorError {
    fn from(error: ValueError) -> Self {
        Self::Value(error)
    }
}
