//! CSS Images Module Level 4 — Gradients.
//! Spec: <https://www.w3.org/TR/css-images-4/>

#![forbid(unsafe_code)]

pub mod chapter_3_gradients;

use core::error::Error;
use core::fmt::{Display, Formatter, Result as FmtResult};

pub use chapter_3_gradients::{
    Gradient, GradientItem, GradientKind, Interpolation, is_gradient, parse_gradient,
};

/// Why a value is not a valid gradient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GradientError {
    /// The text is not a gradient function, or a component is malformed.
    Syntax(String),
    /// Fewer than two color stops.
    TooFewStops(usize),
    /// A transition hint at either end of the list or next to another hint.
    MisplacedHint(String),
}

impl Display for GradientError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Syntax(text) => write!(formatter, "invalid gradient syntax: {text:?}"),
            Self::TooFewStops(count) => {
                write!(formatter, "gradient needs two color stops, found {count}")
            }
            Self::MisplacedHint(hint) => {
                write!(formatter, "transition hint {hint:?} must sit between color stops")
            }
        }
    }
}

impl Error for GradientError {}
