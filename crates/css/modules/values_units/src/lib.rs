//! CSS Values and Units Module Level 4 — Numeric types, units and math functions.
//! Spec: <https://www.w3.org/TR/css-values-4/>

#![forbid(unsafe_code)]

// Per-chapter modules mirroring the spec table of contents.
// Each module documents functions with references to the exact spec section.
pub mod chapter_10_math_functions;
pub mod chapter_4_numbers;
pub mod chapter_5_percentages;
pub mod chapter_6_dimensions;
pub mod chapter_7_angles;

use core::error::Error;
use core::fmt::{Display, Formatter, Result as FmtResult};

// Re-exports for ergonomic access from other crates.
pub use chapter_10_math_functions::{
    CalcContext, CalcError, CalcSum, CalcValue, MAX_NESTING, css_calc, evaluate_calc, evaluate_math,
};
pub use chapter_4_numbers::{
    Precision, normalize_alpha, parse_alpha, parse_number, parse_number_clamped,
    round_to_precision, round_with,
};
pub use chapter_5_percentages::{parse_percentage, percentage_to_fraction};
pub use chapter_6_dimensions::{DimensionCallback, Dimensions, absolute_px_ratio};
pub use chapter_7_angles::{HueArc, angle_to_degrees, normalize_hue, parse_hue};

/// Error type for the numeric utilities in this crate.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueError {
    /// A caller-supplied argument fell outside its declared domain.
    Range {
        /// What was being validated.
        what: &'static str,
        /// The offending value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Text did not match the expected numeric grammar.
    Syntax(String),
}

impl Display for ValueError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Range {
                what,
                value,
                min,
                max,
            } => write!(formatter, "{what} {value} is outside {min}..={max}"),
            Self::Syntax(text) => write!(formatter, "invalid numeric syntax: {text:?}"),
        }
    }
}

impl Error for ValueError {}
