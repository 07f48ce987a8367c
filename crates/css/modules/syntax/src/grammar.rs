//! Grammar constants for CSS value syntax.
//!
//! The fragments below are the single source of truth for the textual shape of numbers,
//! percentages, angles, lengths and every function form the resolvers understand.
//! Composite patterns are assembled from them once and kept in a static [`Grammar`] table.
//!
//! Spec: <https://www.w3.org/TR/css-values-4/#numeric-types>
//! Spec: <https://www.w3.org/TR/css-color-4/#color-syntax>

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A `<number>` (optional sign, integer or decimal, optional exponent).
pub const NUM: &str = r"[+\-]?(?:\d+(?:\.\d*)?|\.\d+)(?:e[+\-]?\d+)?";
/// A `<percentage>`.
pub const PCT: &str = r"[+\-]?(?:\d+(?:\.\d*)?|\.\d+)(?:e[+\-]?\d+)?%";
/// An `<angle>` in any of the four angle units.
pub const ANGLE: &str = r"[+\-]?(?:\d+(?:\.\d*)?|\.\d+)(?:e[+\-]?\d+)?(?:deg|g?rad|turn)";
/// A `<dimension>` with an alphabetic unit.
pub const LENGTH: &str = r"[+\-]?(?:\d+(?:\.\d*)?|\.\d+)(?:e[+\-]?\d+)?[a-z]+";
/// The `none` keyword for missing components.
pub const NONE: &str = "none";
/// A hex color with 3, 4, 6 or 8 digits.
pub const HEX: &str = r"#(?:[\da-f]{8}|[\da-f]{6}|[\da-f]{3,4})";

/// Legacy and modern sRGB function names.
pub const FN_RGB: &str = "rgba?";
/// HSL function names.
pub const FN_HSL: &str = "hsla?";
/// HWB function name.
pub const FN_HWB: &str = "hwb";
/// Lab and OKLab function names.
pub const FN_LAB: &str = "(?:ok)?lab";
/// LCh and OKLCh function names.
pub const FN_LCH: &str = "(?:ok)?lch";
/// Every function producing an absolute color.
pub const FN_COLOR: &str = "rgba?|hsla?|hwb|(?:ok)?lab|(?:ok)?lch|color";
/// Math functions from CSS Values 4.
pub const FN_MATH: &str = "calc|min|max|clamp|abs|sign|round|mod|rem|sin|cos|tan|asin|acos|atan2|atan|pow|sqrt|hypot|log|exp";

/// RGB-like predefined color spaces usable in `color()`.
pub const CS_RGB: &str = "srgb(?:-linear)?|display-p3|a98-rgb|prophoto-rgb|rec2020";
/// XYZ color spaces usable in `color()`.
pub const CS_XYZ: &str = "xyz(?:-d(?:50|65))?";
/// Polar interpolation spaces (with a hue channel).
pub const CS_POLAR: &str = "hsl|hwb|(?:ok)?lch";
/// Rectangular interpolation spaces.
pub const CS_RECT: &str = "srgb(?:-linear)?|display-p3|a98-rgb|prophoto-rgb|rec2020|(?:ok)?lab|xyz(?:-d(?:50|65))?";
/// Hue interpolation methods.
pub const HUE_ARC: &str = "(?:short|long)er|(?:in|de)creasing";

/// Named patterns in the compiled [`Grammar`] table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// A whole string that is a `<number>`.
    Number,
    /// A whole string that is a `<percentage>`.
    Percentage,
    /// A whole string that is an `<angle>`.
    Angle,
    /// A whole string that is a `<dimension>`.
    Length,
    /// A whole string that is a hex color.
    Hex,
    /// A string opening with an absolute color function.
    ColorFunction,
    /// A string opening with relative color syntax (`<fn>(from ...`).
    RelativeColor,
    /// A string opening with `color-mix(`.
    ColorMix,
    /// The `in <space> [<arc> hue]` prefix of `color-mix()`; captures `space` and `arc`.
    MixInterpolation,
    /// A predefined space name valid inside `color()`; captures `space`.
    PredefinedSpace,
    /// A string containing a math function call anywhere.
    MathFunction,
    /// A string opening with a math function call.
    MathFunctionStart,
    /// A string containing `var(` anywhere.
    VarFunction,
    /// A string opening with a gradient function.
    Gradient,
}

impl Pattern {
    /// Every pattern, in table order.
    pub const ALL: [Self; 14] = [
        Self::Number,
        Self::Percentage,
        Self::Angle,
        Self::Length,
        Self::Hex,
        Self::ColorFunction,
        Self::RelativeColor,
        Self::ColorMix,
        Self::MixInterpolation,
        Self::PredefinedSpace,
        Self::MathFunction,
        Self::MathFunctionStart,
        Self::VarFunction,
        Self::Gradient,
    ];

    /// The regular expression source for this pattern.
    pub fn source(self) -> String {
        match self {
            Self::Number => format!("^{NUM}$"),
            Self::Percentage => format!("^{PCT}$"),
            Self::Angle => format!("^{ANGLE}$"),
            Self::Length => format!("^{LENGTH}$"),
            Self::Hex => format!("^{HEX}$"),
            Self::ColorFunction => format!(r"^(?:{FN_COLOR})\("),
            Self::RelativeColor => format!(r"^(?:{FN_COLOR})\(\s*from\s"),
            Self::ColorMix => r"^color-mix\(".to_owned(),
            Self::MixInterpolation => format!(
                r"^in\s+(?:(?P<polar>{CS_POLAR})(?:\s+(?P<arc>{HUE_ARC})\s+hue)?|(?P<rect>{CS_RECT}))$"
            ),
            Self::PredefinedSpace => format!("^(?P<space>{CS_RGB}|{CS_XYZ})$"),
            Self::MathFunction => format!(r"(?:^|[^\w-])(?:{FN_MATH})\("),
            Self::MathFunctionStart => format!(r"^(?:{FN_MATH})\("),
            Self::VarFunction => r"(?:^|[^\w-])var\(".to_owned(),
            Self::Gradient => r"^(?:repeating-)?(?:linear|radial|conic)-gradient\(".to_owned(),
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Compiled grammar table.
///
/// Patterns are compiled exactly once. A pattern that fails to compile is logged and
/// never matches; [`Grammar::compile_errors`] reports such failures.
pub struct Grammar {
    /// Compiled patterns indexed by [`Pattern`] discriminant.
    compiled: Vec<Option<Regex>>,
    /// Compile failures collected during construction.
    errors: Vec<(Pattern, String)>,
}

impl Grammar {
    fn compile() -> Self {
        let mut compiled = Vec::with_capacity(Pattern::ALL.len());
        let mut errors = Vec::new();
        for pattern in Pattern::ALL {
            match Regex::new(&pattern.source()) {
                Ok(regex) => compiled.push(Some(regex)),
                Err(error) => {
                    log::error!("grammar pattern {pattern:?} failed to compile: {error}");
                    errors.push((pattern, error.to_string()));
                    compiled.push(None);
                }
            }
        }
        Self { compiled, errors }
    }

    /// Whether `text` matches `pattern`.
    #[inline]
    pub fn is_match(&self, pattern: Pattern, text: &str) -> bool {
        self.regex(pattern)
            .is_some_and(|regex| regex.is_match(text))
    }

    /// Capture groups of `pattern` against `text`.
    #[inline]
    pub fn captures<'text>(&self, pattern: Pattern, text: &'text str) -> Option<Captures<'text>> {
        self.regex(pattern)?.captures(text)
    }

    /// Patterns that failed to compile, with the compiler's message.
    pub fn compile_errors(&self) -> &[(Pattern, String)] {
        &self.errors
    }

    fn regex(&self, pattern: Pattern) -> Option<&Regex> {
        self.compiled.get(pattern.index()).and_then(Option::as_ref)
    }
}

static GRAMMAR: Lazy<Grammar> = Lazy::new(Grammar::compile);

/// The process-wide compiled grammar table.
#[inline]
pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}
