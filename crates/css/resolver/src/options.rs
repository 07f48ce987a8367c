//! Resolution options.

use css_color::ParseContext;
use css_values_units::Dimensions;
use css_variables::CustomProperties;
use serde::Serialize;

/// Output format requested from [`crate::ColorEngine::resolve_color`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorFormat {
    /// `rgb()`/`rgba()` for legacy colors, the native function otherwise.
    #[default]
    ComputedValue,
    /// Canonical text as written, `""` when invalid.
    SpecifiedValue,
    /// The numeric color produced by mixing.
    MixValue,
    /// `#rrggbb`.
    Hex,
    /// `#rrggbbaa`.
    HexAlpha,
}

/// Everything that can change a resolution result. Every field takes part in cache keys.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ResolveOptions {
    pub format: ColorFormat,
    /// Space to express mixed (and computed) colors in.
    pub color_space: Option<String>,
    /// Use the D50 white point for XYZ output.
    pub d50: bool,
    /// Report invalid input as [`crate::ColorResult::Invalid`] rather than a default.
    pub nullable: bool,
    /// Include alpha in hex output.
    pub alpha: bool,
    /// The color `currentcolor` resolves to.
    pub current_color: Option<String>,
    /// Custom properties for `var()` substitution.
    pub custom_property: CustomProperties,
    /// Unit ratios for lengths inside math functions.
    pub dimension: Dimensions,
}

impl ResolveOptions {
    /// Default options.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_format(mut self, format: ColorFormat) -> Self {
        self.format = format;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_color_space(mut self, color_space: &str) -> Self {
        self.color_space = Some(color_space.to_ascii_lowercase());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_d50(mut self, d50: bool) -> Self {
        self.d50 = d50;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_alpha(mut self, alpha: bool) -> Self {
        self.alpha = alpha;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_current_color(mut self, current_color: &str) -> Self {
        self.current_color = Some(current_color.to_owned());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_custom_properties(mut self, custom_property: CustomProperties) -> Self {
        self.custom_property = custom_property;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_dimensions(mut self, dimension: Dimensions) -> Self {
        self.dimension = dimension;
        self
    }

    /// Parser inputs derived from these options.
    pub fn parse_context(&self) -> ParseContext<'_> {
        ParseContext::new(&self.dimension).with_current_color(self.current_color.as_deref())
    }
}
