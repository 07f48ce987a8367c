//! Color space tags.
//! Spec: <https://www.w3.org/TR/css-color-4/#color-type>

use core::fmt::{Display, Formatter, Result as FmtResult};

/// A reference white used during color conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WhitePoint {
    /// D50 white reference.
    D50,
    /// D65 white reference.
    D65,
}

/// Analogous component categories, used to carry missing components forward across
/// conversions.
///
/// Spec: <https://www.w3.org/TR/css-color-4/#interpolation-missing>
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    /// `r`, `x`
    Red,
    /// `g`, `y`
    Green,
    /// `b`, `z`
    Blue,
    /// `l` in HSL, `L` in Lab, LCh, OKLab and OKLCh
    Lightness,
    /// `s` in HSL, `C` in LCh and OKLCh
    Colorfulness,
    /// `h` in HSL, HWB, LCh and OKLCh
    Hue,
    /// `a` in Lab and OKLab
    OpponentA,
    /// `b` in Lab and OKLab
    OpponentB,
    /// HWB whiteness and blackness have no analogue.
    Unique,
}

/// Every color space a [`crate::ColorValue`] can be tagged with.
///
/// `Rgb`, `Hsl` and `Hwb` are the legacy sRGB syntaxes (`rgb()` channels on the 0..=255
/// scale, `hsl()`/`hwb()` percentages on 0..=100); `Srgb` is `color(srgb ...)` with
/// fractional channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorSpace {
    /// `rgb()`: sRGB channels on `0..=255`.
    Rgb,
    /// `hsl()`: hue in degrees, saturation and lightness on `0..=100`.
    Hsl,
    /// `hwb()`: hue in degrees, whiteness and blackness on `0..=100`.
    Hwb,
    /// CIE Lab under D50.
    Lab,
    /// Polar form of [`ColorSpace::Lab`].
    Lch,
    /// Oklab.
    Oklab,
    /// Polar form of [`ColorSpace::Oklab`].
    Oklch,
    /// `color(srgb …)`.
    Srgb,
    /// sRGB primaries without the transfer curve.
    SrgbLinear,
    /// Display P3.
    DisplayP3,
    /// Adobe RGB (1998).
    A98Rgb,
    /// ProPhoto RGB, D50.
    ProphotoRgb,
    /// ITU-R BT.2020.
    Rec2020,
    /// CIE XYZ under D65.
    XyzD65,
    /// CIE XYZ under D50.
    XyzD50,
}

impl ColorSpace {
    /// The CSS name of this space.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Rgb => "rgb",
            Self::Hsl => "hsl",
            Self::Hwb => "hwb",
            Self::Lab => "lab",
            Self::Lch => "lch",
            Self::Oklab => "oklab",
            Self::Oklch => "oklch",
            Self::Srgb => "srgb",
            Self::SrgbLinear => "srgb-linear",
            Self::DisplayP3 => "display-p3",
            Self::A98Rgb => "a98-rgb",
            Self::ProphotoRgb => "prophoto-rgb",
            Self::Rec2020 => "rec2020",
            Self::XyzD65 => "xyz-d65",
            Self::XyzD50 => "xyz-d50",
        }
    }

    /// A space valid as the first argument of `color()`. `xyz` is an alias of `xyz-d65`.
    pub fn from_predefined(name: &str) -> Option<Self> {
        match name {
            "srgb" => Some(Self::Srgb),
            "srgb-linear" => Some(Self::SrgbLinear),
            "display-p3" => Some(Self::DisplayP3),
            "a98-rgb" => Some(Self::A98Rgb),
            "prophoto-rgb" => Some(Self::ProphotoRgb),
            "rec2020" => Some(Self::Rec2020),
            "xyz" | "xyz-d65" => Some(Self::XyzD65),
            "xyz-d50" => Some(Self::XyzD50),
            _ => None,
        }
    }

    /// A space valid after `in` in `color-mix()` and gradients.
    pub fn from_interpolation(name: &str) -> Option<Self> {
        match name {
            "hsl" => Some(Self::Hsl),
            "hwb" => Some(Self::Hwb),
            "lab" => Some(Self::Lab),
            "lch" => Some(Self::Lch),
            "oklab" => Some(Self::Oklab),
            "oklch" => Some(Self::Oklch),
            _ => Self::from_predefined(name),
        }
    }

    /// Any space name accepted as a conversion target.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rgb" => Some(Self::Rgb),
            _ => Self::from_interpolation(name),
        }
    }

    /// Whether the space has a hue channel.
    #[inline]
    pub const fn is_polar(self) -> bool {
        self.hue_index().is_some()
    }

    /// Index of the hue channel in polar spaces.
    pub const fn hue_index(self) -> Option<usize> {
        match self {
            Self::Hsl | Self::Hwb => Some(0),
            Self::Lch | Self::Oklch => Some(2),
            Self::Rgb
            | Self::Lab
            | Self::Oklab
            | Self::Srgb
            | Self::SrgbLinear
            | Self::DisplayP3
            | Self::A98Rgb
            | Self::ProphotoRgb
            | Self::Rec2020
            | Self::XyzD65
            | Self::XyzD50 => None,
        }
    }

    /// The legacy sRGB syntaxes.
    #[inline]
    pub const fn is_legacy(self) -> bool {
        matches!(self, Self::Rgb | Self::Hsl | Self::Hwb)
    }

    /// Spaces written with `color()`.
    #[inline]
    pub const fn is_predefined(self) -> bool {
        !self.is_legacy()
            && !matches!(self, Self::Lab | Self::Lch | Self::Oklab | Self::Oklch)
    }

    /// Keywords naming each channel in relative color syntax.
    pub const fn channel_keywords(self) -> [&'static str; 3] {
        match self {
            Self::Hsl => ["h", "s", "l"],
            Self::Hwb => ["h", "w", "b"],
            Self::Lab | Self::Oklab => ["l", "a", "b"],
            Self::Lch | Self::Oklch => ["l", "c", "h"],
            Self::XyzD65 | Self::XyzD50 => ["x", "y", "z"],
            Self::Rgb
            | Self::Srgb
            | Self::SrgbLinear
            | Self::DisplayP3
            | Self::A98Rgb
            | Self::ProphotoRgb
            | Self::Rec2020 => ["r", "g", "b"],
        }
    }

    /// Analogous component category of each channel.
    pub const fn components(self) -> [Component; 3] {
        match self {
            Self::Hsl => [Component::Hue, Component::Colorfulness, Component::Lightness],
            Self::Hwb => [Component::Hue, Component::Unique, Component::Unique],
            Self::Lab | Self::Oklab => [
                Component::Lightness,
                Component::OpponentA,
                Component::OpponentB,
            ],
            Self::Lch | Self::Oklch => [
                Component::Lightness,
                Component::Colorfulness,
                Component::Hue,
            ],
            Self::Rgb
            | Self::Srgb
            | Self::SrgbLinear
            | Self::DisplayP3
            | Self::A98Rgb
            | Self::ProphotoRgb
            | Self::Rec2020
            | Self::XyzD65
            | Self::XyzD50 => [Component::Red, Component::Green, Component::Blue],
        }
    }

    /// The white point XYZ values of this space are relative to.
    pub const fn white_point(self) -> WhitePoint {
        match self {
            Self::Lab | Self::Lch | Self::ProphotoRgb | Self::XyzD50 => WhitePoint::D50,
            Self::Rgb
            | Self::Hsl
            | Self::Hwb
            | Self::Oklab
            | Self::Oklch
            | Self::Srgb
            | Self::SrgbLinear
            | Self::DisplayP3
            | Self::A98Rgb
            | Self::Rec2020
            | Self::XyzD65 => WhitePoint::D65,
        }
    }
}

impl Display for ColorSpace {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str(self.tag())
    }
}
