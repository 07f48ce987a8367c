//! Numeric color values.

use crate::space::ColorSpace;

/// One color component: a number or the `none` keyword.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Channel {
    Number(f64),
    /// A missing component (`none`).
    None,
}

impl Channel {
    /// The number, if present.
    #[inline]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(value),
            Self::None => None,
        }
    }

    /// The number, treating `none` as zero.
    #[inline]
    pub const fn or_zero(self) -> f64 {
        match self {
            Self::Number(value) => value,
            Self::None => 0.0,
        }
    }

    /// Whether this is `none`.
    #[inline]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Apply `transform` to a present number.
    #[inline]
    #[must_use]
    pub fn map(self, transform: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Number(value) => Self::Number(transform(value)),
            Self::None => Self::None,
        }
    }
}

impl From<f64> for Channel {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A color in a specific space: three channels plus alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorValue {
    /// The space the channels are expressed in.
    pub space: ColorSpace,
    /// The three color channels, in the space's canonical order and scale.
    pub channels: [Channel; 3],
    /// Opacity in `0..=1`.
    pub alpha: Channel,
}

impl ColorValue {
    /// A color with every component present.
    #[inline]
    pub const fn new(space: ColorSpace, channels: [f64; 3], alpha: f64) -> Self {
        Self {
            space,
            channels: [
                Channel::Number(channels[0]),
                Channel::Number(channels[1]),
                Channel::Number(channels[2]),
            ],
            alpha: Channel::Number(alpha),
        }
    }

    /// A color that may have missing components.
    #[inline]
    pub const fn with_channels(space: ColorSpace, channels: [Channel; 3], alpha: Channel) -> Self {
        Self {
            space,
            channels,
            alpha,
        }
    }

    /// `transparent`: black with zero alpha.
    #[inline]
    pub const fn transparent() -> Self {
        Self::new(ColorSpace::Rgb, [0.0, 0.0, 0.0], 0.0)
    }

    /// Channel numbers with `none` as zero.
    #[inline]
    pub fn numbers(&self) -> [f64; 3] {
        self.channels.map(Channel::or_zero)
    }

    /// `[c1, c2, c3, alpha]` with `none` as zero.
    #[inline]
    pub fn to_tuple(&self) -> [f64; 4] {
        let [first, second, third] = self.numbers();
        [first, second, third, self.alpha.or_zero()]
    }

    /// Whether any component is `none`.
    pub fn has_missing(&self) -> bool {
        self.alpha.is_none() || self.channels.iter().any(|channel| channel.is_none())
    }
}

/// What a value parser produced.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseOutcome {
    /// Canonical specified-value text.
    Specified(String),
    /// The resolved numeric color.
    Computed(ColorValue),
    /// The text is not a valid color.
    Invalid,
}
