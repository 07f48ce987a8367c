//! Numeric conversion of any `<color>` into a fixed space.
//!
//! Tuples are `[c1, c2, c3, alpha]` in the target space's canonical scale: `rgb` channels
//! are clipped to the sRGB gamut and rounded to integers, every other space keeps five
//! significant digits. Invalid input yields `[0, 0, 0, 0]`, or [`ColorResult::Invalid`]
//! when `nullable` is set.

use crate::engine::{ColorEngine, ColorResult, logged, prepare};
use crate::global_engine;
use crate::options::ResolveOptions;
use crate::cache::CachedValue;
use css_color::{ColorSpace, ColorValue, convert as convert_color, parse_color, to_hex, to_srgb_clipped};
use css_values_units::{Precision, normalize_alpha, round_with};

/// Express `color` in `space` as a rounded tuple.
fn tuple(color: &ColorValue, space: ColorSpace) -> [f64; 4] {
    let alpha = normalize_alpha(color.alpha.or_zero());
    let [first, second, third] = if space == ColorSpace::Rgb {
        to_srgb_clipped(color).map(|channel| (channel * 255.0).round() + 0.0)
    } else {
        convert_color(color, space)
            .numbers()
            .map(|channel| round_with(channel, Precision::Conversion) + 0.0)
    };
    [first, second, third, alpha]
}

impl ColorEngine {
    fn channels(
        &self,
        namespace: &str,
        value: &str,
        options: &ResolveOptions,
        space: ColorSpace,
    ) -> ColorResult<[f64; 4]> {
        let cached = self.memoize(namespace, value, options, || {
            let prepared = prepare(value, options)?;
            logged(value, parse_color(&prepared, &options.parse_context()))
                .map(|color| CachedValue::Channels(tuple(&color, space)))
        });
        match cached.as_ref().and_then(CachedValue::as_channels) {
            Some(channels) => ColorResult::Value(channels),
            None if options.nullable => ColorResult::Invalid,
            None => ColorResult::Value([0.0; 4]),
        }
    }

    /// `[r, g, b, alpha]` with integer channels in `0..=255`.
    pub fn color_to_rgb(&self, value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
        self.channels("colorToRgb", value, options, ColorSpace::Rgb)
    }

    /// `[h, s, l, alpha]`, saturation and lightness in `0..=100`.
    pub fn color_to_hsl(&self, value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
        self.channels("colorToHsl", value, options, ColorSpace::Hsl)
    }

    /// `[h, w, b, alpha]`, whiteness and blackness in `0..=100`.
    pub fn color_to_hwb(&self, value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
        self.channels("colorToHwb", value, options, ColorSpace::Hwb)
    }

    /// `[l, a, b, alpha]` in CIE Lab, lightness in `0..=100`.
    pub fn color_to_lab(&self, value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
        self.channels("colorToLab", value, options, ColorSpace::Lab)
    }

    /// `[l, c, h, alpha]` in CIE LCh, lightness in `0..=100`.
    pub fn color_to_lch(&self, value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
        self.channels("colorToLch", value, options, ColorSpace::Lch)
    }

    /// `[l, a, b, alpha]` in Oklab, lightness in `0..=1`.
    pub fn color_to_oklab(&self, value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
        self.channels("colorToOklab", value, options, ColorSpace::Oklab)
    }

    /// `[l, c, h, alpha]` in Oklch, lightness in `0..=1`.
    pub fn color_to_oklch(&self, value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
        self.channels("colorToOklch", value, options, ColorSpace::Oklch)
    }

    /// `[x, y, z, alpha]` relative to D65, or D50 with `options.d50`.
    pub fn color_to_xyz(&self, value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
        let space = if options.d50 {
            ColorSpace::XyzD50
        } else {
            ColorSpace::XyzD65
        };
        self.channels("colorToXyz", value, options, space)
    }

    /// `#rrggbb`, or `#rrggbbaa` with `options.alpha`. Invalid input is always
    /// [`ColorResult::Invalid`].
    pub fn color_to_hex(&self, value: &str, options: &ResolveOptions) -> ColorResult<String> {
        self.memoize("colorToHex", value, options, || {
            let prepared = prepare(value, options)?;
            logged(value, parse_color(&prepared, &options.parse_context()))
                .map(|color| CachedValue::Text(to_hex(&color, options.alpha)))
        })
        .and_then(CachedValue::into_text)
        .into()
    }
}

/// [`ColorEngine::color_to_rgb`] on the process-wide engine.
pub fn color_to_rgb(value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
    global_engine().color_to_rgb(value, options)
}

/// [`ColorEngine::color_to_hsl`] on the process-wide engine.
pub fn color_to_hsl(value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
    global_engine().color_to_hsl(value, options)
}

/// [`ColorEngine::color_to_hwb`] on the process-wide engine.
pub fn color_to_hwb(value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
    global_engine().color_to_hwb(value, options)
}

/// [`ColorEngine::color_to_lab`] on the process-wide engine.
pub fn color_to_lab(value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
    global_engine().color_to_lab(value, options)
}

/// [`ColorEngine::color_to_lch`] on the process-wide engine.
pub fn color_to_lch(value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
    global_engine().color_to_lch(value, options)
}

/// [`ColorEngine::color_to_oklab`] on the process-wide engine.
pub fn color_to_oklab(value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
    global_engine().color_to_oklab(value, options)
}

/// [`ColorEngine::color_to_oklch`] on the process-wide engine.
pub fn color_to_oklch(value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
    global_engine().color_to_oklch(value, options)
}

/// [`ColorEngine::color_to_xyz`] on the process-wide engine.
pub fn color_to_xyz(value: &str, options: &ResolveOptions) -> ColorResult<[f64; 4]> {
    global_engine().color_to_xyz(value, options)
}

/// [`ColorEngine::color_to_hex`] on the process-wide engine.
pub fn color_to_hex(value: &str, options: &ResolveOptions) -> ColorResult<String> {
    global_engine().color_to_hex(value, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_tuple_is_clipped_and_rounded() {
        let color = ColorValue::new(ColorSpace::Srgb, [1.2, 0.5, -0.1], 0.25);
        assert_eq!(tuple(&color, ColorSpace::Rgb), [255.0, 128.0, 0.0, 0.25]);
    }

    #[test]
    fn lab_tuple_keeps_five_digits() {
        let white = ColorValue::new(ColorSpace::Rgb, [255.0, 255.0, 255.0], 1.0);
        let [lightness, opponent_a, opponent_b, alpha] = tuple(&white, ColorSpace::Lab);
        assert!((lightness - 100.0).abs() < 1e-9);
        assert!(opponent_a.abs() < 1e-9);
        assert!(opponent_b.abs() < 1e-9);
        assert!((alpha - 1.0).abs() < 1e-9);
    }
}
