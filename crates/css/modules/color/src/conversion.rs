//! Color conversion algorithms.
//!
//! Algorithms, matrices and constants are from the CSS Color 4 sample code:
//! <https://www.w3.org/TR/css-color-4/#color-conversion-code>
//!
//! Conversion follows the specified method:
//! - convert to linear light in the source space,
//! - convert to XYZ with the source white point,
//! - adapt the white point if the target uses the other one,
//! - convert from XYZ to linear light in the target space,
//! - apply the target transfer function.
//!
//! Spaces of the same family (the legacy sRGB syntaxes, Lab/LCh, OKLab/OKLCh) convert
//! directly so that achromatic colors keep an exact zero saturation or chroma.

use crate::matrix::{
    A98_TO_XYZ, D50_TO_D65, D65_TO_D50, LMS_TO_OKLAB, LMS_TO_XYZ, OKLAB_TO_LMS, P3_TO_XYZ,
    PROPHOTO_TO_XYZ, REC2020_TO_XYZ, SRGB_TO_XYZ, Vector3, XYZ_TO_A98, XYZ_TO_LMS, XYZ_TO_P3,
    XYZ_TO_PROPHOTO, XYZ_TO_REC2020, XYZ_TO_SRGB, transform,
};
use crate::space::{ColorSpace, Component, WhitePoint};
use crate::value::{Channel, ColorValue};
use css_values_units::{Precision, normalize_hue, round_with};

/// Lab ε.
const EPSILON: f64 = 216.0 / 24_389.0;
/// Lab κ.
const KAPPA: f64 = 24_389.0 / 27.0;
/// D50 reference white.
const D50_WHITE: Vector3 = [
    0.3457 / 0.3585,
    1.0,
    (1.0 - 0.3457 - 0.3585) / 0.3585,
];
/// LCh chroma below which hue is powerless.
const LCH_ACHROMATIC: f64 = 0.0015;
/// OKLCh chroma below which hue is powerless.
const OKLCH_ACHROMATIC: f64 = 0.000_004;
/// Channels of `rgb()` are on the 0..=255 scale.
const RGB_SCALE: f64 = 255.0;

/// Rec. 2020 transfer function α.
const REC2020_ALPHA: f64 = 1.099_296_826_809_44;
/// Rec. 2020 transfer function β.
const REC2020_BETA: f64 = 0.018_053_968_510_807;

fn signed(value: f64, magnitude: impl FnOnce(f64) -> f64) -> f64 {
    let result = magnitude(value.abs());
    if value < 0.0 { -result } else { result }
}

/// sRGB gamma-encoded → linear light (also used by Display P3).
pub fn srgb_to_linear(value: f64) -> f64 {
    signed(value, |abs| {
        if abs <= 0.040_45 {
            abs / 12.92
        } else {
            ((abs + 0.055) / 1.055).powf(2.4)
        }
    })
}

/// sRGB linear light → gamma-encoded (also used by Display P3).
pub fn linear_to_srgb(value: f64) -> f64 {
    signed(value, |abs| {
        if abs > 0.003_130_8 {
            1.055 * abs.powf(1.0 / 2.4) - 0.055
        } else {
            12.92 * abs
        }
    })
}

fn a98_to_linear(value: f64) -> f64 {
    signed(value, |abs| abs.powf(563.0 / 256.0))
}

fn linear_to_a98(value: f64) -> f64 {
    signed(value, |abs| abs.powf(256.0 / 563.0))
}

fn prophoto_to_linear(value: f64) -> f64 {
    signed(value, |abs| {
        if abs <= 16.0 / 512.0 {
            abs / 16.0
        } else {
            abs.powf(1.8)
        }
    })
}

fn linear_to_prophoto(value: f64) -> f64 {
    signed(value, |abs| {
        if abs >= 1.0 / 512.0 {
            abs.powf(1.0 / 1.8)
        } else {
            16.0 * abs
        }
    })
}

fn rec2020_to_linear(value: f64) -> f64 {
    signed(value, |abs| {
        if abs < REC2020_BETA * 4.5 {
            abs / 4.5
        } else {
            ((abs + REC2020_ALPHA - 1.0) / REC2020_ALPHA).powf(1.0 / 0.45)
        }
    })
}

fn linear_to_rec2020(value: f64) -> f64 {
    signed(value, |abs| {
        if abs > REC2020_BETA {
            REC2020_ALPHA * abs.powf(0.45) - (REC2020_ALPHA - 1.0)
        } else {
            4.5 * abs
        }
    })
}

/// HSL (degrees, percentages) → gamma-encoded sRGB fractions.
///
/// Spec: <https://www.w3.org/TR/css-color-4/#hsl-to-rgb>
pub fn hsl_to_srgb([hue, saturation, lightness]: Vector3) -> Vector3 {
    let sat = saturation / 100.0;
    let light = lightness / 100.0;
    let hue_degrees = normalize_hue(hue);
    let channel = |offset: f64| {
        let step = (offset + hue_degrees / 30.0) % 12.0;
        let chroma = sat * light.min(1.0 - light);
        light - chroma * (step - 3.0).min(9.0 - step).clamp(-1.0, 1.0)
    };
    [channel(0.0), channel(8.0), channel(4.0)]
}

/// HWB (degrees, percentages) → gamma-encoded sRGB fractions.
///
/// Spec: <https://www.w3.org/TR/css-color-4/#hwb-to-rgb>
pub fn hwb_to_srgb([hue, whiteness, blackness]: Vector3) -> Vector3 {
    let white = whiteness / 100.0;
    let black = blackness / 100.0;
    if white + black >= 1.0 {
        let gray = white / (white + black);
        return [gray, gray, gray];
    }
    hsl_to_srgb([hue, 100.0, 50.0]).map(|channel| channel * (1.0 - white - black) + white)
}

/// Hue in degrees of a gamma-encoded sRGB color, zero when achromatic.
fn srgb_hue([red, green, blue]: Vector3, max: f64, delta: f64) -> f64 {
    if delta.abs() < f64::EPSILON {
        return 0.0;
    }
    let sector = if (max - red).abs() < f64::EPSILON {
        (green - blue) / delta + if green < blue { 6.0 } else { 0.0 }
    } else if (max - green).abs() < f64::EPSILON {
        (blue - red) / delta + 2.0
    } else {
        (red - green) / delta + 4.0
    };
    normalize_hue(sector * 60.0)
}

/// Gamma-encoded sRGB fractions → HSL (degrees, percentages).
///
/// Spec: <https://www.w3.org/TR/css-color-4/#rgb-to-hsl>
pub fn srgb_to_hsl(rgb: Vector3) -> Vector3 {
    let [red, green, blue] = rgb;
    let max = red.max(green).max(blue);
    let min = red.min(green).min(blue);
    let delta = max - min;
    let lightness = (max + min) / 2.0;
    let mut hue = srgb_hue(rgb, max, delta);
    let mut saturation = if delta.abs() < f64::EPSILON
        || lightness.abs() < f64::EPSILON
        || (lightness - 1.0).abs() < f64::EPSILON
    {
        0.0
    } else {
        (max - lightness) / lightness.min(1.0 - lightness)
    };
    if saturation < 0.0 {
        hue = normalize_hue(hue + 180.0);
        saturation = saturation.abs();
    }
    [hue, saturation * 100.0, lightness * 100.0]
}

/// Gamma-encoded sRGB fractions → HWB (degrees, percentages).
pub fn srgb_to_hwb(rgb: Vector3) -> Vector3 {
    let [red, green, blue] = rgb;
    let max = red.max(green).max(blue);
    let min = red.min(green).min(blue);
    let hue = srgb_hue(rgb, max, max - min);
    [hue, min * 100.0, (1.0 - max) * 100.0]
}

/// CIE Lab → XYZ (D50).
pub fn lab_to_xyz([lightness, opponent_a, opponent_b]: Vector3) -> Vector3 {
    let f1 = (lightness + 16.0) / 116.0;
    let f0 = opponent_a / 500.0 + f1;
    let f2 = f1 - opponent_b / 200.0;
    let cube = |value: f64| {
        let cubed = value.powi(3);
        if cubed > EPSILON {
            cubed
        } else {
            (116.0 * value - 16.0) / KAPPA
        }
    };
    let y_ratio = if lightness > KAPPA * EPSILON {
        f1.powi(3)
    } else {
        lightness / KAPPA
    };
    [
        cube(f0) * D50_WHITE[0],
        y_ratio * D50_WHITE[1],
        cube(f2) * D50_WHITE[2],
    ]
}

/// XYZ (D50) → CIE Lab.
pub fn xyz_to_lab(xyz: Vector3) -> Vector3 {
    let compute = |value: f64| {
        if value > EPSILON {
            value.cbrt()
        } else {
            (KAPPA * value + 16.0) / 116.0
        }
    };
    let f0 = compute(xyz[0] / D50_WHITE[0]);
    let f1 = compute(xyz[1] / D50_WHITE[1]);
    let f2 = compute(xyz[2] / D50_WHITE[2]);
    [116.0 * f1 - 16.0, 500.0 * (f0 - f1), 200.0 * (f1 - f2)]
}

/// OKLab → XYZ (D65).
pub fn oklab_to_xyz(oklab: Vector3) -> Vector3 {
    let lms = transform(&OKLAB_TO_LMS, oklab).map(|value| value.powi(3));
    transform(&LMS_TO_XYZ, lms)
}

/// XYZ (D65) → OKLab.
pub fn xyz_to_oklab(xyz: Vector3) -> Vector3 {
    let lms = transform(&XYZ_TO_LMS, xyz).map(f64::cbrt);
    transform(&LMS_TO_OKLAB, lms)
}

/// Rectangular → polar (`[L, C, h]`), with a zero hue below `achromatic` chroma.
fn to_polar([lightness, opponent_a, opponent_b]: Vector3, achromatic: f64) -> Vector3 {
    let chroma = opponent_a.hypot(opponent_b);
    let hue = if chroma < achromatic {
        0.0
    } else {
        normalize_hue(opponent_b.atan2(opponent_a).to_degrees())
    };
    [lightness, chroma, hue]
}

/// Polar (`[L, C, h]`) → rectangular.
fn from_polar([lightness, chroma, hue]: Vector3) -> Vector3 {
    let radians = hue.to_radians();
    [lightness, chroma * radians.cos(), chroma * radians.sin()]
}

fn adapt(xyz: Vector3, from: WhitePoint, to: WhitePoint) -> Vector3 {
    match (from, to) {
        (WhitePoint::D65, WhitePoint::D50) => transform(&D65_TO_D50, xyz),
        (WhitePoint::D50, WhitePoint::D65) => transform(&D50_TO_D65, xyz),
        (WhitePoint::D50, WhitePoint::D50) | (WhitePoint::D65, WhitePoint::D65) => xyz,
    }
}

/// Gamma-encoded sRGB fractions of a color in one of the sRGB-family spaces.
fn legacy_to_srgb(space: ColorSpace, numbers: Vector3) -> Option<Vector3> {
    match space {
        ColorSpace::Rgb => Some(numbers.map(|channel| channel / RGB_SCALE)),
        ColorSpace::Hsl => Some(hsl_to_srgb(numbers)),
        ColorSpace::Hwb => Some(hwb_to_srgb(numbers)),
        ColorSpace::Srgb => Some(numbers),
        ColorSpace::Lab
        | ColorSpace::Lch
        | ColorSpace::Oklab
        | ColorSpace::Oklch
        | ColorSpace::SrgbLinear
        | ColorSpace::DisplayP3
        | ColorSpace::A98Rgb
        | ColorSpace::ProphotoRgb
        | ColorSpace::Rec2020
        | ColorSpace::XyzD65
        | ColorSpace::XyzD50 => None,
    }
}

/// Express gamma-encoded sRGB fractions in one of the sRGB-family spaces.
fn srgb_to_legacy(space: ColorSpace, srgb: Vector3) -> Option<Vector3> {
    match space {
        ColorSpace::Rgb => Some(srgb.map(|channel| channel * RGB_SCALE)),
        ColorSpace::Hsl => Some(srgb_to_hsl(srgb)),
        ColorSpace::Hwb => Some(srgb_to_hwb(srgb)),
        ColorSpace::Srgb => Some(srgb),
        ColorSpace::Lab
        | ColorSpace::Lch
        | ColorSpace::Oklab
        | ColorSpace::Oklch
        | ColorSpace::SrgbLinear
        | ColorSpace::DisplayP3
        | ColorSpace::A98Rgb
        | ColorSpace::ProphotoRgb
        | ColorSpace::Rec2020
        | ColorSpace::XyzD65
        | ColorSpace::XyzD50 => None,
    }
}

/// Convert components of `space` to XYZ relative to the space's own white point.
pub fn to_xyz(space: ColorSpace, numbers: Vector3) -> (Vector3, WhitePoint) {
    let xyz = match space {
        ColorSpace::Rgb | ColorSpace::Hsl | ColorSpace::Hwb | ColorSpace::Srgb => {
            let srgb = legacy_to_srgb(space, numbers).unwrap_or(numbers);
            transform(&SRGB_TO_XYZ, srgb.map(srgb_to_linear))
        }
        ColorSpace::SrgbLinear => transform(&SRGB_TO_XYZ, numbers),
        ColorSpace::DisplayP3 => transform(&P3_TO_XYZ, numbers.map(srgb_to_linear)),
        ColorSpace::A98Rgb => transform(&A98_TO_XYZ, numbers.map(a98_to_linear)),
        ColorSpace::ProphotoRgb => transform(&PROPHOTO_TO_XYZ, numbers.map(prophoto_to_linear)),
        ColorSpace::Rec2020 => transform(&REC2020_TO_XYZ, numbers.map(rec2020_to_linear)),
        ColorSpace::XyzD65 | ColorSpace::XyzD50 => numbers,
        ColorSpace::Lab => lab_to_xyz(numbers),
        ColorSpace::Lch => lab_to_xyz(from_polar(numbers)),
        ColorSpace::Oklab => oklab_to_xyz(numbers),
        ColorSpace::Oklch => oklab_to_xyz(from_polar(numbers)),
    };
    (xyz, space.white_point())
}

/// Zero the opponent or chroma/hue channels when lightness rounds to either end.
fn settle_lightness(mut components: Vector3, max_lightness: f64) -> Vector3 {
    let rounded = round_with(components[0], Precision::Conversion);
    if rounded <= 0.0 || rounded >= max_lightness {
        components[1] = 0.0;
        components[2] = 0.0;
    }
    components
}

/// Convert XYZ relative to `white` into components of `space`.
pub fn from_xyz(space: ColorSpace, xyz: Vector3, white: WhitePoint) -> Vector3 {
    let adapted = adapt(xyz, white, space.white_point());
    match space {
        ColorSpace::Rgb | ColorSpace::Hsl | ColorSpace::Hwb | ColorSpace::Srgb => {
            let srgb = transform(&XYZ_TO_SRGB, adapted).map(linear_to_srgb);
            srgb_to_legacy(space, srgb).unwrap_or(srgb)
        }
        ColorSpace::SrgbLinear => transform(&XYZ_TO_SRGB, adapted),
        ColorSpace::DisplayP3 => transform(&XYZ_TO_P3, adapted).map(linear_to_srgb),
        ColorSpace::A98Rgb => transform(&XYZ_TO_A98, adapted).map(linear_to_a98),
        ColorSpace::ProphotoRgb => transform(&XYZ_TO_PROPHOTO, adapted).map(linear_to_prophoto),
        ColorSpace::Rec2020 => transform(&XYZ_TO_REC2020, adapted).map(linear_to_rec2020),
        ColorSpace::XyzD65 | ColorSpace::XyzD50 => adapted,
        ColorSpace::Lab => settle_lightness(xyz_to_lab(adapted), 100.0),
        ColorSpace::Lch => settle_lightness(to_polar(xyz_to_lab(adapted), LCH_ACHROMATIC), 100.0),
        ColorSpace::Oklab => settle_lightness(xyz_to_oklab(adapted), 1.0),
        ColorSpace::Oklch => {
            settle_lightness(to_polar(xyz_to_oklab(adapted), OKLCH_ACHROMATIC), 1.0)
        }
    }
}

/// Convert bare components between spaces.
pub fn convert_numbers(from: ColorSpace, numbers: Vector3, to: ColorSpace) -> Vector3 {
    if from == to {
        return numbers;
    }
    if let Some(srgb) = legacy_to_srgb(from, numbers)
        && let Some(converted) = srgb_to_legacy(to, srgb)
    {
        return converted;
    }
    match (from, to) {
        (ColorSpace::Lab, ColorSpace::Lch) => return to_polar(numbers, LCH_ACHROMATIC),
        (ColorSpace::Lch, ColorSpace::Lab) => return from_polar(numbers),
        (ColorSpace::Oklab, ColorSpace::Oklch) => return to_polar(numbers, OKLCH_ACHROMATIC),
        (ColorSpace::Oklch, ColorSpace::Oklab) => return from_polar(numbers),
        _ => {}
    }
    let (xyz, white) = to_xyz(from, numbers);
    from_xyz(to, xyz, white)
}

/// Convert a color to `target`, carrying missing components forward into analogous
/// target channels.
///
/// Spec: <https://www.w3.org/TR/css-color-4/#interpolation-missing>
pub fn convert(color: &ColorValue, target: ColorSpace) -> ColorValue {
    if color.space == target {
        return *color;
    }
    let numbers = convert_numbers(color.space, color.numbers(), target);
    let mut channels = numbers.map(Channel::Number);
    let source = color.space.components();
    let destination = target.components();
    for (channel, component) in color.channels.iter().zip(source) {
        if !channel.is_none() || component == Component::Unique {
            continue;
        }
        if let Some(index) = destination.iter().position(|candidate| *candidate == component)
            && let Some(slot) = channels.get_mut(index)
        {
            *slot = Channel::None;
        }
    }
    ColorValue::with_channels(target, channels, color.alpha)
}

/// Gamma-encoded sRGB fractions clipped to the displayable gamut.
pub fn to_srgb_clipped(color: &ColorValue) -> Vector3 {
    convert_numbers(color.space, color.numbers(), ColorSpace::Srgb).map(|channel| {
        if channel.is_nan() { 0.0 } else { channel.clamp(0.0, 1.0) }
    })
}
