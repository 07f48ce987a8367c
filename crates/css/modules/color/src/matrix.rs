//! 3×3 matrices used by the linear steps of color conversion.
//!
//! Matrices and constants are from the CSS Color 4 sample code:
//! <https://www.w3.org/TR/css-color-4/#color-conversion-code>

/// A row-major 3×3 matrix.
pub type Matrix3 = [[f64; 3]; 3];
/// A column vector.
pub type Vector3 = [f64; 3];

/// `matrix × vector`.
#[inline]
pub const fn transform(matrix: &Matrix3, vector: Vector3) -> Vector3 {
    let mut out = [0.0; 3];
    let mut row = 0;
    while row < 3 {
        out[row] = matrix[row][0] * vector[0]
            + matrix[row][1] * vector[1]
            + matrix[row][2] * vector[2];
        row += 1;
    }
    out
}

/// Inverse of a non-singular matrix, evaluated at compile time for the
/// predefined RGB spaces whose sample code only lists the forward direction.
pub const fn invert(matrix: &Matrix3) -> Matrix3 {
    let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = *matrix;
    let cofactor00 = m11 * m22 - m12 * m21;
    let cofactor01 = m12 * m20 - m10 * m22;
    let cofactor02 = m10 * m21 - m11 * m20;
    let determinant = m00 * cofactor00 + m01 * cofactor01 + m02 * cofactor02;
    let inverse = 1.0 / determinant;
    [
        [
            cofactor00 * inverse,
            (m02 * m21 - m01 * m22) * inverse,
            (m01 * m12 - m02 * m11) * inverse,
        ],
        [
            cofactor01 * inverse,
            (m00 * m22 - m02 * m20) * inverse,
            (m02 * m10 - m00 * m12) * inverse,
        ],
        [
            cofactor02 * inverse,
            (m01 * m20 - m00 * m21) * inverse,
            (m00 * m11 - m01 * m10) * inverse,
        ],
    ]
}

/// Linear sRGB → XYZ (D65).
#[rustfmt::skip]
pub const SRGB_TO_XYZ: Matrix3 = [
    [506_752.0 / 1_228_815.0,  87_881.0 / 245_763.0,   12_673.0 / 70_218.0],
    [ 87_098.0 / 409_605.0,   175_762.0 / 245_763.0,   12_673.0 / 175_545.0],
    [  7_918.0 / 409_605.0,    87_881.0 / 737_289.0, 1_001_167.0 / 1_053_270.0],
];

/// XYZ (D65) → linear sRGB.
#[rustfmt::skip]
pub const XYZ_TO_SRGB: Matrix3 = [
    [  12_831.0 / 3_959.0,        -329.0 / 214.0,     -1_974.0 / 3_959.0],
    [-851_781.0 / 878_810.0, 1_648_619.0 / 878_810.0, 36_519.0 / 878_810.0],
    [     705.0 / 12_673.0,     -2_585.0 / 12_673.0,     705.0 / 667.0],
];

/// Bradford chromatic adaptation D65 → D50.
#[rustfmt::skip]
pub const D65_TO_D50: Matrix3 = [
    [ 1.047_929_792_544_996_9,   0.022_946_870_601_609_652, -0.050_192_266_289_205_24],
    [ 0.029_627_808_770_055_99,  0.990_434_426_753_879_9,   -0.017_073_799_063_418_826],
    [-0.009_243_040_646_204_504, 0.015_055_191_490_298_152,  0.751_874_281_428_137_1],
];

/// Bradford chromatic adaptation D50 → D65.
#[rustfmt::skip]
pub const D50_TO_D65: Matrix3 = [
    [ 0.955_473_421_488_075,    -0.023_098_454_948_764_71,  0.063_259_243_200_570_72],
    [-0.028_369_709_333_863_7,   1.009_995_398_081_304_1,   0.021_041_441_191_917_323],
    [ 0.012_314_014_864_481_998, -0.020_507_649_298_898_964, 1.330_365_926_242_124],
];

/// XYZ (D65) → OKLab LMS.
#[rustfmt::skip]
pub const XYZ_TO_LMS: Matrix3 = [
    [0.819_022_437_996_703,    0.361_906_260_052_890_4, -0.128_873_781_520_987_9],
    [0.032_983_653_932_388_5,  0.929_286_861_586_343_4,  0.036_144_666_350_642_4],
    [0.048_177_189_359_624_2,  0.264_239_531_752_730_8,  0.633_547_828_469_430_9],
];

/// OKLab LMS → XYZ (D65).
#[rustfmt::skip]
pub const LMS_TO_XYZ: Matrix3 = [
    [ 1.226_879_875_845_924_3, -0.557_814_994_460_217_1,  0.281_391_045_665_964_7],
    [-0.040_575_745_214_800_8,  1.112_286_803_280_317,   -0.071_711_058_065_516_4],
    [-0.076_372_936_674_660_1, -0.421_493_332_402_243_2,  1.586_924_019_836_781_6],
];

/// OKLab → non-linear LMS.
#[rustfmt::skip]
pub const OKLAB_TO_LMS: Matrix3 = [
    [1.0,  0.396_337_777_376_174_9,  0.215_803_757_309_913_6],
    [1.0, -0.105_561_345_815_658_6, -0.063_854_172_825_813_3],
    [1.0, -0.089_484_177_529_811_9, -1.291_485_548_019_409_2],
];

/// Non-linear LMS → OKLab.
#[rustfmt::skip]
pub const LMS_TO_OKLAB: Matrix3 = [
    [0.210_454_268_309_314,   0.793_617_774_702_305_4, -0.004_072_043_011_619_3],
    [1.977_998_532_431_168_4, -2.428_592_242_048_579_9, 0.450_593_709_617_411],
    [0.025_904_042_465_547_8,  0.782_771_712_457_529_6, -0.808_675_754_923_077_4],
];

/// Linear Display P3 → XYZ (D65).
#[rustfmt::skip]
pub const P3_TO_XYZ: Matrix3 = [
    [608_311.0 / 1_250_200.0, 189_793.0 / 714_400.0,   198_249.0 / 1_000_160.0],
    [ 35_783.0 / 156_275.0,   247_089.0 / 357_200.0,   198_249.0 / 2_500_400.0],
    [0.0,                      32_229.0 / 714_400.0, 5_220_557.0 / 5_000_800.0],
];

/// XYZ (D65) → linear Display P3.
pub const XYZ_TO_P3: Matrix3 = invert(&P3_TO_XYZ);

/// Linear Rec. 2020 → XYZ (D65).
#[rustfmt::skip]
pub const REC2020_TO_XYZ: Matrix3 = [
    [63_426_534.0 / 99_577_255.0,  20_160_776.0 / 139_408_157.0,  47_086_771.0 / 278_816_314.0],
    [26_158_966.0 / 99_577_255.0, 472_592_308.0 / 697_040_785.0,   8_267_143.0 / 139_408_157.0],
    [0.0,                          19_567_812.0 / 697_040_785.0, 295_819_943.0 / 278_816_314.0],
];

/// XYZ (D65) → linear Rec. 2020.
pub const XYZ_TO_REC2020: Matrix3 = invert(&REC2020_TO_XYZ);

/// Linear A98 RGB → XYZ (D65).
#[rustfmt::skip]
pub const A98_TO_XYZ: Matrix3 = [
    [573_536.0 / 994_567.0,   263_643.0 / 1_420_810.0, 187_206.0 / 994_567.0],
    [591_459.0 / 1_989_134.0, 6_239_551.0 / 9_945_670.0, 374_412.0 / 4_972_835.0],
    [ 53_769.0 / 1_989_134.0,   351_524.0 / 4_972_835.0, 4_929_758.0 / 4_972_835.0],
];

/// XYZ (D65) → linear A98 RGB.
pub const XYZ_TO_A98: Matrix3 = invert(&A98_TO_XYZ);

/// Linear ProPhoto RGB → XYZ (D50).
#[rustfmt::skip]
pub const PROPHOTO_TO_XYZ: Matrix3 = [
    [0.797_766_644_900_642_3, 0.135_181_297_400_533_08, 0.031_347_734_128_392_2],
    [0.288_074_828_819_401_3, 0.711_835_234_241_873,    0.000_089_936_938_725_64],
    [0.0,                     0.0,                      0.825_104_602_510_460_2],
];

/// XYZ (D50) → linear ProPhoto RGB.
pub const XYZ_TO_PROPHOTO: Matrix3 = invert(&PROPHOTO_TO_XYZ);
