//! The closed set of working colorspaces and the codec dispatch over them.

use std::fmt;

use super::lab::{lab_to_rgb, lch_to_rgb, rgb_to_lab, rgb_to_lch};
use super::luma::{
    from_crgb, from_crgb_around, from_luma_red_green, from_ybk, to_crgb, to_luma_red_green, to_ybk, BT601, BT709,
};

/// A pixel's three components under some [`ColorSpace`].
pub type Components = [f64; 3];

/// Working colorspace for the decorrelation stretch.
///
/// Parsing is total: [`ColorSpace::from_code`] maps any unrecognized code to
/// [`ColorSpace::Rgb`], so a bad selector silently degrades to identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum ColorSpace {
    /// Identity.
    #[default]
    Rgb,
    /// CIE L*a*b* (D65).
    Lab,
    /// Cylindrical L*a*b*: lightness, chroma, hue in degrees.
    Lch,
    /// BT.601 luma, red, green.
    Yre,
    /// BT.709 luma, red, green.
    Lre,
    /// BT.601 luma, blue, inverted green.
    Ybk,
    /// Contrast-boosted remap; the inverse is approximate.
    Crgb,
}

impl ColorSpace {
    /// Every supported colorspace, in menu order.
    pub const ALL: [ColorSpace; 7] = [
        ColorSpace::Rgb,
        ColorSpace::Lab,
        ColorSpace::Lch,
        ColorSpace::Yre,
        ColorSpace::Lre,
        ColorSpace::Ybk,
        ColorSpace::Crgb,
    ];

    /// Parse a colorspace code (case-insensitive). Unknown codes yield `Rgb`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "RGB" => ColorSpace::Rgb,
            "LAB" => ColorSpace::Lab,
            "LCH" => ColorSpace::Lch,
            "YRE" => ColorSpace::Yre,
            "LRE" => ColorSpace::Lre,
            "YBK" => ColorSpace::Ybk,
            "CRGB" => ColorSpace::Crgb,
            other => {
                tracing::debug!(code = other, "Unknown colorspace code, using RGB");
                ColorSpace::Rgb
            }
        }
    }

    /// Canonical upper-case code.
    pub fn code(self) -> &'static str {
        match self {
            ColorSpace::Rgb => "RGB",
            ColorSpace::Lab => "LAB",
            ColorSpace::Lch => "LCH",
            ColorSpace::Yre => "YRE",
            ColorSpace::Lre => "LRE",
            ColorSpace::Ybk => "YBK",
            ColorSpace::Crgb => "CRGB",
        }
    }

    /// Whether `from_components(to_components(p))` reproduces `p` up to rounding.
    pub fn is_exact(self) -> bool {
        !matches!(self, ColorSpace::Crgb)
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<&str> for ColorSpace {
    fn from(code: &str) -> Self {
        ColorSpace::from_code(code)
    }
}

impl From<String> for ColorSpace {
    fn from(code: String) -> Self {
        ColorSpace::from_code(&code)
    }
}

impl From<ColorSpace> for String {
    fn from(space: ColorSpace) -> Self {
        space.code().to_string()
    }
}

/// Forward transform of one pixel into `space`.
pub fn to_components(rgb: [u8; 3], space: ColorSpace) -> Components {
    match space {
        ColorSpace::Rgb => rgb.map(f64::from),
        ColorSpace::Lab => rgb_to_lab(rgb),
        ColorSpace::Lch => rgb_to_lch(rgb),
        ColorSpace::Yre => to_luma_red_green(BT601, rgb),
        ColorSpace::Lre => to_luma_red_green(BT709, rgb),
        ColorSpace::Ybk => to_ybk(rgb),
        ColorSpace::Crgb => to_crgb(rgb),
    }
}

/// Inverse transform of one pixel out of `space`, clamped to 8-bit RGB.
pub fn from_components(c: Components, space: ColorSpace) -> [u8; 3] {
    let rgb = match space {
        ColorSpace::Rgb => c,
        ColorSpace::Lab => lab_to_rgb(c),
        ColorSpace::Lch => lch_to_rgb(c),
        ColorSpace::Yre => from_luma_red_green(BT601, c),
        ColorSpace::Lre => from_luma_red_green(BT709, c),
        ColorSpace::Ybk => from_ybk(c),
        ColorSpace::Crgb => from_crgb(c),
    };
    rgb.map(to_channel)
}

/// Inverse transform that may use the pixel the components came from.
///
/// Identical to [`from_components`] except for CRGB, whose forward map drops
/// the pixel's brightness: here it is restored from `source` instead of
/// being rebuilt around mid-gray.
pub fn from_components_with_source(
    c: Components,
    space: ColorSpace,
    source: [u8; 3],
) -> [u8; 3] {
    match space {
        ColorSpace::Crgb => {
            let mean = source.iter().map(|&v| f64::from(v)).sum::<f64>() / 3.0;
            from_crgb_around(c, mean).map(to_channel)
        }
        _ => from_components(c, space),
    }
}

/// Write a floating-point channel value as a byte.
///
/// Clamps to 0..=255, rounds half to even, and maps NaN to 0 so that
/// numeric accidents in inverse formulas never escape as garbage.
#[inline]
pub fn to_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0).round_ties_even() as u8
}
