//! Luma-based component sets (YRE, LRE, YBK) and the CRGB contrast remap.
//!
//! Each luma set keeps two raw channels next to a weighted luma, so the
//! missing channel is recovered by rearranging the luma sum. The division
//! by a small weight can overshoot the 0..255 range; callers clamp at the
//! final channel write.

/// ITU-R BT.601 luma weights (R, G, B).
pub const BT601: [f64; 3] = [0.299, 0.587, 0.114];

/// ITU-R BT.709 luma weights (R, G, B).
pub const BT709: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Weighted luma of an RGB triple.
#[inline]
pub fn weighted_luma(weights: [f64; 3], r: f64, g: f64, b: f64) -> f64 {
    weights[0] * r + weights[1] * g + weights[2] * b
}

/// BT.601 luma of an 8-bit pixel, on the 0..255 scale.
#[inline]
pub fn luma(rgb: [u8; 3]) -> f64 {
    weighted_luma(BT601, rgb[0] as f64, rgb[1] as f64, rgb[2] as f64)
}

/// `[luma, R, G]`: used by YRE (BT.601) and LRE (BT.709).
#[inline]
pub(crate) fn to_luma_red_green(weights: [f64; 3], rgb: [u8; 3]) -> [f64; 3] {
    let [r, g, b] = rgb.map(f64::from);
    [weighted_luma(weights, r, g, b), r, g]
}

#[inline]
pub(crate) fn from_luma_red_green(weights: [f64; 3], c: [f64; 3]) -> [f64; 3] {
    let [y, r, g] = c;
    let b = (y - weights[0] * r - weights[1] * g) / weights[2];
    [r, g, b]
}

/// `[luma, B, 255 - G]`.
#[inline]
pub(crate) fn to_ybk(rgb: [u8; 3]) -> [f64; 3] {
    let [r, g, b] = rgb.map(f64::from);
    [weighted_luma(BT601, r, g, b), b, 255.0 - g]
}

#[inline]
pub(crate) fn from_ybk(c: [f64; 3]) -> [f64; 3] {
    let [y, b, k] = c;
    let g = 255.0 - k;
    let r = (y - BT601[1] * g - BT601[2] * b) / BT601[0];
    [r, g, b]
}

/// CRGB: `c_i = (2·ch_i - other_1 - other_2 + 510) / 2`.
#[inline]
pub(crate) fn to_crgb(rgb: [u8; 3]) -> [f64; 3] {
    let [r, g, b] = rgb.map(f64::from);
    [
        (2.0 * r - g - b + 510.0) / 2.0,
        (2.0 * g - r - b + 510.0) / 2.0,
        (2.0 * b - r - g + 510.0) / 2.0,
    ]
}

/// Approximate CRGB inverse.
///
/// The forward remap only keeps each channel's offset from the mean of the
/// other two, so the pixel's own mean is gone. It is rebuilt around mid-gray:
/// `ch = 127.5 + 2/3 · (c - 255)`.
#[inline]
pub(crate) fn from_crgb(c: [f64; 3]) -> [f64; 3] {
    from_crgb_around(c, 127.5)
}

/// CRGB inverse rebuilt around a known pixel mean.
///
/// `ch = mean + 2/3 · (c - 255)`. With the source pixel's own mean this is
/// the exact inverse of [`to_crgb`].
#[inline]
pub(crate) fn from_crgb_around(c: [f64; 3], mean: f64) -> [f64; 3] {
    c.map(|v| mean + (v - 255.0) * 2.0 / 3.0)
}
