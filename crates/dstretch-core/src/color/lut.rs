//! Gamma lookup table access
//!
//! The table is generated at compile time by build.rs with one exact entry
//! per 8-bit code value.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Decode an 8-bit sRGB code value to linear light (0.0..=1.0).
#[inline]
pub fn srgb_to_linear(code: u8) -> f64 {
    SRGB_TO_LINEAR[code as usize]
}

/// Encode a linear light value back to the sRGB transfer curve.
///
/// The result is on the 0.0..=1.0 scale but is not clamped: out-of-gamut
/// values from an inverse colorspace transform pass through and are clamped
/// at the final channel write.
#[inline]
pub fn linear_to_srgb(linear: f64) -> f64 {
    if linear > 0.0031308 {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * linear
    }
}
