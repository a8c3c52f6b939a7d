//! Tonal adjustment stage
//!
//! Black point, exposure, brightness, shadow lift, contrast, saturation,
//! clamp, sharpen. The order matters: contrast runs after the shadow lift
//! so it does not undo it, and saturation reads the post-contrast gray.

mod sharpen;

pub(crate) use sharpen::sharpen_masked;
pub use sharpen::{sharpen, sharpen_where, SHARPEN_KERNEL};

use crate::buffer::PixelBuffer;
use crate::color::{to_channel, weighted_luma, BT601};
use crate::params::{ranges, ParameterSet, Range};

/// Luma below which the shadow lift applies.
const SHADOW_PIVOT: f64 = 128.0;

/// Contrast pivot on the 0..255 scale.
const CONTRAST_PIVOT: f64 = 127.5;

/// The per-pixel part of the tonal stage, with knobs already resolved.
#[derive(Debug, Clone, Copy)]
struct ToneCurve {
    black_offset: Option<f64>,
    exposure_gain: Option<f64>,
    brightness_offset: Option<f64>,
    shadow_boost: Option<f64>,
    contrast_factor: Option<f64>,
    saturation_factor: Option<f64>,
}

impl ToneCurve {
    fn from_params(params: &ParameterSet) -> Self {
        // Neutral knobs resolve to None and their step is skipped.
        let active = |range: Range, value: f64| {
            let value = range.clamp(value);
            (!range.is_default(value)).then_some(value)
        };
        Self {
            black_offset: active(ranges::BLACK_POINT, params.black_point).map(|v| v * 2.55),
            exposure_gain: active(ranges::EXPOSURE, params.exposure).map(|v| (v / 100.0).exp2()),
            brightness_offset: active(ranges::BRIGHTNESS, params.brightness)
                .map(|v| v / 100.0 * 255.0),
            shadow_boost: active(ranges::SHADOWS, params.shadows).map(|v| v / 100.0),
            contrast_factor: active(ranges::CONTRAST, params.contrast)
                .map(|v| (v + 100.0) / 100.0),
            saturation_factor: active(ranges::SATURATION, params.saturation)
                .map(|v| 1.0 + v / 100.0),
        }
    }

    fn is_identity(&self) -> bool {
        self.black_offset.is_none()
            && self.exposure_gain.is_none()
            && self.brightness_offset.is_none()
            && self.shadow_boost.is_none()
            && self.contrast_factor.is_none()
            && self.saturation_factor.is_none()
    }

    fn apply(&self, rgb: [u8; 3]) -> [u8; 3] {
        let mut c = rgb.map(f64::from);

        if let Some(offset) = self.black_offset {
            c = c.map(|v| (v - offset).max(0.0));
        }
        if let Some(gain) = self.exposure_gain {
            c = c.map(|v| v * gain);
        }
        if let Some(offset) = self.brightness_offset {
            c = c.map(|v| v + offset);
        }
        if let Some(boost) = self.shadow_boost {
            let luma = weighted_luma(BT601, c[0], c[1], c[2]);
            if luma < SHADOW_PIVOT {
                let lift = boost * (1.0 - luma / SHADOW_PIVOT);
                c = c.map(|v| v + v * lift);
            }
        }
        if let Some(factor) = self.contrast_factor {
            c = c.map(|v| (v - CONTRAST_PIVOT) * factor + CONTRAST_PIVOT);
        }
        if let Some(factor) = self.saturation_factor {
            let gray = weighted_luma(BT601, c[0], c[1], c[2]);
            c = c.map(|v| gray + (v - gray) * factor);
        }
        c.map(to_channel)
    }
}

/// Run the tonal stage over every pixel.
///
/// Every knob is clamped into its range first. With all knobs neutral
/// this returns the input unchanged. Alpha is never touched.
///
/// # Example
///
/// ```
/// use dstretch_core::{apply_tonal_adjustments, ParameterSet, PixelBuffer};
///
/// let gray = PixelBuffer::from_pixel(2, 2, [128, 128, 128, 255]);
/// let params = ParameterSet::new().contrast(100.0);
/// assert_eq!(apply_tonal_adjustments(&gray, &params), gray);
/// ```
pub fn apply_tonal_adjustments(buffer: &PixelBuffer, params: &ParameterSet) -> PixelBuffer {
    let curve = ToneCurve::from_params(params);
    let sharpness = ranges::SHARPNESS.clamp(params.sharpness);

    let toned = if curve.is_identity() {
        buffer.clone()
    } else {
        let mut out = buffer.as_bytes().to_vec();
        for pixel in out.chunks_exact_mut(PixelBuffer::CHANNELS) {
            let [r, g, b] = curve.apply([pixel[0], pixel[1], pixel[2]]);
            pixel[0] = r;
            pixel[1] = g;
            pixel[2] = b;
        }
        PixelBuffer::from_raw(buffer.dimensions(), out)
    };

    if sharpness > 0.0 {
        sharpen(&toned, sharpness / 100.0)
    } else {
        toned
    }
}
