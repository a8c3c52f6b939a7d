//! 3×3 sharpening kernel with edge-replicated borders.

use crate::api::EnhanceError;
use crate::buffer::{EdgeMap, PixelBuffer};
use crate::color::to_channel;

/// Laplacian sharpening kernel, row-major.
pub const SHARPEN_KERNEL: [f64; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// Sharpen every pixel, blending `original·(1-amount) + convolved·amount`.
///
/// `amount` is a fraction, clamped to `[0, 1]`. Alpha is copied through.
pub fn sharpen(buffer: &PixelBuffer, amount: f64) -> PixelBuffer {
    convolve_blend(buffer, amount, None)
}

/// Like [`sharpen`], but only at pixels where `mask` is on.
pub fn sharpen_where(
    buffer: &PixelBuffer,
    amount: f64,
    mask: &EdgeMap,
) -> Result<PixelBuffer, EnhanceError> {
    buffer.dimensions().ensure_matches(mask.dimensions())?;
    Ok(sharpen_masked(buffer, amount, mask))
}

/// [`sharpen_where`] for a mask derived from `buffer` itself.
pub(crate) fn sharpen_masked(buffer: &PixelBuffer, amount: f64, mask: &EdgeMap) -> PixelBuffer {
    debug_assert_eq!(buffer.dimensions(), mask.dimensions());
    convolve_blend(buffer, amount, Some(mask.as_slice()))
}

fn convolve_blend(buffer: &PixelBuffer, amount: f64, mask: Option<&[u8]>) -> PixelBuffer {
    let amount = if amount.is_nan() { 0.0 } else { amount.clamp(0.0, 1.0) };
    if amount == 0.0 || buffer.is_empty() {
        return buffer.clone();
    }

    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    let src = buffer.as_bytes();
    let mut out = src.to_vec();

    for y in 0..height {
        for x in 0..width {
            let index = y * width + x;
            if let Some(mask) = mask {
                if mask[index] == 0 {
                    continue;
                }
            }
            for c in 0..3 {
                let mut acc = 0.0;
                for ky in 0..3 {
                    let sy = (y + ky).saturating_sub(1).min(height - 1);
                    for kx in 0..3 {
                        let weight = SHARPEN_KERNEL[ky * 3 + kx];
                        if weight == 0.0 {
                            continue;
                        }
                        let sx = (x + kx).saturating_sub(1).min(width - 1);
                        acc += weight * src[(sy * width + sx) * PixelBuffer::CHANNELS + c] as f64;
                    }
                }
                let original = src[index * PixelBuffer::CHANNELS + c] as f64;
                out[index * PixelBuffer::CHANNELS + c] =
                    to_channel(original * (1.0 - amount) + acc * amount);
            }
        }
    }
    PixelBuffer::from_raw(buffer.dimensions(), out)
}
