//! Per-channel decorrelation
//!
//! Each RGB channel is normalized on its own to mean 128 and standard
//! deviation 50, then blended with the original. Unlike the principal
//! component stretch this ignores correlation between channels.

use crate::buffer::PixelBuffer;
use crate::color::to_channel;
use crate::stats::mean;

/// Target mean of a normalized channel.
const TARGET_MEAN: f64 = 128.0;

/// Target standard deviation of a normalized channel.
const TARGET_SIGMA: f64 = 50.0;

/// Normalize each channel to mean 128 / sigma 50 and blend by `amount`.
///
/// `amount` is clamped to `[0, 1]`; `0` returns the input. A channel with
/// zero variance is left as is. Alpha is copied through.
pub fn simple_decorrelate(buffer: &PixelBuffer, amount: f64) -> PixelBuffer {
    let amount = if amount.is_nan() { 0.0 } else { amount.clamp(0.0, 1.0) };
    if amount == 0.0 || buffer.is_empty() {
        return buffer.clone();
    }

    let channels: [Vec<f64>; 3] = std::array::from_fn(|c| {
        buffer
            .as_bytes()
            .chunks_exact(PixelBuffer::CHANNELS)
            .map(|p| p[c] as f64)
            .collect()
    });
    let params = channels.each_ref().map(|values| {
        let mu = mean(values);
        (mu, sample_sigma(values, mu))
    });

    let mut out = buffer.as_bytes().to_vec();
    for pixel in out.chunks_exact_mut(PixelBuffer::CHANNELS) {
        for (value, &(mu, sigma)) in pixel.iter_mut().zip(params.iter()) {
            if sigma == 0.0 {
                continue;
            }
            let v = *value as f64;
            let normalized = (v - mu) / sigma * TARGET_SIGMA + TARGET_MEAN;
            *value = to_channel(v * (1.0 - amount) + normalized * amount);
        }
    }
    PixelBuffer::from_raw(buffer.dimensions(), out)
}

/// Sample standard deviation (n − 1); 0 for fewer than two values.
fn sample_sigma(values: &[f64], mu: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mu) * (v - mu)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}
