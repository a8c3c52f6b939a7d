//! Edge detection, dilation and overlay.

use super::gradient::sobel_luma;
use crate::api::EnhanceError;
use crate::buffer::{EdgeMap, PixelBuffer};
use crate::color::to_channel;
use crate::params::clamp_thickness;

/// Value of an on pixel in an [`EdgeMap`].
pub const EDGE_ON: u8 = 255;

/// Maximum darkening of a full-strength edge.
const OVERLAY_DARKEN: f64 = 0.5;

/// Binary edge map: on where the luma Sobel magnitude exceeds
/// `threshold · 255`.
///
/// `threshold` is a fraction; a flat image yields an all-off map.
pub fn detect_edges(buffer: &PixelBuffer, threshold: f64) -> EdgeMap {
    let limit = threshold * 255.0;
    let gradients = sobel_luma(buffer);
    let mut edges = EdgeMap::zeros(buffer.dimensions());
    for index in 0..buffer.pixel_count() {
        if gradients.magnitude(index) > limit {
            edges.set(index, EDGE_ON);
        }
    }
    edges
}

impl EdgeMap {
    /// Grow edges by `thickness - 1` iterations of 4-neighbour dilation.
    ///
    /// Each iteration reads the previous one, so an isolated pixel becomes
    /// a diamond of radius `thickness - 1`. `thickness` is clamped to the
    /// edge-thickness range (1..=10), so `thickness <= 1` is a no-op.
    pub fn dilate(&self, thickness: u32) -> EdgeMap {
        let thickness = clamp_thickness(thickness);
        let mut current = self.clone();
        let dimensions = self.dimensions();
        let w = dimensions.width as usize;
        let h = dimensions.height as usize;

        for _ in 1..thickness {
            let previous = current.as_slice().to_vec();
            for y in 0..h {
                for x in 0..w {
                    let value = previous[y * w + x];
                    if value == 0 {
                        continue;
                    }
                    if x > 0 {
                        current.set(y * w + x - 1, value.max(previous[y * w + x - 1]));
                    }
                    if x + 1 < w {
                        current.set(y * w + x + 1, value.max(previous[y * w + x + 1]));
                    }
                    if y > 0 {
                        current.set((y - 1) * w + x, value.max(previous[(y - 1) * w + x]));
                    }
                    if y + 1 < h {
                        current.set((y + 1) * w + x, value.max(previous[(y + 1) * w + x]));
                    }
                }
            }
        }
        current
    }
}

/// Darken `buffer` along `edges`: `channel *= 1 - edge/255 · 0.5`.
pub fn overlay_edges(buffer: &PixelBuffer, edges: &EdgeMap) -> Result<PixelBuffer, EnhanceError> {
    buffer.dimensions().ensure_matches(edges.dimensions())?;

    let mut out = buffer.as_bytes().to_vec();
    for (pixel, &edge) in out
        .chunks_exact_mut(PixelBuffer::CHANNELS)
        .zip(edges.as_slice())
    {
        if edge == 0 {
            continue;
        }
        let factor = 1.0 - edge as f64 / 255.0 * OVERLAY_DARKEN;
        for channel in &mut pixel[..3] {
            *channel = to_channel(*channel as f64 * factor);
        }
    }
    Ok(PixelBuffer::from_raw(buffer.dimensions(), out))
}
