//! Relief enhancement stage
//!
//! Three independent effects that bring out surface texture, each gated by
//! its own amount:
//!
//! 1. Normal-map lighting: luma gradients become surface normals, lit
//!    from a configurable angle.
//! 2. Edge overlay: a thresholded Sobel map, optionally dilated, darkens
//!    the image along edges.
//! 3. Directional sharpen: the sharpening kernel, applied only on edges.
//!
//! Every map is rebuilt from the current working buffer, since earlier
//! effects change its luma.

mod edges;
mod gradient;
mod normal_map;

pub use edges::{detect_edges, overlay_edges, EDGE_ON};
pub use gradient::{sobel_luma, GradientField};
pub use normal_map::{apply_lighting, light_direction, normal_map};

use crate::api::EnhanceError;
use crate::buffer::PixelBuffer;
use crate::params::{ranges, ParameterSet};
use crate::tonal::sharpen_masked;

/// Edge threshold used to pick pixels for directional sharpening.
pub const DIRECTIONAL_EDGE_THRESHOLD: f64 = 0.5;

/// Sharpen only where the luma gradient is strong.
///
/// `amount` is a fraction in `[0, 1]`.
pub fn directional_sharpen(buffer: &PixelBuffer, amount: f64) -> PixelBuffer {
    let edges = detect_edges(buffer, DIRECTIONAL_EDGE_THRESHOLD);
    if edges.is_empty() {
        return buffer.clone();
    }
    sharpen_masked(buffer, amount, &edges)
}

/// Run lighting, edge overlay and directional sharpen, in that order.
///
/// Each effect runs only when its amount is above zero; with the default
/// parameters the input comes back unchanged.
pub fn apply_relief_enhancement(
    buffer: &PixelBuffer,
    params: &ParameterSet,
) -> Result<PixelBuffer, EnhanceError> {
    let normal_strength = ranges::NORMAL_STRENGTH.clamp(params.normal_strength) / 100.0;
    let light_angle = ranges::LIGHT_ANGLE.clamp(params.light_angle);
    let light_intensity = ranges::LIGHT_INTENSITY.clamp(params.light_intensity) / 100.0;
    let edge_strength = ranges::EDGE_STRENGTH.clamp(params.edge_strength) / 100.0;
    let thickness = params.clamped().edge_thickness;
    let directional = ranges::DIRECTIONAL_SHARPEN.clamp(params.directional_sharpen) / 100.0;

    let mut current = buffer.clone();

    if normal_strength > 0.0 {
        let normals = normal_map(&current, normal_strength);
        current = apply_lighting(
            &current,
            &normals,
            normal_strength,
            light_angle,
            light_intensity,
        )?;
    }

    if edge_strength > 0.0 {
        let edges = detect_edges(&current, edge_strength).dilate(thickness);
        tracing::trace!(on = edges.count_on(), thickness, "edge overlay");
        current = overlay_edges(&current, &edges)?;
    }

    if directional > 0.0 {
        current = directional_sharpen(&current, directional);
    }

    Ok(current)
}
