//! Surface normals from luma gradients, and directional lighting.

use super::gradient::sobel;
use crate::api::EnhanceError;
use crate::buffer::{NormalMap, PixelBuffer};
use crate::color::to_channel;

/// Elevation component of the light vector before normalization.
const LIGHT_ELEVATION: f64 = 0.5;

/// Unit light vector for a direction in degrees.
///
/// The light sits at `(cos θ, sin θ, 0.5)`, i.e. slightly above the image
/// plane, so flat areas receive some light from every angle.
pub fn light_direction(angle_degrees: f64) -> [f64; 3] {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    normalize([cos, sin, LIGHT_ELEVATION])
}

#[inline]
fn normalize(v: [f64; 3]) -> [f64; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len == 0.0 {
        return [0.0, 0.0, 1.0];
    }
    v.map(|c| c / len)
}

/// Synthesize a normal map from luma gradients.
///
/// Luma is normalized to `[0, 1]` before the Sobel pass and each interior
/// normal is `normalize(-dx·strength, -dy·strength, 1)`. Border pixels keep
/// the flat normal.
pub fn normal_map(buffer: &PixelBuffer, strength: f64) -> NormalMap {
    let dimensions = buffer.dimensions();
    let plane: Vec<f64> = buffer.luma_plane().into_iter().map(|l| l / 255.0).collect();
    let gradients = sobel(&plane, dimensions);

    let mut normals = NormalMap::flat(dimensions);
    let w = dimensions.width as usize;
    for y in 0..dimensions.height as usize {
        for x in 0..w {
            if gradients.is_border(x, y) {
                continue;
            }
            let index = y * w + x;
            let (dx, dy) = gradients.at(index);
            let n = normalize([-dx * strength, -dy * strength, 1.0]);
            normals.set(index, n.map(|c| c as f32));
        }
    }
    normals
}

/// Light `buffer` with `normals` from `angle_degrees`.
///
/// Per interior pixel: `lighting = max(0, n·l) · intensity` and
/// `out = orig·(1 - strength) + orig·(1 + lighting)·strength`.
/// `strength` and `intensity` are fractions in `[0, 1]`. Border pixels and
/// alpha are copied through.
pub fn apply_lighting(
    buffer: &PixelBuffer,
    normals: &NormalMap,
    strength: f64,
    angle_degrees: f64,
    intensity: f64,
) -> Result<PixelBuffer, EnhanceError> {
    buffer.dimensions().ensure_matches(normals.dimensions())?;

    let light = light_direction(angle_degrees);
    let w = buffer.width() as usize;
    let h = buffer.height() as usize;
    let mut out = buffer.as_bytes().to_vec();

    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let index = y * w + x;
            let n = normals.at(index).map(f64::from);
            let lighting = (n[0] * light[0] + n[1] * light[1] + n[2] * light[2]).max(0.0) * intensity;
            let gain = (1.0 - strength) + (1.0 + lighting) * strength;
            let px = &mut out[index * PixelBuffer::CHANNELS..][..3];
            for channel in px.iter_mut() {
                *channel = to_channel(*channel as f64 * gain);
            }
        }
    }
    Ok(PixelBuffer::from_raw(buffer.dimensions(), out))
}
