//! Decorrelation stretch engine
//!
//! The principal-component stretch: every pixel is centered on the image
//! mean, rotated into the eigenbasis of the component covariance, scaled so
//! each eigen-axis gets the same spread, and rotated back. Colors that vary
//! together get pulled apart, which is what makes faint pigment visible.
//!
//! [`simple_decorrelate`] is the cheaper per-channel variant the interactive
//! tool exposes as a separate pre-stage.

mod simple;

pub use simple::simple_decorrelate;

use crate::buffer::PixelBuffer;
use crate::color::{from_components_with_source, ColorSpace};
use crate::stats::{compute_statistics, ComponentTriple};

/// Eigenvalues below this magnitude are treated as zero (scale divisor 1).
pub const ZERO_EIGENVALUE: f64 = 1e-9;

/// Per-axis scale factors `amount / sqrt(|λ|)`.
pub fn stretch_scales(values: [f64; 3], amount: f64) -> [f64; 3] {
    values.map(|lambda| {
        let magnitude = lambda.abs();
        if magnitude < ZERO_EIGENVALUE {
            amount
        } else {
            amount / magnitude.sqrt()
        }
    })
}

/// Principal-component stretch of `buffer` in `space`.
///
/// `amount` is the target standard deviation along every eigen-axis, in
/// component units of `space`. CRGB output keeps each source pixel's
/// brightness, which the CRGB components do not carry. Alpha is copied
/// through; a degenerate
/// covariance uses the identity basis, so a uniform image comes back
/// unchanged.
///
/// # Example
///
/// ```
/// use dstretch_core::{decorrelation_stretch, ColorSpace, PixelBuffer};
///
/// let flat = PixelBuffer::from_pixel(3, 3, [90, 60, 30, 255]);
/// let out = decorrelation_stretch(&flat, ColorSpace::Lab, 50.0);
/// assert_eq!(out, flat);
/// ```
pub fn decorrelation_stretch(buffer: &PixelBuffer, space: ColorSpace, amount: f64) -> PixelBuffer {
    if buffer.is_empty() {
        return buffer.clone();
    }
    let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };

    let components = ComponentTriple::from_buffer(buffer, space);
    let stats = compute_statistics(&components);
    let scales = stretch_scales(stats.basis.values, amount);
    tracing::debug!(
        colorspace = %space,
        amount,
        eigenvalues = ?stats.basis.values,
        fallback = stats.basis.is_fallback(),
        "decorrelation stretch"
    );

    let mut out = Vec::with_capacity(buffer.as_bytes().len());
    for (i, pixel) in buffer.pixels().enumerate() {
        let c = components.get(i);
        let centered = [
            c[0] - stats.means[0],
            c[1] - stats.means[1],
            c[2] - stats.means[2],
        ];
        let mut p = stats.basis.project(centered);
        for (coord, scale) in p.iter_mut().zip(scales) {
            *coord *= scale;
        }
        let back = stats.basis.reproject(p);
        let stretched = [
            back[0] + stats.means[0],
            back[1] + stats.means[1],
            back[2] + stats.means[2],
        ];
        let source = [pixel[0], pixel[1], pixel[2]];
        let [r, g, b] = from_components_with_source(stretched, space, source);
        out.extend_from_slice(&[r, g, b, pixel[3]]);
    }
    PixelBuffer::from_raw(buffer.dimensions(), out)
}
