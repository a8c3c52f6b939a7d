//! Sobel gradients of the luma plane.

use crate::buffer::{Dimensions, PixelBuffer};

/// Horizontal and vertical Sobel responses per pixel.
///
/// The one-pixel border has no full 3×3 neighbourhood and is left at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    dimensions: Dimensions,
    dx: Vec<f64>,
    dy: Vec<f64>,
}

impl GradientField {
    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// `(dx, dy)` at pixel `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> (f64, f64) {
        self.at(y as usize * self.dimensions.width as usize + x as usize)
    }

    #[inline]
    pub(crate) fn at(&self, index: usize) -> (f64, f64) {
        (self.dx[index], self.dy[index])
    }

    /// Gradient magnitude at a linear pixel index.
    #[inline]
    pub fn magnitude(&self, index: usize) -> f64 {
        self.dx[index].hypot(self.dy[index])
    }

    /// Whether `(x, y)` lies on the excluded border.
    #[inline]
    pub(crate) fn is_border(&self, x: usize, y: usize) -> bool {
        let w = self.dimensions.width as usize;
        let h = self.dimensions.height as usize;
        x == 0 || y == 0 || x + 1 >= w || y + 1 >= h
    }
}

/// Sobel gradients of BT.601 luma on the 0..255 scale.
pub fn sobel_luma(buffer: &PixelBuffer) -> GradientField {
    sobel(&buffer.luma_plane(), buffer.dimensions())
}

pub(crate) fn sobel(plane: &[f64], dimensions: Dimensions) -> GradientField {
    let w = dimensions.width as usize;
    let h = dimensions.height as usize;
    let mut dx = vec![0.0; plane.len()];
    let mut dy = vec![0.0; plane.len()];

    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let p = |xx: usize, yy: usize| plane[yy * w + xx];
            let gx = (p(x + 1, y - 1) + 2.0 * p(x + 1, y) + p(x + 1, y + 1))
                - (p(x - 1, y - 1) + 2.0 * p(x - 1, y) + p(x - 1, y + 1));
            let gy = (p(x - 1, y + 1) + 2.0 * p(x, y + 1) + p(x + 1, y + 1))
                - (p(x - 1, y - 1) + 2.0 * p(x, y - 1) + p(x + 1, y - 1));
            dx[y * w + x] = gx;
            dy[y * w + x] = gy;
        }
    }
    GradientField { dimensions, dx, dy }
}
