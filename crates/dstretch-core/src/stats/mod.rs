//! Statistics engine: means, covariance and the eigenbasis of a
//! [`ComponentTriple`].
//!
//! Everything here is derived fresh for each pipeline invocation; nothing
//! is cached between images.

mod eigen;

pub use eigen::{eigendecompose, EigenBasis};

use crate::buffer::PixelBuffer;
use crate::color::{to_components, ColorSpace, Components};

/// Three equal-length component sequences of one image under one colorspace.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentTriple {
    pub c1: Vec<f64>,
    pub c2: Vec<f64>,
    pub c3: Vec<f64>,
}

impl ComponentTriple {
    /// Convert every pixel of `buffer` into `space`.
    pub fn from_buffer(buffer: &PixelBuffer, space: ColorSpace) -> Self {
        let n = buffer.pixel_count();
        let mut triple = Self {
            c1: Vec::with_capacity(n),
            c2: Vec::with_capacity(n),
            c3: Vec::with_capacity(n),
        };
        for p in buffer.pixels() {
            let [a, b, c] = to_components([p[0], p[1], p[2]], space);
            triple.c1.push(a);
            triple.c2.push(b);
            triple.c3.push(c);
        }
        triple
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.c1.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.c1.is_empty()
    }

    /// The components of sample `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Components {
        [self.c1[index], self.c2[index], self.c3[index]]
    }
}

/// Symmetric 3×3 covariance of channel deviations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CovarianceMatrix(pub [[f64; 3]; 3]);

impl CovarianceMatrix {
    pub const ZERO: CovarianceMatrix = CovarianceMatrix([[0.0; 3]; 3]);

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[row][col]
    }

    /// Per-component variances.
    #[inline]
    pub fn diagonal(&self) -> [f64; 3] {
        [self.0[0][0], self.0[1][1], self.0[2][2]]
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().flatten().all(|v| v.is_finite())
    }
}

/// Means, covariance and eigenbasis of one [`ComponentTriple`].
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub means: [f64; 3],
    pub covariance: CovarianceMatrix,
    pub basis: EigenBasis,
}

/// Arithmetic mean; 0 for an empty sequence.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased (n − 1) covariance of three component sequences.
///
/// Fewer than two samples give the zero matrix, which the eigen step
/// treats as degenerate.
pub fn covariance3x3(c1: &[f64], c2: &[f64], c3: &[f64]) -> CovarianceMatrix {
    debug_assert!(
        c1.len() == c2.len() && c2.len() == c3.len(),
        "component lengths differ: {} / {} / {}",
        c1.len(),
        c2.len(),
        c3.len()
    );
    let n = c1.len().min(c2.len()).min(c3.len());
    if n < 2 {
        return CovarianceMatrix::ZERO;
    }
    let means = [mean(&c1[..n]), mean(&c2[..n]), mean(&c3[..n])];
    covariance_about(c1, c2, c3, n, means)
}

fn covariance_about(
    c1: &[f64],
    c2: &[f64],
    c3: &[f64],
    n: usize,
    means: [f64; 3],
) -> CovarianceMatrix {
    let mut sums = [0.0f64; 6];
    for i in 0..n {
        let d1 = c1[i] - means[0];
        let d2 = c2[i] - means[1];
        let d3 = c3[i] - means[2];
        sums[0] += d1 * d1;
        sums[1] += d2 * d2;
        sums[2] += d3 * d3;
        sums[3] += d1 * d2;
        sums[4] += d1 * d3;
        sums[5] += d2 * d3;
    }
    let divisor = (n - 1) as f64;
    let [v11, v22, v33, v12, v13, v23] = sums.map(|s| s / divisor);
    CovarianceMatrix([[v11, v12, v13], [v12, v22, v23], [v13, v23, v33]])
}

/// Means, covariance and eigenbasis in one pass over the triple.
pub fn compute_statistics(components: &ComponentTriple) -> Statistics {
    let means = [
        mean(&components.c1),
        mean(&components.c2),
        mean(&components.c3),
    ];
    let n = components.len();
    let covariance = if n < 2 {
        CovarianceMatrix::ZERO
    } else {
        covariance_about(&components.c1, &components.c2, &components.c3, n, means)
    };
    let basis = eigendecompose(&covariance);
    Statistics {
        means,
        covariance,
        basis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]), 3.0);
    }

    #[test]
    fn test_covariance_is_unbiased() {
        // Var of [1, 3] about mean 2 is (1 + 1) / (2 - 1) = 2
        let cov = covariance3x3(&[1.0, 3.0], &[1.0, 3.0], &[3.0, 1.0]);
        assert_eq!(cov.diagonal(), [2.0, 2.0, 2.0]);
        assert_eq!(cov.get(0, 1), 2.0);
        assert_eq!(cov.get(0, 2), -2.0);
        assert_eq!(cov.get(2, 1), -2.0);
    }

    #[test]
    fn test_covariance_is_symmetric() {
        let c1 = [10.0, 20.0, 35.0, 3.0, 90.0];
        let c2 = [5.0, 1.0, 80.0, 44.0, 12.0];
        let c3 = [60.0, 61.0, 2.0, 9.0, 30.0];
        let cov = covariance3x3(&c1, &c2, &c3);
        for i in 0..3 {
            assert!(cov.get(i, i) >= 0.0);
            for j in 0..3 {
                assert_eq!(cov.get(i, j), cov.get(j, i));
            }
        }
    }

    #[test]
    fn test_single_sample_is_zero_matrix() {
        assert_eq!(covariance3x3(&[1.0], &[2.0], &[3.0]), CovarianceMatrix::ZERO);
    }

    #[test]
    fn test_component_triple_from_buffer() {
        let buffer = PixelBuffer::from_pixels(2, 1, &[[255, 0, 0, 255], [0, 0, 255, 255]]).unwrap();
        let triple = ComponentTriple::from_buffer(&buffer, ColorSpace::Yre);
        assert_eq!(triple.len(), 2);
        assert!(approx_eq(triple.c1[0], 0.299 * 255.0, 1e-9));
        assert_eq!(triple.c2, vec![255.0, 0.0]);
        assert_eq!(triple.c3, vec![0.0, 0.0]);
    }

    #[test]
    fn test_compute_statistics_matches_free_functions() {
        let buffer = PixelBuffer::from_pixels(
            3,
            1,
            &[[10, 200, 30, 255], [90, 20, 60, 255], [200, 100, 250, 255]],
        )
        .unwrap();
        let triple = ComponentTriple::from_buffer(&buffer, ColorSpace::Rgb);
        let stats = compute_statistics(&triple);
        assert_eq!(stats.means, [100.0, 320.0 / 3.0, 340.0 / 3.0]);
        assert_eq!(
            stats.covariance,
            covariance3x3(&triple.c1, &triple.c2, &triple.c3)
        );
        assert!(!stats.basis.is_fallback());
    }

    #[test]
    fn test_uniform_image_engages_fallback() {
        let buffer = PixelBuffer::from_pixel(8, 8, [120, 80, 40, 255]);
        let stats = compute_statistics(&ComponentTriple::from_buffer(&buffer, ColorSpace::Lab));
        assert!(stats.basis.is_fallback());
        assert_eq!(stats.basis.values, [1.0, 1.0, 1.0]);
    }
}
