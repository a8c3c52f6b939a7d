//! Unified error type for the dstretch-core public API.

use thiserror::Error;

use crate::buffer::Dimensions;

/// Errors raised by the enhancement pipeline.
///
/// Numeric edge cases (unknown colorspace codes, degenerate covariance,
/// out-of-range parameters, NaN in inverse formulas) never surface here;
/// they degrade to documented defaults. Only caller contract violations do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnhanceError {
    /// Byte length does not match `width * height * 4`.
    #[error("invalid pixel buffer: {dimensions} RGBA needs {expected} bytes, got {actual}")]
    InvalidBuffer {
        dimensions: Dimensions,
        expected: usize,
        actual: usize,
    },

    /// A derived map (edges, normals, mask) was built for different dimensions.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: Dimensions,
        actual: Dimensions,
    },
}
