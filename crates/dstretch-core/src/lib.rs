#![allow(clippy::needless_range_loop)]

//! dstretch-core: decorrelation stretch and relief enhancement
//!
//! Pixel-processing core of an image-enhancement tool for rock-art and
//! archaeological photography. Everything here is a pure function of a
//! [`PixelBuffer`] and a [`ParameterSet`]: no file I/O, no shared state,
//! no threads.
//!
//! # Quick Start
//!
//! The [`Enhancer`] builder runs the whole pipeline:
//!
//! ```
//! use dstretch_core::{ColorSpace, Enhancer, PixelBuffer};
//!
//! let image = PixelBuffer::from_pixels(
//!     2,
//!     2,
//!     &[[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255], [255, 255, 255, 255]],
//! )
//! .unwrap();
//!
//! let enhancer = Enhancer::default().dstretch(true).colorspace(ColorSpace::Rgb);
//! let out = enhancer.process(&image).unwrap();
//! assert_ne!(out, image);
//! ```
//!
//! # Stages
//!
//! Each stage is also exposed on its own:
//!
//! - [`simple_decorrelate`]: per-channel normalization to mean 128 / sigma 50
//! - [`decorrelation_stretch`]: the principal-component stretch
//! - [`apply_tonal_adjustments`]: black point through sharpen, fixed order
//! - [`apply_relief_enhancement`]: normal-map lighting, edges, directional sharpen
//!
//! ## Pipeline Overview
//!
//! ```text
//! RGBA input
//!     |
//!     v
//! simple_decorrelate        (decorrelation > 0)
//!     |
//!     v
//! ColorSpace components     (RGB, LAB, LCH, YRE, LRE, YBK, CRGB)
//!     |
//!     +--> mean, covariance, Jacobi eigenbasis
//!     |
//!     v
//! project -> scale by amount/sqrt(λ) -> reproject -> back to RGB
//!     |
//!     v
//! tonal adjustments         (black point, exposure, ..., sharpen)
//!     |
//!     v
//! relief enhancement        (lighting, edge overlay, directional sharpen)
//!     |
//!     v
//! RGBA output               (alpha untouched)
//! ```
//!
//! ## Degenerate Input
//!
//! Nothing in the numeric path is an error. Unknown colorspace codes map to
//! RGB, a covariance without usable variance falls back to the identity
//! basis, out-of-range knobs are clamped, and every channel write clamps
//! and maps NaN to 0. The only [`EnhanceError`]s are contract violations:
//! a buffer whose length does not match its dimensions, or a map applied
//! to a buffer of a different size.

pub mod api;
pub mod buffer;
pub mod color;
pub mod params;
pub mod relief;
pub mod stats;
pub mod stretch;
pub mod tonal;

#[cfg(test)]
mod domain_tests;

pub use api::{EnhanceError, Enhancer};
pub use buffer::{Dimensions, EdgeMap, NormalMap, PixelBuffer};
pub use color::{
    from_components, from_components_with_source, gray, luma, to_components, ColorSpace,
};
pub use params::{ParameterSet, STRETCH_SIGMA_SCALE};
pub use relief::{
    apply_lighting, apply_relief_enhancement, detect_edges, directional_sharpen, normal_map,
    overlay_edges, sobel_luma,
};
pub use stats::{
    compute_statistics, covariance3x3, eigendecompose, mean, ComponentTriple, CovarianceMatrix,
    EigenBasis, Statistics,
};
pub use stretch::{decorrelation_stretch, simple_decorrelate};
pub use tonal::{apply_tonal_adjustments, sharpen};
