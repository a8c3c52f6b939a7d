//! Colorspace codec
//!
//! Pure per-pixel conversions between 8-bit RGB and the working
//! component spaces of the decorrelation stretch.
//!
//! # Example
//!
//! ```
//! use dstretch_core::color::{from_components, to_components, ColorSpace};
//!
//! let lab = to_components([200, 120, 60], ColorSpace::Lab);
//! let back = from_components(lab, ColorSpace::Lab);
//! assert!((back[0] as i32 - 200).abs() <= 1);
//! ```

mod lab;
mod lut;
mod luma;
mod space;

pub use lab::{lab_to_rgb, lch_to_rgb, rgb_to_lab, rgb_to_lch};
pub use luma::{luma, weighted_luma, BT601, BT709};
pub use space::{
    from_components, from_components_with_source, to_channel, to_components, ColorSpace,
    Components,
};

/// BT.601 luma of a pixel, rounded to a byte.
#[inline]
pub fn gray(rgb: [u8; 3]) -> u8 {
    to_channel(luma(rgb))
}
