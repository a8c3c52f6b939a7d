//! Pixel and per-pixel map buffers.
//!
//! [`PixelBuffer`] is the only thing that crosses the boundary between the
//! host application and the core: RGBA, 8 bits per channel, row-major.
//! [`EdgeMap`] and [`NormalMap`] are transient single-invocation buffers
//! derived from a pixel buffer; they remember the dimensions they were
//! built for so a stale map cannot be applied to a different image.

use std::fmt;

use crate::api::EnhanceError;
use crate::color::luma;

/// Width and height of a buffer, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels, or `None` on overflow.
    #[inline]
    pub fn checked_pixel_count(self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Fail with [`EnhanceError::DimensionMismatch`] unless `other` equals `self`.
    pub fn ensure_matches(self, other: Dimensions) -> Result<(), EnhanceError> {
        if self == other {
            Ok(())
        } else {
            Err(EnhanceError::DimensionMismatch {
                expected: self,
                actual: other,
            })
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An RGBA8 image, row-major, `width * height * 4` bytes.
///
/// The core never keeps a buffer between calls: every stage borrows its
/// input and returns a newly allocated buffer.
///
/// # Example
///
/// ```
/// use dstretch_core::PixelBuffer;
///
/// let buffer = PixelBuffer::from_pixel(4, 3, [10, 20, 30, 255]);
/// assert_eq!(buffer.pixel_count(), 12);
/// assert_eq!(buffer.rgb(3, 2), [10, 20, 30]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    dimensions: Dimensions,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Bytes per pixel.
    pub const CHANNELS: usize = 4;

    /// Wrap raw RGBA bytes, validating the length.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, EnhanceError> {
        let dimensions = Dimensions::new(width, height);
        let expected = dimensions
            .checked_pixel_count()
            .and_then(|n| n.checked_mul(Self::CHANNELS));
        match expected {
            Some(expected) if expected == data.len() => Ok(Self { dimensions, data }),
            expected => Err(EnhanceError::InvalidBuffer {
                dimensions,
                expected: expected.unwrap_or(usize::MAX),
                actual: data.len(),
            }),
        }
    }

    /// Build a buffer from a slice of RGBA pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: &[[u8; 4]]) -> Result<Self, EnhanceError> {
        Self::new(width, height, pixels.iter().flatten().copied().collect())
    }

    /// A solid-color buffer.
    pub fn from_pixel(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            dimensions: Dimensions::new(width, height),
            data: rgba.repeat(count),
        }
    }

    /// Internal constructor for stage outputs whose length is correct by construction.
    pub(crate) fn from_raw(dimensions: Dimensions, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            Some(data.len()),
            dimensions.checked_pixel_count().map(|n| n * Self::CHANNELS),
            "stage produced a buffer of the wrong length"
        );
        Self { dimensions, data }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.data.len() / Self::CHANNELS
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// RGB of the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the buffer.
    #[inline]
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.rgb_at(y as usize * self.width() as usize + x as usize)
    }

    /// RGBA of the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the buffer.
    #[inline]
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width() as usize + x as usize) * Self::CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    #[inline]
    pub(crate) fn rgb_at(&self, index: usize) -> [u8; 3] {
        let i = index * Self::CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Iterate over pixels as `[r, g, b, a]`.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(Self::CHANNELS)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// BT.601 luma of every pixel, on the 0..255 scale.
    pub(crate) fn luma_plane(&self) -> Vec<f64> {
        self.pixels().map(|p| luma([p[0], p[1], p[2]])).collect()
    }
}

/// Single-channel edge buffer: 0 (off) or 255 (on) per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMap {
    dimensions: Dimensions,
    data: Vec<u8>,
}

impl EdgeMap {
    /// An all-off map.
    pub fn zeros(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            data: vec![0; dimensions.width as usize * dimensions.height as usize],
        }
    }

    /// Wrap raw magnitudes, validating the length.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, EnhanceError> {
        let dimensions = Dimensions::new(width, height);
        match dimensions.checked_pixel_count() {
            Some(expected) if expected == data.len() => Ok(Self { dimensions, data }),
            expected => Err(EnhanceError::InvalidBuffer {
                dimensions,
                expected: expected.unwrap_or(usize::MAX),
                actual: data.len(),
            }),
        }
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.dimensions.width as usize + x as usize]
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, value: u8) {
        self.data[index] = value;
    }

    /// Number of pixels that are on.
    pub fn count_on(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0).count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count_on() == 0
    }
}

/// Per-pixel unit surface normals.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalMap {
    dimensions: Dimensions,
    normals: Vec<[f32; 3]>,
}

impl NormalMap {
    /// A map of flat normals `(0, 0, 1)`.
    pub fn flat(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            normals: vec![[0.0, 0.0, 1.0]; dimensions.width as usize * dimensions.height as usize],
        }
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [f32; 3] {
        self.normals[y as usize * self.dimensions.width as usize + x as usize]
    }

    #[inline]
    pub(crate) fn at(&self, index: usize) -> [f32; 3] {
        self.normals[index]
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, normal: [f32; 3]) {
        self.normals[index] = normal;
    }
}
