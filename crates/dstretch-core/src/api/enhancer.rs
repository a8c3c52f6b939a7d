//! Enhancer builder: the full pipeline behind one entry point.
//!
//! [`Enhancer`] wraps a [`ParameterSet`] with fluent configuration and runs
//! per-channel decorrelation, the principal-component stretch, the tonal
//! stage and the relief stage in order.

use crate::api::EnhanceError;
use crate::buffer::PixelBuffer;
use crate::color::ColorSpace;
use crate::params::ParameterSet;
use crate::relief::apply_relief_enhancement;
use crate::stretch::{decorrelation_stretch, simple_decorrelate};
use crate::tonal::apply_tonal_adjustments;

/// High-level enhancement builder.
///
/// # Design
///
/// - Configuration methods consume and return `self`, clamping as they go
/// - [`process()`](Self::process) takes `&self`, so one enhancer can be
///   reused across images and shared between threads
/// - Every stage allocates a new buffer; the input is never modified
///
/// # Example
///
/// ```
/// use dstretch_core::{ColorSpace, Enhancer, PixelBuffer};
///
/// let enhancer = Enhancer::default()
///     .dstretch(true)
///     .colorspace(ColorSpace::Lab)
///     .contrast(20.0);
///
/// let image = PixelBuffer::from_pixel(4, 4, [120, 90, 60, 255]);
/// let out = enhancer.process(&image).unwrap();
/// assert_eq!(out.dimensions(), image.dimensions());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enhancer {
    params: ParameterSet,
}

impl Enhancer {
    /// Create an enhancer from a parameter record.
    ///
    /// The record is clamped, so deserialized input with out-of-range
    /// values is accepted.
    pub fn new(params: ParameterSet) -> Self {
        Self {
            params: params.clamped(),
        }
    }

    /// The effective, clamped parameters.
    #[inline]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Enable or disable the principal-component stretch.
    #[inline]
    pub fn dstretch(mut self, enabled: bool) -> Self {
        self.params = self.params.dstretch(enabled);
        self
    }

    /// Set the working colorspace of the stretch.
    #[inline]
    pub fn colorspace(mut self, space: ColorSpace) -> Self {
        self.params = self.params.colorspace(space);
        self
    }

    /// Set the relative stretch strength (0..=2, 0.5 by default).
    #[inline]
    pub fn stretch_amount(mut self, amount: f64) -> Self {
        self.params = self.params.stretch_amount(amount);
        self
    }

    /// Set the per-channel decorrelation blend, percent.
    #[inline]
    pub fn decorrelation(mut self, percent: f64) -> Self {
        self.params = self.params.decorrelation(percent);
        self
    }

    #[inline]
    pub fn exposure(mut self, value: f64) -> Self {
        self.params = self.params.exposure(value);
        self
    }

    #[inline]
    pub fn brightness(mut self, value: f64) -> Self {
        self.params = self.params.brightness(value);
        self
    }

    #[inline]
    pub fn shadows(mut self, value: f64) -> Self {
        self.params = self.params.shadows(value);
        self
    }

    #[inline]
    pub fn contrast(mut self, value: f64) -> Self {
        self.params = self.params.contrast(value);
        self
    }

    #[inline]
    pub fn black_point(mut self, value: f64) -> Self {
        self.params = self.params.black_point(value);
        self
    }

    #[inline]
    pub fn saturation(mut self, value: f64) -> Self {
        self.params = self.params.saturation(value);
        self
    }

    #[inline]
    pub fn sharpness(mut self, value: f64) -> Self {
        self.params = self.params.sharpness(value);
        self
    }

    /// Set the normal-map lighting strength, percent.
    #[inline]
    pub fn normal_strength(mut self, value: f64) -> Self {
        self.params = self.params.normal_strength(value);
        self
    }

    /// Set the light direction in degrees.
    #[inline]
    pub fn light_angle(mut self, degrees: f64) -> Self {
        self.params = self.params.light_angle(degrees);
        self
    }

    #[inline]
    pub fn light_intensity(mut self, value: f64) -> Self {
        self.params = self.params.light_intensity(value);
        self
    }

    /// Set the edge threshold, percent of full scale.
    #[inline]
    pub fn edge_strength(mut self, value: f64) -> Self {
        self.params = self.params.edge_strength(value);
        self
    }

    #[inline]
    pub fn edge_thickness(mut self, pixels: u32) -> Self {
        self.params = self.params.edge_thickness(pixels);
        self
    }

    #[inline]
    pub fn directional_sharpen(mut self, value: f64) -> Self {
        self.params = self.params.directional_sharpen(value);
        self
    }

    /// Run the pipeline on `image`.
    ///
    /// 1. Per-channel decorrelation (when `decorrelation > 0`)
    /// 2. Principal-component stretch (when `dstretch` is on)
    /// 3. Tonal adjustments
    /// 4. Relief enhancement
    ///
    /// Fails only when an intermediate map does not match the working
    /// buffer, which indicates a bug rather than bad input.
    pub fn process(&self, image: &PixelBuffer) -> Result<PixelBuffer, EnhanceError> {
        let params = &self.params;
        tracing::debug!(
            dimensions = %image.dimensions(),
            dstretch = params.dstretch,
            colorspace = %params.colorspace,
            "enhancing image"
        );

        let mut current = if params.decorrelation > 0.0 {
            simple_decorrelate(image, params.decorrelation / 100.0)
        } else {
            image.clone()
        };

        if params.dstretch {
            current = decorrelation_stretch(&current, params.colorspace, params.stretch_sigma());
        }

        current = apply_tonal_adjustments(&current, params);

        if params.has_relief() {
            current = apply_relief_enhancement(&current, params)?;
        }

        image.dimensions().ensure_matches(current.dimensions())?;
        Ok(current)
    }
}
