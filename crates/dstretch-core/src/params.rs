//! User-tunable enhancement parameters.
//!
//! [`ParameterSet`] is an immutable record of every knob the interactive
//! tool exposes. Each numeric field has a fixed [`Range`]; values outside it
//! are clamped, never rejected, and NaN falls back to the field default.
//!
//! # Example
//!
//! ```
//! use dstretch_core::{ColorSpace, ParameterSet};
//!
//! let params = ParameterSet::new()
//!     .dstretch(true)
//!     .colorspace(ColorSpace::Yre)
//!     .contrast(250.0); // clamped
//!
//! assert_eq!(params.contrast, 100.0);
//! ```

use crate::color::ColorSpace;

/// Valid interval and default of a numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl Range {
    const fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    /// Clamp into the range; NaN becomes the default.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Whether `value` equals the default, i.e. the knob is a no-op.
    #[inline]
    pub fn is_default(&self, value: f64) -> bool {
        value == self.default
    }
}

/// Ranges for every numeric field of [`ParameterSet`].
pub mod ranges {
    use super::Range;

    /// Relative stretch strength; multiplied by 100 to get the target sigma.
    pub const STRETCH_AMOUNT: Range = Range::new(0.0, 2.0, 0.5);
    /// Per-channel decorrelation blend, percent.
    pub const DECORRELATION: Range = Range::new(0.0, 100.0, 0.0);
    /// Exposure in hundredths of a stop.
    pub const EXPOSURE: Range = Range::new(-100.0, 100.0, 0.0);
    pub const BRIGHTNESS: Range = Range::new(-100.0, 100.0, 0.0);
    pub const SHADOWS: Range = Range::new(0.0, 100.0, 0.0);
    pub const CONTRAST: Range = Range::new(-100.0, 100.0, 0.0);
    /// Black point in percent of full scale.
    pub const BLACK_POINT: Range = Range::new(0.0, 100.0, 0.0);
    pub const SATURATION: Range = Range::new(-100.0, 100.0, 0.0);
    pub const SHARPNESS: Range = Range::new(0.0, 100.0, 0.0);
    pub const NORMAL_STRENGTH: Range = Range::new(0.0, 100.0, 0.0);
    /// Light direction in degrees.
    pub const LIGHT_ANGLE: Range = Range::new(0.0, 360.0, 45.0);
    pub const LIGHT_INTENSITY: Range = Range::new(0.0, 100.0, 50.0);
    pub const EDGE_STRENGTH: Range = Range::new(0.0, 100.0, 0.0);
    /// Edge thickness in pixels; `1` means no dilation.
    pub const EDGE_THICKNESS: Range = Range::new(1.0, 10.0, 1.0);
    pub const DIRECTIONAL_SHARPEN: Range = Range::new(0.0, 100.0, 0.0);
}

/// Scale from [`ParameterSet::stretch_amount`] to the stretch engine's
/// target standard deviation, in component units.
pub const STRETCH_SIGMA_SCALE: f64 = 100.0;

/// Every user-tunable knob of the enhancement pipeline.
///
/// The defaults are neutral: with `ParameterSet::default()` the full
/// pipeline is the identity transform.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParameterSet {
    /// Run the principal-component stretch.
    pub dstretch: bool,
    /// Working colorspace of the stretch.
    pub colorspace: ColorSpace,
    pub stretch_amount: f64,
    pub decorrelation: f64,
    pub exposure: f64,
    pub brightness: f64,
    pub shadows: f64,
    pub contrast: f64,
    pub black_point: f64,
    pub saturation: f64,
    pub sharpness: f64,
    pub normal_strength: f64,
    pub light_angle: f64,
    pub light_intensity: f64,
    pub edge_strength: f64,
    pub edge_thickness: u32,
    pub directional_sharpen: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            dstretch: false,
            colorspace: ColorSpace::Rgb,
            stretch_amount: ranges::STRETCH_AMOUNT.default,
            decorrelation: ranges::DECORRELATION.default,
            exposure: ranges::EXPOSURE.default,
            brightness: ranges::BRIGHTNESS.default,
            shadows: ranges::SHADOWS.default,
            contrast: ranges::CONTRAST.default,
            black_point: ranges::BLACK_POINT.default,
            saturation: ranges::SATURATION.default,
            sharpness: ranges::SHARPNESS.default,
            normal_strength: ranges::NORMAL_STRENGTH.default,
            light_angle: ranges::LIGHT_ANGLE.default,
            light_intensity: ranges::LIGHT_INTENSITY.default,
            edge_strength: ranges::EDGE_STRENGTH.default,
            edge_thickness: ranges::EDGE_THICKNESS.default as u32,
            directional_sharpen: ranges::DIRECTIONAL_SHARPEN.default,
        }
    }
}

impl ParameterSet {
    /// Neutral parameters. Equivalent to `ParameterSet::default()`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with every field forced into its valid range.
    ///
    /// Records built through the setters are already clamped; this is for
    /// records deserialized or assembled field by field.
    pub fn clamped(&self) -> Self {
        Self {
            dstretch: self.dstretch,
            colorspace: self.colorspace,
            stretch_amount: ranges::STRETCH_AMOUNT.clamp(self.stretch_amount),
            decorrelation: ranges::DECORRELATION.clamp(self.decorrelation),
            exposure: ranges::EXPOSURE.clamp(self.exposure),
            brightness: ranges::BRIGHTNESS.clamp(self.brightness),
            shadows: ranges::SHADOWS.clamp(self.shadows),
            contrast: ranges::CONTRAST.clamp(self.contrast),
            black_point: ranges::BLACK_POINT.clamp(self.black_point),
            saturation: ranges::SATURATION.clamp(self.saturation),
            sharpness: ranges::SHARPNESS.clamp(self.sharpness),
            normal_strength: ranges::NORMAL_STRENGTH.clamp(self.normal_strength),
            light_angle: ranges::LIGHT_ANGLE.clamp(self.light_angle),
            light_intensity: ranges::LIGHT_INTENSITY.clamp(self.light_intensity),
            edge_strength: ranges::EDGE_STRENGTH.clamp(self.edge_strength),
            edge_thickness: clamp_thickness(self.edge_thickness),
            directional_sharpen: ranges::DIRECTIONAL_SHARPEN.clamp(self.directional_sharpen),
        }
    }

    /// Target standard deviation handed to the stretch engine.
    #[inline]
    pub fn stretch_sigma(&self) -> f64 {
        ranges::STRETCH_AMOUNT.clamp(self.stretch_amount) * STRETCH_SIGMA_SCALE
    }

    /// Restore the tonal group (exposure through sharpness) to neutral.
    pub fn reset_adjustments(&self) -> Self {
        let neutral = Self::default();
        Self {
            exposure: neutral.exposure,
            brightness: neutral.brightness,
            shadows: neutral.shadows,
            contrast: neutral.contrast,
            black_point: neutral.black_point,
            saturation: neutral.saturation,
            sharpness: neutral.sharpness,
            ..self.clone()
        }
    }

    /// Restore the relief group and the per-channel decorrelation to their defaults.
    pub fn reset_advanced(&self) -> Self {
        let neutral = Self::default();
        Self {
            decorrelation: neutral.decorrelation,
            normal_strength: neutral.normal_strength,
            light_angle: neutral.light_angle,
            light_intensity: neutral.light_intensity,
            edge_strength: neutral.edge_strength,
            edge_thickness: neutral.edge_thickness,
            directional_sharpen: neutral.directional_sharpen,
            ..self.clone()
        }
    }

    /// Whether any relief sub-effect is enabled.
    pub fn has_relief(&self) -> bool {
        self.normal_strength > 0.0 || self.edge_strength > 0.0 || self.directional_sharpen > 0.0
    }

    #[inline]
    pub fn dstretch(mut self, enabled: bool) -> Self {
        self.dstretch = enabled;
        self
    }

    #[inline]
    pub fn colorspace(mut self, space: ColorSpace) -> Self {
        self.colorspace = space;
        self
    }

    #[inline]
    pub fn stretch_amount(mut self, amount: f64) -> Self {
        self.stretch_amount = ranges::STRETCH_AMOUNT.clamp(amount);
        self
    }

    #[inline]
    pub fn decorrelation(mut self, percent: f64) -> Self {
        self.decorrelation = ranges::DECORRELATION.clamp(percent);
        self
    }

    #[inline]
    pub fn exposure(mut self, value: f64) -> Self {
        self.exposure = ranges::EXPOSURE.clamp(value);
        self
    }

    #[inline]
    pub fn brightness(mut self, value: f64) -> Self {
        self.brightness = ranges::BRIGHTNESS.clamp(value);
        self
    }

    #[inline]
    pub fn shadows(mut self, value: f64) -> Self {
        self.shadows = ranges::SHADOWS.clamp(value);
        self
    }

    #[inline]
    pub fn contrast(mut self, value: f64) -> Self {
        self.contrast = ranges::CONTRAST.clamp(value);
        self
    }

    #[inline]
    pub fn black_point(mut self, value: f64) -> Self {
        self.black_point = ranges::BLACK_POINT.clamp(value);
        self
    }

    #[inline]
    pub fn saturation(mut self, value: f64) -> Self {
        self.saturation = ranges::SATURATION.clamp(value);
        self
    }

    #[inline]
    pub fn sharpness(mut self, value: f64) -> Self {
        self.sharpness = ranges::SHARPNESS.clamp(value);
        self
    }

    #[inline]
    pub fn normal_strength(mut self, value: f64) -> Self {
        self.normal_strength = ranges::NORMAL_STRENGTH.clamp(value);
        self
    }

    #[inline]
    pub fn light_angle(mut self, degrees: f64) -> Self {
        self.light_angle = ranges::LIGHT_ANGLE.clamp(degrees);
        self
    }

    #[inline]
    pub fn light_intensity(mut self, value: f64) -> Self {
        self.light_intensity = ranges::LIGHT_INTENSITY.clamp(value);
        self
    }

    #[inline]
    pub fn edge_strength(mut self, value: f64) -> Self {
        self.edge_strength = ranges::EDGE_STRENGTH.clamp(value);
        self
    }

    #[inline]
    pub fn edge_thickness(mut self, pixels: u32) -> Self {
        self.edge_thickness = clamp_thickness(pixels);
        self
    }

    #[inline]
    pub fn directional_sharpen(mut self, value: f64) -> Self {
        self.directional_sharpen = ranges::DIRECTIONAL_SHARPEN.clamp(value);
        self
    }
}

#[inline]
pub(crate) fn clamp_thickness(pixels: u32) -> u32 {
    pixels.clamp(
        ranges::EDGE_THICKNESS.min as u32,
        ranges::EDGE_THICKNESS.max as u32,
    )
}
