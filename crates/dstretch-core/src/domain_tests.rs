//! Domain-critical regression tests for dstretch-core.
//!
//! These tests are designed to catch specific classes of bugs, not just
//! confirm happy paths. Each test documents the regression it guards against.

#[cfg(test)]
mod domain_tests {
    use crate::api::Enhancer;
    use crate::buffer::{Dimensions, EdgeMap, PixelBuffer};
    use crate::color::{from_components, to_components, ColorSpace};
    use crate::params::ParameterSet;
    use crate::relief::{apply_relief_enhancement, detect_edges, EDGE_ON};
    use crate::stats::{compute_statistics, ComponentTriple};
    use crate::stretch::decorrelation_stretch;
    use crate::tonal::apply_tonal_adjustments;

    /// The 2×2 red/green/blue/white buffer used by the interactive tool's
    /// smoke test.
    fn primaries() -> PixelBuffer {
        PixelBuffer::from_pixels(
            2,
            2,
            &[
                [255, 0, 0, 255],
                [0, 255, 0, 255],
                [0, 0, 255, 255],
                [255, 255, 255, 255],
            ],
        )
        .unwrap()
    }

    /// A 16×16 buffer with varied, correlated color content.
    fn varied() -> PixelBuffer {
        let pixels: Vec<[u8; 4]> = (0..256u32)
            .map(|i| {
                let r = (i % 256) as u8;
                let g = ((i * 3 + 40) % 256) as u8;
                let b = ((i * 7) % 200) as u8;
                [r, g, b, 255]
            })
            .collect();
        PixelBuffer::from_pixels(16, 16, &pixels).unwrap()
    }

    // ========================================================================
    // GAP 1: Colorspace codec fidelity
    // ========================================================================

    /// If this breaks, it means: the LAB forward or inverse transform drifted
    /// (wrong white point, gamma threshold or cube-root branch), so a stretch
    /// in LAB shifts colors even where it should leave them alone.
    #[test]
    fn test_lab_round_trip_within_one() {
        let mut worst = 0;
        for r in (0..=255u8).step_by(15) {
            for g in (0..=255u8).step_by(15) {
                for b in (0..=255u8).step_by(15) {
                    let back = from_components(to_components([r, g, b], ColorSpace::Lab), ColorSpace::Lab);
                    for (o, n) in [r, g, b].iter().zip(back.iter()) {
                        worst = worst.max((*o as i32 - *n as i32).abs());
                    }
                }
            }
        }
        assert!(
            worst <= 1,
            "REGRESSION: RGB -> LAB -> RGB drifted by {} levels, expected at most 1",
            worst
        );
    }

    /// If this breaks, it means: an unknown colorspace code stopped falling
    /// back to RGB and either panics or picks an arbitrary codec.
    #[test]
    fn test_unknown_colorspace_is_rgb() {
        assert_eq!(ColorSpace::from_code("not-a-space"), ColorSpace::Rgb);
        assert_eq!(ColorSpace::from_code(""), ColorSpace::Rgb);
        assert_eq!(ColorSpace::from_code("yBk"), ColorSpace::Ybk);
    }

    // ========================================================================
    // GAP 2: Stretch math
    // ========================================================================

    /// If this breaks, it means: the stretch no longer scales by
    /// `amount / sqrt(λ)`, or the projection and reprojection are not
    /// inverse to each other. The eight corners of a cube around 128 have a
    /// diagonal covariance with variance 2500·8/7 on every axis, so an
    /// amount equal to that standard deviation is a no-op.
    #[test]
    fn test_unit_scale_stretch_is_identity() {
        let mut pixels = Vec::new();
        for r in [78u8, 178] {
            for g in [78u8, 178] {
                for b in [78u8, 178] {
                    pixels.push([r, g, b, 255]);
                }
            }
        }
        let input = PixelBuffer::from_pixels(4, 2, &pixels).unwrap();
        let sigma = 50.0 * (8.0f64 / 7.0).sqrt();

        let out = decorrelation_stretch(&input, ColorSpace::Rgb, sigma);
        assert_eq!(
            out, input,
            "REGRESSION: stretch with amount = sqrt(eigenvalue) changed the image"
        );
    }

    /// If this breaks, it means: a zero-variance image reaches the eigen
    /// solver and either panics, produces NaN, or shifts the color. CRGB
    /// is included: its components drop brightness, which the stretch must
    /// restore from the source pixel.
    #[test]
    fn test_uniform_image_survives_every_colorspace() {
        for rgb in [[143, 91, 52], [0, 0, 0], [255, 255, 255], [17, 230, 120]] {
            let flat = PixelBuffer::from_pixel(7, 5, [rgb[0], rgb[1], rgb[2], 255]);
            for space in ColorSpace::ALL {
                let stats = compute_statistics(&ComponentTriple::from_buffer(&flat, space));
                assert!(stats.basis.is_fallback(), "{}: expected fallback basis", space);

                let out = decorrelation_stretch(&flat, space, 50.0);
                assert_eq!(
                    out, flat,
                    "REGRESSION: uniform {:?} changed color under {}",
                    rgb, space
                );
            }
        }
    }

    /// If this breaks, it means: the stretch stopped being a pure function
    /// (hidden state, uninitialized memory, or order-dependent sums), or it
    /// no longer does anything to a strongly colored image.
    #[test]
    fn test_primaries_scenario() {
        let input = primaries();
        let first = decorrelation_stretch(&input, ColorSpace::Rgb, 50.0);
        let second = decorrelation_stretch(&input, ColorSpace::Rgb, 50.0);

        assert_ne!(first, input, "REGRESSION: stretch was a no-op on the primaries");
        assert_eq!(first.as_bytes(), second.as_bytes(), "REGRESSION: stretch is not deterministic");
        assert!(first.pixels().all(|p| p[3] == 255));
    }

    /// If this breaks, it means: the stretch lost its decorrelating effect.
    /// After stretching, the covariance of the output should be far closer
    /// to diagonal than that of the strongly correlated input.
    #[test]
    fn test_stretch_decorrelates() {
        let input = varied();
        let before = compute_statistics(&ComponentTriple::from_buffer(&input, ColorSpace::Rgb));
        let out = decorrelation_stretch(&input, ColorSpace::Rgb, 40.0);
        let after = compute_statistics(&ComponentTriple::from_buffer(&out, ColorSpace::Rgb));

        let correlation = |s: &crate::stats::Statistics, i: usize, j: usize| {
            let c = s.covariance.0;
            (c[i][j] / (c[i][i] * c[j][j]).sqrt()).abs()
        };
        for (i, j) in [(0, 1), (0, 2), (1, 2)] {
            assert!(
                correlation(&after, i, j) < 0.2 || correlation(&after, i, j) < correlation(&before, i, j),
                "REGRESSION: channels {} and {} still correlated after stretch",
                i,
                j
            );
        }
    }

    // ========================================================================
    // GAP 3: Tonal stage neutrality and ordering
    // ========================================================================

    /// If this breaks, it means: a neutral knob is no longer a no-op (for
    /// example contrast pivoting off-center or saturation rounding gray).
    #[test]
    fn test_neutral_tonal_is_identity() {
        let input = varied();
        assert_eq!(
            apply_tonal_adjustments(&input, &ParameterSet::default()),
            input,
            "REGRESSION: neutral tonal parameters changed the image"
        );
    }

    /// If this breaks, it means: contrast pivots at 127 or 128 instead of the
    /// true midpoint, or rounding pushes mid-gray off by one.
    #[test]
    fn test_contrast_keeps_mid_gray() {
        let gray = PixelBuffer::from_pixel(3, 3, [128, 128, 128, 255]);
        for contrast in [-100.0, -50.0, 50.0, 100.0] {
            let params = ParameterSet::new().contrast(contrast);
            assert_eq!(
                apply_tonal_adjustments(&gray, &params).rgb(1, 1),
                [128, 128, 128],
                "REGRESSION: contrast {} moved mid-gray",
                contrast
            );
        }
    }

    /// If this breaks, it means: contrast runs before the shadow lift, which
    /// lets the lift brighten values that contrast already crushed.
    #[test]
    fn test_shadow_lift_precedes_contrast() {
        let dark = PixelBuffer::from_pixel(1, 1, [40, 40, 40, 255]);
        let params = ParameterSet::new().shadows(100.0).contrast(50.0);
        // lift: 40 · (1 + (1 - 40/128)) = 67.5; contrast 1.5 around 127.5: 37.5
        assert_eq!(apply_tonal_adjustments(&dark, &params).rgb(0, 0), [38, 38, 38]);
    }

    // ========================================================================
    // GAP 4: Relief maps
    // ========================================================================

    /// If this breaks, it means: the Sobel pass picks up the image border or
    /// a constant offset and marks edges on a flat image.
    #[test]
    fn test_flat_image_has_empty_edge_map() {
        let flat = PixelBuffer::from_pixel(10, 6, [12, 200, 99, 255]);
        for threshold in [0.0, 0.1, 0.5] {
            assert!(detect_edges(&flat, threshold).is_empty());
        }
    }

    /// If this breaks, it means: dilation with thickness 1 grows edges, or
    /// thickness 3 fails to cover the 4-neighbourhood of an isolated pixel.
    #[test]
    fn test_dilation_thickness() {
        let mut map = EdgeMap::zeros(Dimensions::new(5, 5));
        map.set(12, EDGE_ON);

        assert_eq!(map.dilate(1), map, "REGRESSION: thickness 1 changed the map");

        let grown = map.dilate(3);
        for (x, y) in [(2, 2), (1, 2), (3, 2), (2, 1), (2, 3)] {
            assert_eq!(grown.get(x, y), EDGE_ON, "({}, {}) not covered", x, y);
        }
    }

    /// If this breaks, it means: a relief sub-effect runs with its amount at
    /// zero, so the default pipeline is no longer the identity.
    #[test]
    fn test_relief_defaults_are_identity() {
        let input = varied();
        assert_eq!(apply_relief_enhancement(&input, &ParameterSet::default()).unwrap(), input);
    }

    // ========================================================================
    // GAP 5: Pipeline
    // ========================================================================

    /// If this breaks, it means: the default enhancer modifies images, which
    /// would make "reset all" in the host application non-neutral.
    #[test]
    fn test_default_pipeline_is_identity() {
        let input = varied();
        assert_eq!(Enhancer::default().process(&input).unwrap(), input);
    }

    /// If this breaks, it means: some stage stopped clamping and a channel
    /// wrapped around instead of saturating.
    #[test]
    fn test_extreme_settings_stay_in_range() {
        let input = varied();
        let enhancer = Enhancer::default()
            .dstretch(true)
            .colorspace(ColorSpace::Ybk)
            .stretch_amount(2.0)
            .exposure(100.0)
            .brightness(100.0)
            .contrast(100.0)
            .saturation(100.0)
            .sharpness(100.0)
            .normal_strength(100.0)
            .light_intensity(100.0)
            .edge_strength(5.0)
            .edge_thickness(4)
            .directional_sharpen(100.0);
        let out = enhancer.process(&input).unwrap();
        assert_eq!(out.dimensions(), input.dimensions());
        assert!(out.pixels().all(|p| p[3] == 255));
    }
}
