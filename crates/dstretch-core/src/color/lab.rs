//! CIE L*a*b* and its cylindrical LCh form.
//!
//! sRGB → linear → XYZ (D65) → L*a*b*, with the inverse as the exact
//! algebraic reverse. The constants are the four-decimal sRGB matrices and
//! the classic 0.008856 / 7.787 piecewise cube root.

use super::lut::{linear_to_srgb, srgb_to_linear};

/// D65 reference white, XYZ scaled to Y = 100.
const WHITE_X: f64 = 95.047;
const WHITE_Y: f64 = 100.0;
const WHITE_Z: f64 = 108.883;

/// Cube-root knee of the L*a*b* transfer function.
const EPSILON: f64 = 0.008856;
/// Slope of the linear segment below the knee.
const LINEAR_SLOPE: f64 = 7.787;
const LINEAR_OFFSET: f64 = 16.0 / 116.0;

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        LINEAR_SLOPE * t + LINEAR_OFFSET
    }
}

#[inline]
fn lab_f_inv(t: f64) -> f64 {
    let cubed = t * t * t;
    if cubed > EPSILON {
        cubed
    } else {
        (t - LINEAR_OFFSET) / LINEAR_SLOPE
    }
}

/// Convert an 8-bit sRGB pixel to `[L, a, b]`.
pub fn rgb_to_lab(rgb: [u8; 3]) -> [f64; 3] {
    let r = srgb_to_linear(rgb[0]);
    let g = srgb_to_linear(rgb[1]);
    let b = srgb_to_linear(rgb[2]);

    let x = (r * 0.4124 + g * 0.3576 + b * 0.1805) * 100.0 / WHITE_X;
    let y = (r * 0.2126 + g * 0.7152 + b * 0.0722) * 100.0 / WHITE_Y;
    let z = (r * 0.0193 + g * 0.1192 + b * 0.9505) * 100.0 / WHITE_Z;

    let fx = lab_f(x);
    let fy = lab_f(y);
    let fz = lab_f(z);

    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// Convert `[L, a, b]` back to unclamped RGB on the 0..255 scale.
pub fn lab_to_rgb(lab: [f64; 3]) -> [f64; 3] {
    let fy = (lab[0] + 16.0) / 116.0;
    let fx = lab[1] / 500.0 + fy;
    let fz = fy - lab[2] / 200.0;

    let x = lab_f_inv(fx) * WHITE_X / 100.0;
    let y = lab_f_inv(fy) * WHITE_Y / 100.0;
    let z = lab_f_inv(fz) * WHITE_Z / 100.0;

    let r = x * 3.2406 + y * -1.5372 + z * -0.4986;
    let g = x * -0.9689 + y * 1.8758 + z * 0.0415;
    let b = x * 0.0557 + y * -0.2040 + z * 1.0570;

    [
        linear_to_srgb(r) * 255.0,
        linear_to_srgb(g) * 255.0,
        linear_to_srgb(b) * 255.0,
    ]
}

/// Convert an 8-bit sRGB pixel to `[L, C, H]` with H in degrees, `[0, 360)`.
pub fn rgb_to_lch(rgb: [u8; 3]) -> [f64; 3] {
    let [l, a, b] = rgb_to_lab(rgb);
    let c = (a * a + b * b).sqrt();
    let mut h = b.atan2(a).to_degrees();
    if h < 0.0 {
        h += 360.0;
    }
    if h >= 360.0 {
        h -= 360.0;
    }
    [l, c, h]
}

/// Convert `[L, C, H]` back to unclamped RGB on the 0..255 scale.
pub fn lch_to_rgb(lch: [f64; 3]) -> [f64; 3] {
    let [l, c, h] = lch;
    let radians = h.to_radians();
    lab_to_rgb([l, c * radians.cos(), c * radians.sin()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_white_and_black() {
        let white = rgb_to_lab([255, 255, 255]);
        assert!(approx_eq(white[0], 100.0, 0.01), "L(white) = {}", white[0]);
        assert!(approx_eq(white[1], 0.0, 0.05));
        assert!(approx_eq(white[2], 0.0, 0.05));

        let black = rgb_to_lab([0, 0, 0]);
        assert!(approx_eq(black[0], 0.0, 1e-9));
    }

    #[test]
    fn test_matches_palette_crate() {
        use palette::{IntoColor, Lab, LinSrgb, Srgb};

        let test_colors = [
            [255u8, 0, 0],
            [0, 255, 0],
            [0, 0, 255],
            [128, 128, 128],
            [200, 120, 60],
            [12, 40, 30],
        ];

        for rgb in test_colors {
            let ours = rgb_to_lab(rgb);
            let linear: LinSrgb = Srgb::new(
                rgb[0] as f32 / 255.0,
                rgb[1] as f32 / 255.0,
                rgb[2] as f32 / 255.0,
            )
            .into_linear();
            let theirs: Lab = linear.into_color();

            assert!(
                approx_eq(ours[0], theirs.l as f64, 0.5),
                "L mismatch for {rgb:?}: ours={}, palette={}",
                ours[0],
                theirs.l
            );
            assert!(
                approx_eq(ours[1], theirs.a as f64, 0.5),
                "a mismatch for {rgb:?}: ours={}, palette={}",
                ours[1],
                theirs.a
            );
            assert!(
                approx_eq(ours[2], theirs.b as f64, 0.5),
                "b mismatch for {rgb:?}: ours={}, palette={}",
                ours[2],
                theirs.b
            );
        }
    }

    #[test]
    fn test_lch_hue_range() {
        for rgb in [[255u8, 0, 0], [0, 255, 0], [0, 0, 255], [0, 255, 255], [90, 90, 90]] {
            let [_, c, h] = rgb_to_lch(rgb);
            assert!(c >= 0.0);
            assert!((0.0..360.0).contains(&h), "hue {h} out of range for {rgb:?}");
        }
    }

    #[test]
    fn test_lch_blue_hue_is_negative_b_quadrant() {
        // sRGB blue has a strongly negative b*, so its hue lands past 270 degrees
        let [_, _, h] = rgb_to_lch([0, 0, 255]);
        assert!(h > 270.0 && h < 360.0, "blue hue {h}");
    }

    #[test]
    fn test_lch_round_trip() {
        for rgb in [[200u8, 30, 90], [10, 200, 40], [250, 250, 5], [64, 64, 64]] {
            let back = lch_to_rgb(rgb_to_lch(rgb));
            for ch in 0..3 {
                assert!(
                    approx_eq(back[ch], rgb[ch] as f64, 0.6),
                    "LCh round trip drifted for {rgb:?}: {back:?}"
                );
            }
        }
    }
}
