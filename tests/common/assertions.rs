//! Assertion helpers for tests.

use dstretch_core::PixelBuffer;
use pretty_assertions::assert_eq;

/// Assert two images have the same dimensions and alpha channel
pub fn assert_same_shape_and_alpha(a: &PixelBuffer, b: &PixelBuffer) {
    assert_eq!(a.dimensions(), b.dimensions(), "dimensions differ");
    let alpha_a: Vec<u8> = a.pixels().map(|p| p[3]).collect();
    let alpha_b: Vec<u8> = b.pixels().map(|p| p[3]).collect();
    assert_eq!(alpha_a, alpha_b, "alpha channel changed");
}

/// Assert bytes are a PNG file
pub fn assert_png_bytes(bytes: &[u8]) {
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG signature, got {:?}",
        &bytes[..8.min(bytes.len())]
    );
}

/// Mean per-channel standard deviation of the RGB channels
pub fn channel_spread(image: &PixelBuffer) -> [f64; 3] {
    let n = image.pixel_count() as f64;
    let mut sum = [0.0; 3];
    let mut sum_sq = [0.0; 3];
    for p in image.pixels() {
        for c in 0..3 {
            let v = p[c] as f64;
            sum[c] += v;
            sum_sq[c] += v * v;
        }
    }
    std::array::from_fn(|c| (sum_sq[c] / n - (sum[c] / n).powi(2)).max(0.0).sqrt())
}
