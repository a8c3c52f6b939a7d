//! Test images and temporary files.

use dstretch::rendering::encode_png;
use dstretch_core::PixelBuffer;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Reddish pigment strokes on a tan rock background, with mild texture.
pub fn rock_art(width: u32, height: u32) -> PixelBuffer {
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let texture = ((x * 7 + y * 13) % 11) as u8;
            let stroke = (x + y) % 9 < 2;
            let px = if stroke {
                [168 + texture, 118 + texture, 96 + texture, 255]
            } else {
                [172 + texture, 140 + texture, 110 + texture, 255]
            };
            pixels.push(px);
        }
    }
    PixelBuffer::from_pixels(width, height, &pixels).unwrap()
}

/// Uniform random RGBA noise from a fixed seed.
pub fn random_image(width: u32, height: u32, seed: u64) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<u8> = (0..width * height * 4).map(|_| rng.gen()).collect();
    PixelBuffer::new(width, height, data).unwrap()
}

/// Flat gray image with a raised bright square in the middle.
pub fn raised_square(size: u32) -> PixelBuffer {
    let lo = size / 4;
    let hi = size - size / 4;
    let pixels: Vec<[u8; 4]> = (0..size * size)
        .map(|i| {
            let (x, y) = (i % size, i / size);
            if (lo..hi).contains(&x) && (lo..hi).contains(&y) {
                [200, 200, 200, 255]
            } else {
                [60, 60, 60, 255]
            }
        })
        .collect();
    PixelBuffer::from_pixels(size, size, &pixels).unwrap()
}

/// Write `image` as a PNG into a fresh temp dir. Keep the TempDir alive.
pub fn write_temp_png(image: &PixelBuffer, name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, encode_png(image).unwrap()).unwrap();
    (dir, path)
}
