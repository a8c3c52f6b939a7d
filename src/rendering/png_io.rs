//! PNG decoding to RGBA8 and encoding from it.

use crate::error::ImageError;
use dstretch_core::PixelBuffer;
use std::io::Cursor;
use std::path::Path;

/// Upper bound on decoded image memory (512 MiB, about 130 megapixels RGBA)
pub const MAX_DECODED_BYTES: usize = 512 * 1024 * 1024;

/// Decode a PNG into an RGBA8 pixel buffer.
///
/// Palette, grayscale, low bit-depth and 16-bit inputs are expanded; images
/// without alpha get an opaque alpha channel.
pub fn decode_png(data: &[u8]) -> Result<PixelBuffer, ImageError> {
    let mut decoder = png::Decoder::new_with_limits(
        Cursor::new(data),
        png::Limits {
            bytes: MAX_DECODED_BYTES,
        },
    );
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    if u64::from(width) * u64::from(height) * 4 > MAX_DECODED_BYTES as u64 {
        return Err(ImageError::TooLarge { width, height });
    }

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != png::BitDepth::Eight {
        return Err(ImageError::Unsupported(format!(
            "bit depth {:?} after expansion",
            info.bit_depth
        )));
    }

    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(ImageError::Unsupported(
                "indexed color after expansion".to_string(),
            ))
        }
    };

    tracing::debug!(
        width = info.width,
        height = info.height,
        color_type = ?info.color_type,
        "Decoded PNG"
    );
    Ok(PixelBuffer::new(info.width, info.height, rgba)?)
}

/// Encode an RGBA8 pixel buffer as PNG.
pub fn encode_png(image: &PixelBuffer) -> Result<Vec<u8>, ImageError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Default);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.as_bytes())?;
    }
    Ok(buf.into_inner())
}

/// Read and decode a PNG file.
pub fn read_png(path: &Path) -> Result<PixelBuffer, crate::error::AppError> {
    let data = std::fs::read(path)?;
    Ok(decode_png(&data)?)
}

/// Encode and write a PNG file.
pub fn write_png(path: &Path, image: &PixelBuffer) -> Result<(), crate::error::AppError> {
    let data = encode_png(image)?;
    std::fs::write(path, data)?;
    Ok(())
}
