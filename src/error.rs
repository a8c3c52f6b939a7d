use dstretch_core::EnhanceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Enhancement error: {0}")]
    Enhance(#[from] EnhanceError),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Parameter file error: {0}")]
    Params(String),

    #[error("Render task failed: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported PNG layout: {0}")]
    Unsupported(String),

    #[error("Image too large: {width}x{height}")]
    TooLarge { width: u32, height: u32 },

    #[error("Invalid pixel data: {0}")]
    Buffer(#[from] EnhanceError),
}

impl From<png::DecodingError> for ImageError {
    fn from(e: png::DecodingError) -> Self {
        ImageError::PngDecode(e.to_string())
    }
}

impl From<png::EncodingError> for ImageError {
    fn from(e: png::EncodingError) -> Self {
        ImageError::PngEncode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dstretch_core::Dimensions;

    #[test]
    fn test_app_error_unknown_preset() {
        let error = AppError::UnknownPreset("sepia".to_string());
        assert_eq!(error.to_string(), "Unknown preset: sepia");
    }

    #[test]
    fn test_app_error_params() {
        let error = AppError::Params("missing field".to_string());
        assert_eq!(error.to_string(), "Parameter file error: missing field");
    }

    #[test]
    fn test_app_error_worker() {
        let error = AppError::Worker("task panicked".to_string());
        assert_eq!(error.to_string(), "Render task failed: task panicked");
    }

    #[test]
    fn test_image_error_decode() {
        let error = ImageError::PngDecode("bad signature".to_string());
        assert_eq!(error.to_string(), "PNG decode error: bad signature");
    }

    #[test]
    fn test_image_error_too_large() {
        let error = ImageError::TooLarge {
            width: 70000,
            height: 70000,
        };
        assert_eq!(error.to_string(), "Image too large: 70000x70000");
    }

    #[test]
    fn test_app_error_from_enhance_error() {
        let enhance = EnhanceError::DimensionMismatch {
            expected: Dimensions::new(4, 4),
            actual: Dimensions::new(4, 3),
        };
        let app: AppError = enhance.into();
        assert_eq!(
            app.to_string(),
            "Enhancement error: dimension mismatch: expected 4x4, got 4x3"
        );
    }

    #[test]
    fn test_app_error_from_image_error() {
        let app: AppError = ImageError::Unsupported("16-bit palette".to_string()).into();
        match app {
            AppError::Image(_) => {}
            _ => panic!("Expected Image variant"),
        }
    }
}
