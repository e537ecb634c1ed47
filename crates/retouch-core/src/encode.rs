//! JPEG encoding for export.
//!
//! Whenever rotation or blur mode is exited the edited canvas is re-encoded
//! as a JPEG and becomes the new working image. Encoding uses the `image`
//! crate's JPEG encoder with a fixed export quality; the host can still ask
//! for other qualities through [`encode_jpeg`] directly.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;

use crate::raster::Bitmap;

/// Fixed quality used for mode-exit exports.
pub const EXPORT_QUALITY: u8 = 90;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match the bitmap dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed.
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode a bitmap to JPEG bytes.
///
/// # Arguments
///
/// * `bitmap` - RGB bitmap to encode
/// * `quality` - JPEG quality, clamped to 1-100
///
/// # Errors
///
/// Returns an error if the bitmap has zero dimensions, if its pixel buffer
/// length is inconsistent, or if the encoder fails.
pub fn encode_jpeg(bitmap: &Bitmap, quality: u8) -> Result<Vec<u8>, EncodeError> {
    if bitmap.width == 0 || bitmap.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: bitmap.width,
            height: bitmap.height,
        });
    }

    let expected_len = (bitmap.width as usize) * (bitmap.height as usize) * 3;
    if bitmap.pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: bitmap.pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(
            &bitmap.pixels,
            bitmap.width,
            bitmap.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    #[test]
    fn test_encode_jpeg_basic() {
        let bitmap = Bitmap::filled(Size::new(100, 100), [128, 128, 128]);

        let jpeg = encode_jpeg(&bitmap, 90).unwrap();

        // SOI marker at the start, EOI marker at the end
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        let len = jpeg.len();
        assert_eq!(&jpeg[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let bitmap = Bitmap::filled(Size::new(10, 10), [128, 128, 128]);

        assert!(encode_jpeg(&bitmap, 0).is_ok());
        assert!(encode_jpeg(&bitmap, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_quality_affects_size() {
        // A gradient compresses differently at different qualities
        let mut pixels = Vec::with_capacity(64 * 64 * 3);
        for y in 0..64u32 {
            for x in 0..64u32 {
                pixels.push((x * 4) as u8);
                pixels.push((y * 4) as u8);
                pixels.push(((x + y) * 2) as u8);
            }
        }
        let bitmap = Bitmap::new(64, 64, pixels);

        let low = encode_jpeg(&bitmap, 10).unwrap();
        let high = encode_jpeg(&bitmap, 95).unwrap();
        assert!(high.len() > low.len());
    }

    #[test]
    fn test_encode_jpeg_zero_dimensions() {
        let bitmap = Bitmap {
            width: 0,
            height: 100,
            pixels: vec![],
        };
        let result = encode_jpeg(&bitmap, 90);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_jpeg_mismatched_buffer() {
        let bitmap = Bitmap {
            width: 100,
            height: 100,
            pixels: vec![0u8; 99 * 100 * 3],
        };
        let result = encode_jpeg(&bitmap, 90);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_single_pixel() {
        let bitmap = Bitmap::new(1, 1, vec![255, 0, 0]);
        let jpeg = encode_jpeg(&bitmap, EXPORT_QUALITY).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_decode_round_trip_dimensions() {
        let bitmap = Bitmap::filled(Size::new(40, 30), [100, 150, 200]);
        let jpeg = encode_jpeg(&bitmap, EXPORT_QUALITY).unwrap();

        let decoded = crate::decode::decode_image(&jpeg).unwrap();
        assert_eq!(decoded.width, 40);
        assert_eq!(decoded.height, 30);
    }
}
