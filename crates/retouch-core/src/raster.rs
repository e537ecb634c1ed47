//! The working raster type and pixel-level operations.
//!
//! [`Bitmap`] is the RGB8 pixel buffer every layer and snapshot in the editor
//! is made of. Scaling, quarter-turn rotation, and Gaussian blur delegate to
//! the `image` crate; clipped blit and region capture are implemented here
//! because they need signed, possibly out-of-bounds rectangles (committed
//! blur areas can start outside the canvas when a drag leaves it).

use crate::geometry::{Rect, RotationAngle, Size};

/// An RGB8 pixel buffer in row-major order (3 bytes per pixel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB pixel data. Length is width * height * 3.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap from dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width * height * 3) as usize,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a bitmap filled with a single color.
    pub fn filled(size: Size, rgb: [u8; 3]) -> Self {
        let count = (size.width * size.height) as usize;
        let mut pixels = Vec::with_capacity(count * 3);
        for _ in 0..count {
            pixels.extend_from_slice(&rgb);
        }
        Self {
            width: size.width,
            height: size.height,
            pixels,
        }
    }

    /// Create a bitmap from an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an `image::RgbImage` for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// The bitmap dimensions as a [`Size`].
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True if this bitmap covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Copy `src` into this bitmap with its top-left corner at (x, y).
    ///
    /// The source is clipped against this bitmap's bounds; offsets may be
    /// negative or beyond the edge, in which case only the overlapping
    /// portion (possibly nothing) is copied.
    pub fn blit(&mut self, src: &Bitmap, x: i32, y: i32) {
        let dst_w = self.width as i64;
        let dst_h = self.height as i64;

        for row in 0..src.height as i64 {
            let dy = y as i64 + row;
            if dy < 0 || dy >= dst_h {
                continue;
            }

            // Horizontal clip for this row
            let src_start = (-(x as i64)).clamp(0, src.width as i64);
            let src_end = (dst_w - x as i64).clamp(0, src.width as i64);
            if src_start >= src_end {
                continue;
            }

            let dx = x as i64 + src_start;
            let src_idx = ((row * src.width as i64 + src_start) * 3) as usize;
            let dst_idx = ((dy * dst_w + dx) * 3) as usize;
            let len = ((src_end - src_start) * 3) as usize;

            self.pixels[dst_idx..dst_idx + len]
                .copy_from_slice(&src.pixels[src_idx..src_idx + len]);
        }
    }

    /// Copy out the pixels under a rectangle, clipped to the bitmap bounds.
    ///
    /// The rectangle is normalized first, so rects with negative dimensions
    /// capture from their true top-left corner. Returns `None` if the
    /// clipped region is empty.
    pub fn capture(&self, rect: Rect) -> Option<Bitmap> {
        let rect = rect.normalized();
        if rect.is_empty() || self.is_empty() {
            return None;
        }

        let left = rect.x.clamp(0, self.width as i32);
        let top = rect.y.clamp(0, self.height as i32);
        let right = (rect.x + rect.width).clamp(0, self.width as i32);
        let bottom = (rect.y + rect.height).clamp(0, self.height as i32);

        let out_w = (right - left) as u32;
        let out_h = (bottom - top) as u32;
        if out_w == 0 || out_h == 0 {
            return None;
        }

        let mut pixels = Vec::with_capacity((out_w * out_h * 3) as usize);
        for row in 0..out_h {
            let src_y = top as u32 + row;
            let start = ((src_y * self.width + left as u32) * 3) as usize;
            let len = (out_w * 3) as usize;
            pixels.extend_from_slice(&self.pixels[start..start + len]);
        }

        Some(Bitmap::new(out_w, out_h, pixels))
    }

    /// Scale to exact dimensions using Triangle (bilinear) filtering.
    ///
    /// Returns a clone when the dimensions already match, or `None` when the
    /// pixel buffer is inconsistent with its dimensions.
    pub fn scaled(&self, width: u32, height: u32) -> Option<Bitmap> {
        if width == 0 || height == 0 {
            return None;
        }
        if self.width == width && self.height == height {
            return Some(self.clone());
        }

        let rgb = self.to_rgb_image()?;
        let resized =
            image::imageops::resize(&rgb, width, height, image::imageops::FilterType::Triangle);
        Some(Bitmap::from_rgb_image(resized))
    }

    /// Rotate by a quarter-turn angle. Lossless: pixels are only permuted.
    pub fn rotated(&self, angle: RotationAngle) -> Option<Bitmap> {
        if angle == RotationAngle::Deg0 {
            return Some(self.clone());
        }

        let rgb = self.to_rgb_image()?;
        let rotated = match angle {
            RotationAngle::Deg0 => rgb,
            RotationAngle::Deg90 => image::imageops::rotate90(&rgb),
            RotationAngle::Deg180 => image::imageops::rotate180(&rgb),
            RotationAngle::Deg270 => image::imageops::rotate270(&rgb),
        };
        Some(Bitmap::from_rgb_image(rotated))
    }

    /// Apply a Gaussian blur with the given sigma.
    pub fn blurred(&self, sigma: f32) -> Option<Bitmap> {
        if sigma <= 0.0 {
            return Some(self.clone());
        }
        let rgb = self.to_rgb_image()?;
        Some(Bitmap::from_rgb_image(image::imageops::blur(&rgb, sigma)))
    }
}
