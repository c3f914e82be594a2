//! Crop compositing.
//!
//! Maps a percentage-space crop rectangle onto the source image's
//! native pixel grid and copies that sub-rectangle 1:1 into a new
//! image. No resampling beyond the implicit rect copy.

use image::RgbaImage;

use crate::types::{CropRect, EditError};

/// A crop rectangle resolved to source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Resolve a percent-space rect against native dimensions.
///
/// Each edge is `round(pct / 100 * extent)`. Rounding can push the far
/// edge one pixel past the source, so width/height are clamped back so
/// the rect always lies entirely within
/// `[0, native_width] x [0, native_height]`.
#[must_use]
pub fn to_pixel_rect(rect: &CropRect, native_width: u32, native_height: u32) -> PixelRect {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let resolve = |pct: f64, extent: u32| -> u32 {
        ((pct / 100.0 * f64::from(extent)).round().max(0.0) as u32).min(extent)
    };

    let x = resolve(rect.x, native_width);
    let y = resolve(rect.y, native_height);
    let width = resolve(rect.width, native_width).min(native_width - x);
    let height = resolve(rect.height, native_height).min(native_height - y);
    PixelRect {
        x,
        y,
        width,
        height,
    }
}

/// Crop a decoded image to the given percent-space rect.
///
/// The output dimensions are the resolved pixel rect's.
#[must_use]
pub fn apply(source: &RgbaImage, rect: &CropRect) -> RgbaImage {
    let px = to_pixel_rect(rect, source.width(), source.height());
    image::imageops::crop_imm(source, px.x, px.y, px.width, px.height).to_image()
}

/// Decode raw image bytes and crop.
///
/// # Errors
///
/// Returns [`EditError::EmptyInput`] for empty input and
/// [`EditError::Decode`] if the bytes are not a decodable image.
pub fn apply_to_bytes(bytes: &[u8], rect: &CropRect) -> Result<RgbaImage, EditError> {
    if bytes.is_empty() {
        return Err(EditError::EmptyInput);
    }
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    Ok(apply(&decoded, rect))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn quarter_crop_of_even_image() {
        let rect = CropRect {
            x: 25.0,
            y: 25.0,
            width: 50.0,
            height: 50.0,
        };
        let px = to_pixel_rect(&rect, 400, 200);
        assert_eq!(
            px,
            PixelRect {
                x: 100,
                y: 50,
                width: 200,
                height: 100,
            },
        );
    }

    #[test]
    fn rounding_never_escapes_the_source() {
        // Sweep a grid of valid rects against awkward odd dimensions;
        // the resolved rect must stay inside the image every time.
        for (w, h) in [(3_u32, 3_u32), (7, 5), (1919, 1079), (1, 1)] {
            for x10 in 0..=9 {
                for y10 in 0..=9 {
                    let x = f64::from(x10) * 10.0;
                    let y = f64::from(y10) * 10.0;
                    let rect = CropRect {
                        x,
                        y,
                        width: (100.0 - x).max(CropRect::MIN_EXTENT),
                        height: (100.0 - y).max(CropRect::MIN_EXTENT),
                    };
                    let px = to_pixel_rect(&rect, w, h);
                    assert!(px.x + px.width <= w, "rect {rect:?} escapes width {w}");
                    assert!(px.y + px.height <= h, "rect {rect:?} escapes height {h}");
                }
            }
        }
    }

    #[test]
    fn output_dimensions_match_resolved_rect() {
        let src = RgbaImage::from_fn(40, 30, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255])
        });
        let rect = CropRect {
            x: 10.0,
            y: 10.0,
            width: 80.0,
            height: 80.0,
        };
        let out = apply(&src, &rect);
        assert_eq!(out.dimensions(), (32, 24));
    }

    #[test]
    fn copy_is_one_to_one() {
        let src = RgbaImage::from_fn(10, 10, |x, y| {
            image::Rgba([(x * 10) as u8, (y * 10) as u8, 0, 255])
        });
        let rect = CropRect {
            x: 20.0,
            y: 30.0,
            width: 50.0,
            height: 40.0,
        };
        let out = apply(&src, &rect);
        // Output (0,0) is source (2,3), untouched by any resampling.
        assert_eq!(out.get_pixel(0, 0), src.get_pixel(2, 3));
        assert_eq!(out.get_pixel(4, 3), src.get_pixel(6, 6));
    }

    #[test]
    fn full_frame_crop_is_the_whole_image() {
        let rect = CropRect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        };
        let px = to_pixel_rect(&rect, 640, 480);
        assert_eq!(
            px,
            PixelRect {
                x: 0,
                y: 0,
                width: 640,
                height: 480,
            },
        );
    }

    #[test]
    fn empty_and_corrupt_bytes_error() {
        let rect = CropRect::default();
        assert!(matches!(
            apply_to_bytes(&[], &rect),
            Err(EditError::EmptyInput)
        ));
        assert!(matches!(
            apply_to_bytes(&[1, 2, 3], &rect),
            Err(EditError::Decode(_))
        ));
    }
}
