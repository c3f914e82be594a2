//! Binary mask synthesis from a freehand paint layer.
//!
//! The editor's paint canvas accumulates translucent brush strokes in
//! its alpha channel. The model requires a hard mask: every painted
//! pixel becomes opaque white (regenerate), every untouched pixel
//! opaque black (preserve). No anti-aliasing survives binarization.

use image::{Rgba, RgbaImage};

use crate::types::EditError;

/// Convert a painted RGBA buffer into a strict two-level mask.
///
/// Single pass over the buffer: any pixel with non-zero alpha maps to
/// `(255, 255, 255, 255)`, all others to `(0, 0, 0, 255)`. The output
/// alpha channel is forced fully opaque in both cases.
///
/// # Errors
///
/// Returns [`EditError::MaskBuffer`] if `raw` is not exactly
/// `width * height * 4` bytes, or if the dimensions overflow.
pub fn synthesize(width: u32, height: u32, raw: &[u8]) -> Result<RgbaImage, EditError> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(EditError::MaskBuffer {
            expected: usize::MAX,
            actual: raw.len(),
            width,
            height,
        })?;
    if raw.len() != expected {
        return Err(EditError::MaskBuffer {
            expected,
            actual: raw.len(),
            width,
            height,
        });
    }

    let mut mask = RgbaImage::new(width, height);
    for (pixel, src) in mask.pixels_mut().zip(raw.chunks_exact(4)) {
        *pixel = if src[3] > 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        };
    }
    Ok(mask)
}

/// Binarize an already-decoded paint layer.
///
/// Convenience wrapper over [`synthesize`] for callers holding an
/// `RgbaImage` rather than a raw buffer.
///
/// # Errors
///
/// Propagates [`EditError::MaskBuffer`] (cannot occur for a well-formed
/// `RgbaImage`, but the size contract is checked regardless).
pub fn synthesize_image(painted: &RgbaImage) -> Result<RgbaImage, EditError> {
    synthesize(painted.width(), painted.height(), painted.as_raw())
}
