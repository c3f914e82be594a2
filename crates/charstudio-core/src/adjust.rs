//! Non-destructive adjustment compositing.
//!
//! Applies brightness, contrast, and saturation -- in that fixed order
//! -- to a decoded image, producing a new flattened image at the
//! source's native dimensions. Semantics match the CSS `filter`
//! functions the preview uses, so the applied result is pixel-faithful
//! to what the user saw:
//!
//! - `brightness(p%)`: channel * p/100
//! - `contrast(p%)`:   (channel - 127.5) * p/100 + 127.5
//! - `saturate(p%)`:   luma + (channel - luma) * p/100, Rec.709 luma
//!
//! Alpha is untouched. Channels are computed in f32 and clamped to
//! [0, 255] once at the end.

use image::{Rgba, RgbaImage};

use crate::types::{Adjustments, EditError};

/// Rec.709 luma weights, as used by the CSS `saturate()` filter.
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

/// Apply an adjustment triple to a decoded image.
///
/// Returns a new image of the same dimensions. The identity triple
/// `{100, 100, 100}` returns a pixel-identical copy.
#[must_use]
pub fn apply(source: &RgbaImage, adjustments: Adjustments) -> RgbaImage {
    if adjustments.is_identity() {
        return source.clone();
    }

    let brightness = f32::from(adjustments.brightness) / 100.0;
    let contrast = f32::from(adjustments.contrast) / 100.0;
    let saturation = f32::from(adjustments.saturation) / 100.0;

    let mut out = RgbaImage::new(source.width(), source.height());
    for (dst, src) in out.pixels_mut().zip(source.pixels()) {
        let [r, g, b, a] = src.0;

        // Brightness, then contrast, per channel.
        let stage = |v: u8| -> f32 {
            let v = f32::from(v) * brightness;
            (v - 127.5).mul_add(contrast, 127.5)
        };
        let (r, g, b) = (stage(r), stage(g), stage(b));

        // Saturation: interpolate between the luma gray and the channel.
        let luma = LUMA_B.mul_add(b, LUMA_R.mul_add(r, LUMA_G * g));
        let saturate = |v: f32| (v - luma).mul_add(saturation, luma);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let quantize = |v: f32| v.round().clamp(0.0, 255.0) as u8;

        *dst = Rgba([
            quantize(saturate(r)),
            quantize(saturate(g)),
            quantize(saturate(b)),
            a,
        ]);
    }
    out
}

/// Decode raw image bytes and apply adjustments.
///
/// # Errors
///
/// Returns [`EditError::EmptyInput`] if `bytes` is empty and
/// [`EditError::Decode`] if the bytes are not a decodable image. The
/// caller's prior state is unaffected on error.
pub fn apply_to_bytes(bytes: &[u8], adjustments: Adjustments) -> Result<RgbaImage, EditError> {
    if bytes.is_empty() {
        return Err(EditError::EmptyInput);
    }
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    Ok(apply(&decoded, adjustments))
}
