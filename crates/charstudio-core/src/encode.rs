//! Image encoding and data-URI conversion.
//!
//! The model API and the history log both traffic in `data:` URIs, and
//! export re-encodes the working image as PNG (share) or JPEG (save, at
//! one of three quality tiers). Everything here is byte-in/byte-out;
//! browser object URLs are a `charstudio-io` concern.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{DynamicImage, RgbaImage};

use crate::types::{EditError, ImageResource};

/// JPEG export quality tiers offered by the save menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    /// Quality 95.
    High,
    /// Quality 75.
    Medium,
    /// Quality 50.
    Low,
}

impl QualityTier {
    /// All tiers, best first.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// The JPEG encoder quality setting for this tier.
    #[must_use]
    pub const fn quality(self) -> u8 {
        match self {
            Self::High => 95,
            Self::Medium => 75,
            Self::Low => 50,
        }
    }

    /// Display label for the save menu.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Render bytes as a base64 `data:` URI with the given MIME type.
#[must_use]
pub fn to_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", BASE64.encode(bytes))
}

/// Render an [`ImageResource`] as a data URI.
#[must_use]
pub fn resource_to_data_uri(resource: &ImageResource) -> String {
    to_data_uri(&resource.mime_type, &resource.bytes)
}

/// Parse a base64 `data:` URI back into bytes plus MIME type.
///
/// Only the `data:<mime>;base64,<payload>` form is accepted; that is
/// the only form this application ever produces or receives.
///
/// # Errors
///
/// Returns [`EditError::DataUri`] when the scheme, the `;base64,`
/// marker, or the payload encoding is malformed.
pub fn from_data_uri(uri: &str) -> Result<ImageResource, EditError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| EditError::DataUri("missing data: scheme".to_string()))?;
    let (mime_type, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| EditError::DataUri("missing ;base64, marker".to_string()))?;
    let bytes = BASE64
        .decode(payload)
        .map_err(|e| EditError::DataUri(e.to_string()))?;
    Ok(ImageResource::new(bytes, mime_type))
}

/// Encode a decoded image as PNG bytes.
///
/// # Errors
///
/// Returns [`EditError::Encode`] if the PNG encoder fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, EditError> {
    let mut out = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut out),
            image::ImageFormat::Png,
        )
        .map_err(|e| EditError::Encode(e.to_string()))?;
    Ok(out)
}

/// Encode a decoded image as JPEG bytes at the given quality tier.
///
/// JPEG has no alpha channel; the image is flattened to RGB first
/// (transparent pixels keep their color channels, matching what a
/// canvas `toDataURL("image/jpeg")` export does).
///
/// # Errors
///
/// Returns [`EditError::Encode`] if the JPEG encoder fails.
pub fn encode_jpeg(image: &RgbaImage, tier: QualityTier) -> Result<Vec<u8>, EditError> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut out = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, tier.quality());
    rgb.write_with_encoder(encoder)
        .map_err(|e| EditError::Encode(e.to_string()))?;
    Ok(out)
}

/// Encode as PNG and wrap in a data URI, the form the working image and
/// history entries are stored in.
///
/// # Errors
///
/// Returns [`EditError::Encode`] if PNG encoding fails.
pub fn to_png_data_uri(image: &RgbaImage) -> Result<String, EditError> {
    Ok(to_data_uri("image/png", &encode_png(image)?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn data_uri_round_trip() {
        let resource = ImageResource::new(vec![1, 2, 3, 250], "image/png");
        let uri = resource_to_data_uri(&resource);
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(from_data_uri(&uri).unwrap(), resource);
    }

    #[test]
    fn malformed_uris_are_rejected() {
        for bad in [
            "image/png;base64,AAAA",
            "data:image/png,notbase64marker",
            "data:image/png;base64,###",
        ] {
            assert!(matches!(from_data_uri(bad), Err(EditError::DataUri(_))));
        }
    }

    #[test]
    fn png_output_decodes_back_identically() {
        let src = checker(8, 6);
        let bytes = encode_png(&src).unwrap();
        let back = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(back.as_raw(), src.as_raw());
    }

    #[test]
    fn jpeg_output_is_decodable_at_every_tier() {
        let src = checker(16, 16);
        for tier in QualityTier::ALL {
            let bytes = encode_jpeg(&src, tier).unwrap();
            let back = image::load_from_memory(&bytes).unwrap();
            assert_eq!(back.width(), 16);
            assert_eq!(back.height(), 16);
        }
    }

    #[test]
    fn higher_tiers_do_not_shrink_the_file() {
        // Quality 95 should never produce fewer bytes than quality 50
        // for the same busy image.
        let src = RgbaImage::from_fn(64, 64, |x, y| {
            image::Rgba([(x * 17 % 256) as u8, (y * 31 % 256) as u8, 99, 255])
        });
        let high = encode_jpeg(&src, QualityTier::High).unwrap().len();
        let low = encode_jpeg(&src, QualityTier::Low).unwrap().len();
        assert!(high >= low);
    }

    #[test]
    fn png_data_uri_parses_back_to_png_bytes() {
        let src = checker(4, 4);
        let uri = to_png_data_uri(&src).unwrap();
        let resource = from_data_uri(&uri).unwrap();
        assert_eq!(resource.mime_type, "image/png");
        let back = image::load_from_memory(&resource.bytes).unwrap().to_rgba8();
        assert_eq!(back.as_raw(), src.as_raw());
    }

    #[test]
    fn tier_quality_values() {
        assert_eq!(QualityTier::High.quality(), 95);
        assert_eq!(QualityTier::Medium.quality(), 75);
        assert_eq!(QualityTier::Low.quality(), 50);
    }
}
