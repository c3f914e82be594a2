//! Shared types for the charstudio editing core.

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can reference decoded
/// raster data without depending on `image` directly.
pub use image::RgbaImage;

/// An opaque uploaded image: raw bytes plus the MIME type reported at
/// upload time. The bytes are never re-encoded while sitting in a slot;
/// they are forwarded to the model exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResource {
    /// Raw encoded image bytes (PNG, JPEG, BMP, WebP).
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
}

impl ImageResource {
    /// Create a new image resource.
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// Target width:height ratio requested for generated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1
    #[default]
    Square,
    /// 4:5
    Portrait,
    /// 16:9
    Widescreen,
    /// 2.39:1
    Anamorphic,
}

impl AspectRatio {
    /// All supported ratios, in display order.
    pub const ALL: [Self; 4] = [
        Self::Square,
        Self::Portrait,
        Self::Widescreen,
        Self::Anamorphic,
    ];

    /// The wire/display label, e.g. `"16:9"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait => "4:5",
            Self::Widescreen => "16:9",
            Self::Anamorphic => "2.39:1",
        }
    }

    /// Parse a stored label back into a ratio. Unknown labels fall back
    /// to [`AspectRatio::Square`] so stale persisted state stays usable.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|r| r.label() == label)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Brightness/contrast/saturation triple, each a percentage with 100 as
/// identity. Applied in that fixed order (conventional compositing
/// filter order, matching CSS `filter`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustments {
    /// Brightness percentage (0-200, 100 = unchanged).
    pub brightness: u16,
    /// Contrast percentage (0-200, 100 = unchanged).
    pub contrast: u16,
    /// Saturation percentage (0-200, 100 = unchanged).
    pub saturation: u16,
}

impl Adjustments {
    /// The identity triple `{100, 100, 100}`.
    pub const IDENTITY: Self = Self {
        brightness: 100,
        contrast: 100,
        saturation: 100,
    };

    /// Returns `true` if applying these adjustments would not change
    /// any pixel.
    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

impl Default for Adjustments {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Crop rectangle in percentage-of-image-bounds coordinates.
///
/// Invariants (maintained by [`crate::geometry`] during drags and
/// checked by [`CropRect::is_valid`]):
/// `0 <= x`, `0 <= y`, `x + width <= 100`, `y + height <= 100`,
/// `width >= MIN_EXTENT`, `height >= MIN_EXTENT`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge, percent of image width.
    pub x: f64,
    /// Top edge, percent of image height.
    pub y: f64,
    /// Width, percent of image width.
    pub width: f64,
    /// Height, percent of image height.
    pub height: f64,
}

impl CropRect {
    /// Minimum crop extent along either axis, in percent.
    pub const MIN_EXTENT: f64 = 10.0;

    /// Check the percent-space invariants.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width >= Self::MIN_EXTENT
            && self.height >= Self::MIN_EXTENT
            && self.x + self.width <= 100.0
            && self.y + self.height <= 100.0
    }
}

impl Default for CropRect {
    /// The editor's starting selection: centered, 80% of each axis.
    fn default() -> Self {
        Self {
            x: 10.0,
            y: 10.0,
            width: 80.0,
            height: 80.0,
        }
    }
}

/// Which editing tool is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// No editor open.
    #[default]
    None,
    /// Freehand mask painting for an AI edit.
    Mask,
    /// Brightness/contrast/saturation sliders.
    Adjust,
    /// Crop rectangle.
    Crop,
}

/// Transient editor state. Never persisted; reset on cancel or on a
/// successful apply.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditSession {
    /// Active tool.
    pub mode: EditMode,
    /// Prompt describing the masked edit (mask mode only).
    pub edit_prompt: String,
    /// Brush diameter in canvas pixels (mask mode only).
    pub brush_diameter: u32,
    /// Slider state for adjust mode.
    pub adjustments: Adjustments,
    /// Selection for crop mode.
    pub crop_rect: CropRect,
}

impl EditSession {
    /// Default brush diameter in pixels.
    pub const DEFAULT_BRUSH: u32 = 40;

    /// Open the editor with the given tool and fresh parameters.
    #[must_use]
    pub fn open(mode: EditMode) -> Self {
        Self {
            mode,
            brush_diameter: Self::DEFAULT_BRUSH,
            ..Self::default()
        }
    }

    /// Switch tools, keeping the brush size and edit prompt but
    /// resetting adjust/crop parameters that belong to other tools.
    pub fn switch_to(&mut self, mode: EditMode) {
        self.mode = mode;
        self.adjustments = Adjustments::IDENTITY;
        self.crop_rect = CropRect::default();
    }

    /// Close the editor and discard all parameters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Errors from local compositing, mask synthesis, and encoding.
///
/// Every variant is terminal to the current operation only: the prior
/// working image and edit session are left untouched by the caller.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Failed to decode the source image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The source bytes were empty.
    #[error("image data is empty")]
    EmptyInput,

    /// Paint buffer length does not match the stated dimensions.
    #[error("mask buffer is {actual} bytes, expected {expected} for {width}x{height}")]
    MaskBuffer {
        /// Expected length in bytes (`width * height * 4`).
        expected: usize,
        /// Actual buffer length.
        actual: usize,
        /// Stated width in pixels.
        width: u32,
        /// Stated height in pixels.
        height: u32,
    },

    /// Re-encoding the composited result failed.
    #[error("failed to encode image: {0}")]
    Encode(String),

    /// A data URI was malformed.
    #[error("malformed data URI: {0}")]
    DataUri(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_labels_round_trip() {
        for ratio in AspectRatio::ALL {
            assert_eq!(AspectRatio::from_label(ratio.label()), ratio);
        }
    }

    #[test]
    fn aspect_ratio_unknown_label_falls_back_to_square() {
        assert_eq!(AspectRatio::from_label("3:7"), AspectRatio::Square);
        assert_eq!(AspectRatio::from_label(""), AspectRatio::Square);
    }

    #[test]
    fn adjustments_identity() {
        assert!(Adjustments::IDENTITY.is_identity());
        assert!(Adjustments::default().is_identity());
        let brighter = Adjustments {
            brightness: 120,
            ..Adjustments::IDENTITY
        };
        assert!(!brighter.is_identity());
    }

    #[test]
    fn default_crop_rect_is_valid() {
        assert!(CropRect::default().is_valid());
    }

    #[test]
    fn crop_rect_rejects_out_of_bounds() {
        let rect = CropRect {
            x: 50.0,
            y: 0.0,
            width: 60.0,
            height: 50.0,
        };
        assert!(!rect.is_valid());
    }

    #[test]
    fn crop_rect_rejects_below_minimum_extent() {
        let rect = CropRect {
            x: 0.0,
            y: 0.0,
            width: 5.0,
            height: 50.0,
        };
        assert!(!rect.is_valid());
    }

    #[test]
    fn edit_session_switch_resets_tool_parameters() {
        let mut session = EditSession::open(EditMode::Adjust);
        session.adjustments.brightness = 150;
        session.crop_rect.x = 20.0;
        session.switch_to(EditMode::Crop);
        assert_eq!(session.mode, EditMode::Crop);
        assert!(session.adjustments.is_identity());
        assert_eq!(session.crop_rect, CropRect::default());
    }

    #[test]
    fn edit_session_reset_clears_everything() {
        let mut session = EditSession::open(EditMode::Mask);
        session.edit_prompt = "add a hat".to_string();
        session.reset();
        assert_eq!(session, EditSession::default());
        assert_eq!(session.mode, EditMode::None);
    }

    #[test]
    fn aspect_ratio_serde_round_trip() {
        let json = serde_json::to_string(&AspectRatio::Anamorphic).unwrap();
        let back: AspectRatio = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AspectRatio::Anamorphic);
    }
}
