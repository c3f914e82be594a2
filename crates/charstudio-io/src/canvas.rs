//! Mask paint canvas access.
//!
//! The editor paints brush strokes onto a transparent `<canvas>`
//! overlay. This module draws the strokes, clears the layer, and reads
//! the painted alpha channel back out so the core can binarize it into
//! the hard mask the model requires.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use charstudio_core::geometry::CanvasPoint;
use charstudio_core::{EditError, ImageResource, encode, mask};

/// Errors that can occur accessing the paint canvas.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// A browser API call returned an error or an element was missing.
    #[error("canvas API error: {0}")]
    JsError(String),

    /// Binarizing or encoding the painted layer failed.
    #[error(transparent)]
    Edit(#[from] EditError),
}

impl From<JsValue> for CanvasError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Look up a canvas element by id.
///
/// # Errors
///
/// Returns [`CanvasError::JsError`] when the element is absent or is
/// not a `<canvas>`.
pub fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, CanvasError> {
    let document = web_sys::window()
        .ok_or_else(|| CanvasError::JsError("no global window".into()))?
        .document()
        .ok_or_else(|| CanvasError::JsError("no document".into()))?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| CanvasError::JsError(format!("no element with id {id:?}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|e| CanvasError::JsError(format!("element {id:?} is not a canvas: {e:?}")))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, CanvasError> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| CanvasError::JsError("no 2d context".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|e| CanvasError::JsError(format!("context is not 2d: {e:?}")))
}

/// Draw one brush segment from `from` to `to`.
///
/// Strokes are translucent white with round caps so overlapping
/// segments read as one continuous mark; only the alpha channel
/// matters for the mask.
///
/// # Errors
///
/// Returns [`CanvasError::JsError`] if the 2d context is unavailable.
pub fn stroke_segment(
    canvas: &HtmlCanvasElement,
    from: CanvasPoint,
    to: CanvasPoint,
    brush_diameter: u32,
) -> Result<(), CanvasError> {
    let ctx = context_2d(canvas)?;
    ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
    ctx.set_line_width(f64::from(brush_diameter));
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.begin_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.stroke();
    Ok(())
}

/// Erase every stroke on the paint layer.
///
/// # Errors
///
/// Returns [`CanvasError::JsError`] if the 2d context is unavailable.
pub fn clear(canvas: &HtmlCanvasElement) -> Result<(), CanvasError> {
    let ctx = context_2d(canvas)?;
    ctx.clear_rect(
        0.0,
        0.0,
        f64::from(canvas.width()),
        f64::from(canvas.height()),
    );
    Ok(())
}

/// Read the painted layer, binarize it, and return the hard mask as a
/// PNG resource ready to send to the model.
///
/// # Errors
///
/// Returns [`CanvasError::JsError`] if the pixels cannot be read (e.g.
/// a tainted canvas) and [`CanvasError::Edit`] if binarization or PNG
/// encoding fails.
pub fn read_mask(canvas: &HtmlCanvasElement) -> Result<ImageResource, CanvasError> {
    let (width, height) = (canvas.width(), canvas.height());
    let ctx = context_2d(canvas)?;
    let image_data = ctx.get_image_data(0.0, 0.0, f64::from(width), f64::from(height))?;
    let raw = image_data.data().0;
    let binarized = mask::synthesize(width, height, &raw)?;
    let png = encode::encode_png(&binarized)?;
    Ok(ImageResource::new(png, "image/png"))
}
