//! Native sharing via the Web Share API.
//!
//! Hands the working image to `navigator.share()` as a PNG `File`.
//! The API only exists on some browsers (and only in secure contexts),
//! so support is feature-detected before the share button is shown.

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::FilePropertyBag;
use web_time::{SystemTime, UNIX_EPOCH};

use charstudio_core::{EditError, encode};

/// Errors that can occur when sharing an image.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    /// `navigator.share` is not available in this browser.
    #[error("the Web Share API is not supported here")]
    Unsupported,

    /// A browser API call returned an error (including the user
    /// dismissing the share sheet).
    #[error("share API error: {0}")]
    JsError(String),

    /// Decoding or re-encoding the image failed.
    #[error(transparent)]
    Encode(#[from] EditError),
}

impl From<JsValue> for ShareError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Whether `navigator.share` exists. Checked with `Reflect` so the
/// probe itself never throws on browsers without the API.
#[must_use]
pub fn share_supported() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let navigator = window.navigator();
    js_sys::Reflect::get(&navigator, &JsValue::from_str("share"))
        .is_ok_and(|value| value.is_function())
}

/// Share the working image through the OS share sheet.
///
/// Decodes the data URI, re-encodes as PNG, wraps it in a `File`, and
/// awaits `navigator.share()`.
///
/// # Errors
///
/// Returns [`ShareError::Unsupported`] when the API is absent,
/// [`ShareError::Encode`] if the image cannot be re-encoded, and
/// [`ShareError::JsError`] if the share call itself fails.
#[allow(clippy::future_not_send)] // WASM is single-threaded; Navigator is !Send
pub async fn share_image(image_data_uri: &str, title: &str, text: &str) -> Result<(), ShareError> {
    if !share_supported() {
        return Err(ShareError::Unsupported);
    }
    let window = web_sys::window().ok_or_else(|| ShareError::JsError("no global window".into()))?;

    let resource = encode::from_data_uri(image_data_uri)?;
    let decoded = image::load_from_memory(&resource.bytes)
        .map_err(EditError::from)?
        .to_rgba8();
    let png = encode::encode_png(&decoded)?;

    let uint8_array = js_sys::Uint8Array::from(png.as_slice());
    let parts = js_sys::Array::new();
    parts.push(&uint8_array);

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    let opts = FilePropertyBag::new();
    opts.set_type("image/png");
    let file = web_sys::File::new_with_u8_array_sequence_and_options(
        &parts,
        &format!("character-studio-{millis}.png"),
        &opts,
    )?;

    let files = js_sys::Array::new();
    files.push(&file);

    let data = web_sys::ShareData::new();
    // `files` is a sequence<File>; the dictionary setter takes a JsValue.
    data.set_files(files.as_ref());
    data.set_title(title);
    data.set_text(text);

    JsFuture::from(window.navigator().share_with_data(&data)).await?;
    Ok(())
}
