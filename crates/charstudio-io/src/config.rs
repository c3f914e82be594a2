//! API-key resolution.
//!
//! The key is baked in at compile time from `GEMINI_API_KEY` when
//! available, and can be overridden at runtime by setting a
//! `window.STUDIO_API_KEY` global before the app boots (e.g. from an
//! inline `<script>` tag). The runtime probe uses `Reflect` so it
//! silently no-ops when the global is absent.

use wasm_bindgen::JsValue;

/// The compile-time default key, if one was provided.
const BAKED_KEY: Option<&str> = option_env!("GEMINI_API_KEY");

/// Resolve the API key: runtime global first, then the compile-time
/// default. `None` means generation is unavailable and the UI should
/// say so instead of submitting requests that can only fail.
#[must_use]
pub fn api_key() -> Option<String> {
    runtime_key().or_else(|| BAKED_KEY.map(str::to_string))
}

/// Read `window.STUDIO_API_KEY` if it is set to a non-empty string.
fn runtime_key() -> Option<String> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str("STUDIO_API_KEY")).ok()?;
    value.as_string().filter(|key| !key.is_empty())
}
