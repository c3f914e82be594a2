//! `localStorage` persistence.
//!
//! JSON-serialized state under fixed keys: the history log, user
//! presets, and UI preferences. Loads are tolerant -- a missing key is
//! `None`, and a corrupt value is reported rather than panicking so
//! the app can fall back to defaults.

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

/// Storage key for the history log.
pub const HISTORY_KEY: &str = "character-studio-history";

/// Storage key for user-saved presets.
pub const PRESETS_KEY: &str = "character-studio-user-presets";

/// Storage key for UI preferences (language, last aspect ratio).
pub const UI_KEY: &str = "character-studio-ui-storage";

/// Errors that can occur reading or writing `localStorage`.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A browser API call returned an error or storage is unavailable
    /// (e.g., blocked in a private window).
    #[error("storage API error: {0}")]
    JsError(String),

    /// The stored value did not parse as the expected shape.
    #[error("corrupt value under {key}: {source}")]
    Corrupt {
        /// The storage key.
        key: &'static str,
        /// The JSON error.
        source: serde_json::Error,
    },

    /// Serializing the value to JSON failed.
    #[error("failed to serialize value: {0}")]
    Serialize(serde_json::Error),
}

impl From<JsValue> for StorageError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .ok_or_else(|| StorageError::JsError("no global window".into()))?
        .local_storage()?
        .ok_or_else(|| StorageError::JsError("localStorage unavailable".into()))
}

/// Load and deserialize a value. `Ok(None)` when the key is absent.
///
/// # Errors
///
/// [`StorageError::JsError`] if storage is unavailable and
/// [`StorageError::Corrupt`] if the stored JSON does not parse.
pub fn load<T: DeserializeOwned>(key: &'static str) -> Result<Option<T>, StorageError> {
    let Some(raw) = local_storage()?.get_item(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Corrupt { key, source })
}

/// Serialize and store a value under `key`.
///
/// # Errors
///
/// [`StorageError::Serialize`] if the value does not serialize and
/// [`StorageError::JsError`] if the write fails (e.g., quota).
pub fn save<T: Serialize>(key: &'static str, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(StorageError::Serialize)?;
    local_storage()?.set_item(key, &json)?;
    Ok(())
}

/// Remove a key. Absent keys are a no-op.
///
/// # Errors
///
/// [`StorageError::JsError`] if storage is unavailable.
pub fn remove(key: &'static str) -> Result<(), StorageError> {
    local_storage()?.remove_item(key)?;
    Ok(())
}
