//! Prompt presets.
//!
//! Three built-in scene presets plus a user-saved name-to-prompt map
//! persisted in `localStorage`. Built-in keys are reserved: a custom
//! preset may not shadow one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A built-in scene preset.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinPreset {
    /// Stable key, used as the select value.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// The prompt it fills in.
    pub prompt: &'static str,
}

/// The built-in presets, in display order.
pub const BUILTIN_PRESETS: [BuiltinPreset; 3] = [
    BuiltinPreset {
        key: "xeebta",
        name: "Xeebta (Golden Hour Coast)",
        prompt: "Close-up portrait of the person, wearing simple traditional attire. Golden hour lighting, gentle breeze, with the ocean in the background.",
    },
    BuiltinPreset {
        key: "dhulka",
        name: "Dhulka (Nomadic Dunes)",
        prompt: "Shot of the person standing amidst vast sand dunes. Warm afternoon light, wearing a traditional macawis, creating a dramatic silhouette.",
    },
    BuiltinPreset {
        key: "saqafka",
        name: "Saqafka Muqdisho (Mogadishu Rooftop)",
        prompt: "Portrait of the person on a rooftop in Mogadishu, with the city skyline in the background. Late afternoon light, candid pose.",
    },
];

/// Errors from preset CRUD.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PresetError {
    /// The prompt to save was empty after trimming.
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// The name to save was empty after trimming.
    #[error("preset name must not be empty")]
    EmptyName,

    /// The name collides with a built-in or existing custom preset.
    #[error("a preset named {0:?} already exists")]
    NameTaken(String),
}

/// User-saved presets: name to prompt, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPresets {
    presets: BTreeMap<String, String>,
}

impl CustomPresets {
    /// An empty preset map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a preset. The name is trimmed; built-in keys (compared
    /// case-insensitively) and existing custom names are rejected.
    ///
    /// # Errors
    ///
    /// [`PresetError::EmptyPrompt`], [`PresetError::EmptyName`], or
    /// [`PresetError::NameTaken`].
    pub fn save(&mut self, name: &str, prompt: &str) -> Result<(), PresetError> {
        if prompt.trim().is_empty() {
            return Err(PresetError::EmptyPrompt);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::EmptyName);
        }
        let shadows_builtin = BUILTIN_PRESETS
            .iter()
            .any(|builtin| builtin.key.eq_ignore_ascii_case(name));
        if shadows_builtin || self.presets.contains_key(name) {
            return Err(PresetError::NameTaken(name.to_string()));
        }
        self.presets.insert(name.to_string(), prompt.to_string());
        Ok(())
    }

    /// Delete a custom preset. Returns whether it existed.
    pub fn delete(&mut self, name: &str) -> bool {
        self.presets.remove(name).is_some()
    }

    /// Custom preset names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// Look up a prompt by key: built-ins first, then custom presets.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<&str> {
        BUILTIN_PRESETS
            .iter()
            .find(|builtin| builtin.key == key)
            .map(|builtin| builtin.prompt)
            .or_else(|| self.presets.get(key).map(String::as_str))
    }

    /// Returns `true` if `name` is a custom (deletable) preset.
    #[must_use]
    pub fn is_custom(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn save_and_resolve() {
        let mut presets = CustomPresets::new();
        presets.save("Studio", "white backdrop, soft light").unwrap();
        assert_eq!(presets.resolve("Studio"), Some("white backdrop, soft light"));
        assert!(presets.is_custom("Studio"));
    }

    #[test]
    fn builtins_resolve_without_any_custom_state() {
        let presets = CustomPresets::new();
        for builtin in BUILTIN_PRESETS {
            assert_eq!(presets.resolve(builtin.key), Some(builtin.prompt));
            assert!(!presets.is_custom(builtin.key));
        }
    }

    #[test]
    fn builtin_keys_are_reserved_case_insensitively() {
        let mut presets = CustomPresets::new();
        assert_eq!(
            presets.save("Xeebta", "anything"),
            Err(PresetError::NameTaken("Xeebta".to_string())),
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut presets = CustomPresets::new();
        presets.save("mine", "p1").unwrap();
        assert_eq!(
            presets.save("mine", "p2"),
            Err(PresetError::NameTaken("mine".to_string())),
        );
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let mut presets = CustomPresets::new();
        assert_eq!(presets.save("x", "   "), Err(PresetError::EmptyPrompt));
        assert_eq!(presets.save("  ", "p"), Err(PresetError::EmptyName));
    }

    #[test]
    fn delete_and_names() {
        let mut presets = CustomPresets::new();
        presets.save("b", "2").unwrap();
        presets.save("a", "1").unwrap();
        assert_eq!(presets.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(presets.delete("a"));
        assert!(!presets.delete("a"));
        assert!(presets.resolve("a").is_none());
    }

    #[test]
    fn serde_round_trip() {
        let mut presets = CustomPresets::new();
        presets.save("mine", "prompt text").unwrap();
        let json = serde_json::to_string(&presets).unwrap();
        let back: CustomPresets = serde_json::from_str(&json).unwrap();
        assert_eq!(back, presets);
    }
}
