//! Prompt, preset, aspect ratio, and generate controls.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdSave, LdSparkles, LdTrash2};

use charstudio_core::AspectRatio;

use crate::presets::BUILTIN_PRESETS;

/// Props for the [`ControlsPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ControlsPanelProps {
    /// Current prompt text.
    prompt: String,
    /// Fired on every prompt edit.
    on_prompt_change: EventHandler<String>,
    /// Currently selected aspect ratio.
    aspect_ratio: AspectRatio,
    /// Fired when a ratio radio is picked.
    on_aspect_change: EventHandler<AspectRatio>,
    /// Key of the selected preset, empty for none.
    selected_preset: String,
    /// Names of the user's custom presets, sorted.
    custom_preset_names: Vec<String>,
    /// Fired with the chosen preset key (empty to deselect).
    on_preset_selected: EventHandler<String>,
    /// Fired when the user asks to save the current prompt as a preset.
    on_save_preset: EventHandler<()>,
    /// Fired when the user asks to delete the selected custom preset.
    on_delete_preset: EventHandler<()>,
    /// Whether the selected preset is deletable (custom, not built-in).
    can_delete_preset: bool,
    /// Whether the generate button should be enabled.
    can_generate: bool,
    /// Whether a generation is in flight.
    generating: bool,
    /// Fired on generate click.
    on_generate: EventHandler<()>,
}

/// The left-hand controls: preset picker, prompt textarea, aspect
/// ratio radios, and the generate button.
#[component]
pub fn ControlsPanel(props: ControlsPanelProps) -> Element {
    let generate_disabled = !props.can_generate || props.generating;

    rsx! {
        div { class: "controls-panel",
            div { class: "control-group",
                label { class: "control-label", "Presets" }
                div { class: "preset-row",
                    select {
                        class: "preset-select",
                        value: "{props.selected_preset}",
                        onchange: move |evt| props.on_preset_selected.call(evt.value()),
                        option { value: "", "Select a preset..." }
                        for preset in BUILTIN_PRESETS {
                            option { key: "{preset.key}", value: "{preset.key}", "{preset.name}" }
                        }
                        for name in props.custom_preset_names.iter() {
                            option { key: "{name}", value: "{name}", "{name}" }
                        }
                    }
                    button {
                        class: "icon-btn",
                        title: "Save current prompt as a preset",
                        onclick: move |_| props.on_save_preset.call(()),
                        Icon { icon: LdSave, width: 16, height: 16 }
                    }
                    button {
                        class: "icon-btn",
                        title: "Delete preset",
                        disabled: !props.can_delete_preset,
                        onclick: move |_| props.on_delete_preset.call(()),
                        Icon { icon: LdTrash2, width: 16, height: 16 }
                    }
                }
            }

            div { class: "control-group",
                label { class: "control-label", r#for: "prompt-input", "Prompt" }
                textarea {
                    id: "prompt-input",
                    class: "prompt-input",
                    placeholder: "Describe your desired image here...",
                    value: "{props.prompt}",
                    rows: 5,
                    oninput: move |evt| props.on_prompt_change.call(evt.value()),
                }
            }

            div { class: "control-group",
                label { class: "control-label", "Aspect Ratio" }
                div { class: "aspect-options",
                    for ratio in AspectRatio::ALL {
                        label {
                            key: "{ratio.label()}",
                            class: if props.aspect_ratio == ratio { "aspect-option aspect-selected" } else { "aspect-option" },
                            input {
                                r#type: "radio",
                                name: "aspect-ratio",
                                value: "{ratio.label()}",
                                checked: props.aspect_ratio == ratio,
                                onchange: move |_| props.on_aspect_change.call(ratio),
                            }
                            "{ratio.label()}"
                        }
                    }
                }
            }

            button {
                class: "generate-btn",
                disabled: generate_disabled,
                onclick: move |_| props.on_generate.call(()),
                Icon { icon: LdSparkles, width: 18, height: 18 }
                if props.generating { "Generating..." } else { "Generate" }
            }
        }
    }
}
