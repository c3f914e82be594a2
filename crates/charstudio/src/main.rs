use dioxus::prelude::*;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use web_sys::console;

use charstudio_client::{
    GeminiClient, GenerateError, GenerationRequest, Generator, Language, ResultEntry,
    newest_image, run_generation, run_mask_edit,
};
use charstudio_core::{
    AspectRatio, EditMode, HistoryLog, ImageResource, QualityTier, ReferenceSlots, adjust, crop,
    encode,
};
use charstudio_io::{
    ControlsPanel, CustomPresets, HistoryPanel, ImageEditor, ResultView, SlotGrid, StatusRotation,
    config, download, share, storage,
};

fn main() {
    dioxus::launch(app);
}

/// Language and aspect-ratio preferences persisted across sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UiPrefs {
    language: String,
    aspect_ratio: String,
}

fn language_from_prefs(prefs: &UiPrefs) -> Language {
    if prefs.language == "so" {
        Language::So
    } else {
        Language::En
    }
}

const fn language_code(language: Language) -> &'static str {
    match language {
        Language::En => "en",
        Language::So => "so",
    }
}

/// Log an error's root cause to the console; the UI shows generic text.
fn log_error(context: &str, error: &dyn std::fmt::Display) {
    console::error_1(&JsValue::from_str(&format!("{context}: {error}")));
}

const GENERIC_ERROR: &str = "An error occurred. Please check the console for details.";
const NO_IMAGE_ERROR: &str = "No image was generated. Please try a different prompt.";

/// Root application component.
///
/// Owns all session state via Dioxus signals and wires together the
/// slot grid, controls panel, result view, editor, and history panel.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Persisted state, loaded once ---
    let prefs = use_signal(|| {
        storage::load::<UiPrefs>(storage::UI_KEY)
            .ok()
            .flatten()
            .unwrap_or_default()
    });
    let mut history = use_signal(|| {
        storage::load::<HistoryLog>(storage::HISTORY_KEY)
            .ok()
            .flatten()
            .unwrap_or_default()
    });
    let mut presets = use_signal(|| {
        storage::load::<CustomPresets>(storage::PRESETS_KEY)
            .ok()
            .flatten()
            .unwrap_or_default()
    });

    // --- Session state ---
    let mut slots = use_signal(ReferenceSlots::new);
    let mut prompt = use_signal(String::new);
    let mut selected_preset = use_signal(String::new);
    let mut aspect = use_signal(move || AspectRatio::from_label(&prefs.peek().aspect_ratio));
    let mut language = use_signal(move || language_from_prefs(&prefs.peek()));
    let mut entries = use_signal(Vec::<ResultEntry>::new);
    let mut working_image = use_signal(|| Option::<String>::None);
    let mut generator = use_signal(Generator::new);
    let mut status_message = use_signal(String::new);
    let mut status_guard = use_signal(|| Option::<StatusRotation>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut editor_mode = use_signal(|| Option::<EditMode>::None);
    let mut toast = use_signal(|| Option::<String>::None);

    // --- Persistence effects ---
    use_effect(move || {
        let log = history();
        if let Err(e) = storage::save(storage::HISTORY_KEY, &log) {
            log_error("failed to persist history", &e);
        }
    });
    use_effect(move || {
        let current = presets();
        if let Err(e) = storage::save(storage::PRESETS_KEY, &current) {
            log_error("failed to persist presets", &e);
        }
    });
    use_effect(move || {
        let current = UiPrefs {
            language: language_code(language()).to_string(),
            aspect_ratio: aspect().label().to_string(),
        };
        if let Err(e) = storage::save(storage::UI_KEY, &current) {
            log_error("failed to persist preferences", &e);
        }
    });

    // Auto-dismissing toast message.
    let mut show_toast = move |message: String| {
        toast.set(Some(message));
        spawn(async move {
            gloo_timers::future::TimeoutFuture::new(3_000).await;
            toast.set(None);
        });
    };

    // --- Generation ---
    let run_generate = move |()| {
        if generator.write().try_begin().is_err() {
            return;
        }
        let request = GenerationRequest {
            references: slots.peek().occupied().cloned().collect(),
            prompt: prompt.peek().clone(),
            aspect_ratio: *aspect.peek(),
        };
        if let Err(e) = request.validate() {
            log_error("generation rejected", &e);
            generator.write().finish();
            return;
        }
        let Some(key) = config::api_key() else {
            error.set(Some("No API key is configured.".to_string()));
            generator.write().finish();
            return;
        };
        let lang = *language.peek();

        error.set(None);
        entries.set(Vec::new());
        status_guard.set(Some(StatusRotation::start(lang, move |message| {
            status_message.set(message.to_string());
        })));
        generator.write().waiting();

        spawn(async move {
            let client = GeminiClient::new(key);
            // Record into a scratch log and fold it in after the await,
            // so history edits made while waiting are not reverted.
            let mut recorded = HistoryLog::new();
            match run_generation(&client, &request, lang, &mut recorded).await {
                Ok(classified) => {
                    working_image.set(newest_image(&classified).map(str::to_string));
                    entries.set(classified);
                    history.write().absorb(recorded);
                }
                Err(GenerateError::NoImage) => {
                    error.set(Some(NO_IMAGE_ERROR.to_string()));
                }
                Err(e) => {
                    log_error("generation failed", &e);
                    error.set(Some(GENERIC_ERROR.to_string()));
                }
            }
            status_guard.set(None);
            generator.write().finish();
        });
    };

    // --- Mask-guided edit ---
    let apply_mask_edit = move |(mask, edit_prompt): (ImageResource, String)| {
        if generator.write().try_begin().is_err() {
            return;
        }
        let Some(uri) = working_image.peek().clone() else {
            generator.write().finish();
            return;
        };
        let original = match encode::from_data_uri(&uri) {
            Ok(resource) => resource,
            Err(e) => {
                log_error("working image is not a valid data URI", &e);
                error.set(Some(GENERIC_ERROR.to_string()));
                generator.write().finish();
                return;
            }
        };
        let Some(key) = config::api_key() else {
            error.set(Some("No API key is configured.".to_string()));
            generator.write().finish();
            return;
        };
        let lang = *language.peek();
        let base_prompt = prompt.peek().clone();
        let ratio = *aspect.peek();

        error.set(None);
        status_guard.set(Some(StatusRotation::start_editing(lang, move |message| {
            status_message.set(message.to_string());
        })));
        generator.write().waiting();

        spawn(async move {
            let client = GeminiClient::new(key);
            let mut recorded = HistoryLog::new();
            match run_mask_edit(
                &client,
                &original,
                &mask,
                &edit_prompt,
                &base_prompt,
                ratio,
                &mut recorded,
            )
            .await
            {
                Ok(classified) => {
                    working_image.set(newest_image(&classified).map(str::to_string));
                    entries.set(classified);
                    history.write().absorb(recorded);
                    editor_mode.set(None);
                }
                Err(GenerateError::NoImage) => {
                    error.set(Some(NO_IMAGE_ERROR.to_string()));
                }
                Err(e) => {
                    log_error("mask edit failed", &e);
                    error.set(Some(GENERIC_ERROR.to_string()));
                }
            }
            status_guard.set(None);
            generator.write().finish();
        });
    };

    // --- Local edits: replace the working image only, never history ---
    let mut replace_working_image = move |result: Result<String, charstudio_core::EditError>| {
        match result {
            Ok(uri) => {
                entries.set(vec![ResultEntry::Image(uri.clone())]);
                working_image.set(Some(uri));
                editor_mode.set(None);
            }
            Err(e) => {
                log_error("local edit failed", &e);
                error.set(Some(GENERIC_ERROR.to_string()));
            }
        }
    };

    let apply_adjust = move |adjustments| {
        let Some(uri) = working_image.peek().clone() else {
            return;
        };
        let outcome = encode::from_data_uri(&uri)
            .and_then(|resource| adjust::apply_to_bytes(&resource.bytes, adjustments))
            .and_then(|image| encode::to_png_data_uri(&image));
        replace_working_image(outcome);
    };

    let apply_crop = move |rect| {
        let Some(uri) = working_image.peek().clone() else {
            return;
        };
        let outcome = encode::from_data_uri(&uri)
            .and_then(|resource| crop::apply_to_bytes(&resource.bytes, &rect))
            .and_then(|image| encode::to_png_data_uri(&image));
        replace_working_image(outcome);
    };

    // --- Export ---
    let save_jpeg = move |tier: QualityTier| {
        if let Some(uri) = working_image.peek().clone() {
            if let Err(e) = download::save_as_jpeg(&uri, tier) {
                log_error("save failed", &e);
                show_toast("Could not save the image.".to_string());
            }
        }
    };

    let share_current = move |()| {
        let Some(uri) = working_image.peek().clone() else {
            return;
        };
        spawn(async move {
            let result = share::share_image(
                &uri,
                "My Character Studio Creation",
                "Check out this image I created!",
            )
            .await;
            match result {
                Ok(()) | Err(share::ShareError::JsError(_)) => {
                    // A JsError here is almost always the user closing
                    // the share sheet; stay quiet.
                }
                Err(share::ShareError::Unsupported) => {
                    show_toast("Sharing is not supported in this browser.".to_string());
                }
                Err(e) => {
                    log_error("share failed", &e);
                    show_toast("Could not share the image.".to_string());
                }
            }
        });
    };

    let upscale = move |()| {
        show_toast("Upscale feature is coming soon!".to_string());
    };

    // --- Presets ---
    let select_preset = move |key: String| {
        selected_preset.set(key.clone());
        let resolved = presets
            .peek()
            .resolve(&key)
            .map(str::to_string)
            .unwrap_or_default();
        prompt.set(resolved);
    };

    let save_preset = move |()| {
        let current_prompt = prompt.peek().clone();
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(Some(name)) = window.prompt_with_message("Enter a name for this preset:") else {
            return;
        };
        match presets.write().save(&name, &current_prompt) {
            Ok(()) => {
                selected_preset.set(name.trim().to_string());
                show_toast(format!("Preset \"{}\" saved.", name.trim()));
            }
            Err(e) => show_toast(e.to_string()),
        }
    };

    let delete_preset = move |()| {
        let key = selected_preset.peek().clone();
        if !presets.peek().is_custom(&key) {
            return;
        }
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&format!("Delete preset \"{key}\"?")).ok())
            .unwrap_or(false);
        if confirmed {
            presets.write().delete(&key);
            selected_preset.set(String::new());
            prompt.set(String::new());
        }
    };

    // --- Slots ---
    let assign_slots = move |(index, resources): (usize, Vec<ImageResource>)| {
        slots.write().assign(index, resources);
    };
    let clear_slot = move |index: usize| {
        slots.write().clear(index);
    };

    // --- History actions ---
    let view_item = move |id: String| {
        if let Some(item) = history.peek().get(&id) {
            entries.set(vec![ResultEntry::Image(item.image.clone())]);
            working_image.set(Some(item.image.clone()));
        }
    };
    let reuse_item = move |id: String| {
        if let Some(item) = history.peek().get(&id) {
            prompt.set(item.prompt.clone());
            aspect.set(item.aspect_ratio);
        }
    };
    let delete_item = move |id: String| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Delete this history item?").ok())
            .unwrap_or(false);
        if confirmed {
            history.write().delete(&id);
        }
    };
    let clear_history = move |()| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Clear the entire history?").ok())
            .unwrap_or(false);
        if confirmed {
            history.write().clear();
        }
    };

    // --- Derived view state ---
    let generating = !generator.read().is_idle();
    let previews: Vec<Option<String>> = slots
        .read()
        .as_slice()
        .iter()
        .map(|slot| slot.as_ref().map(encode::resource_to_data_uri))
        .collect();
    let can_generate = slots.read().any_occupied() && !prompt.read().trim().is_empty();
    let custom_names: Vec<String> = presets.read().names().map(str::to_string).collect();
    let can_delete = presets.read().is_custom(&selected_preset.read());
    let current_language = language();
    let editor_open = editor_mode().zip(working_image());

    rsx! {
        style { dangerous_inner_html: include_str!("../assets/studio.css") }

        div { class: "studio",
            header { class: "studio-header",
                h1 { class: "studio-title", "Character Studio" }
                button {
                    class: "icon-btn",
                    title: "Switch language",
                    onclick: move |_| {
                        let next = match *language.peek() {
                            Language::En => Language::So,
                            Language::So => Language::En,
                        };
                        language.set(next);
                    },
                    if current_language == Language::En { "Soomaali" } else { "English" }
                }
            }

            div { class: "studio-body",
                aside { class: "studio-controls",
                    h3 { class: "panel-title", "Reference Images" }
                    SlotGrid {
                        previews: previews,
                        on_assign: assign_slots,
                        on_clear: clear_slot,
                    }
                    ControlsPanel {
                        prompt: prompt(),
                        on_prompt_change: move |value| prompt.set(value),
                        aspect_ratio: aspect(),
                        on_aspect_change: move |ratio| aspect.set(ratio),
                        selected_preset: selected_preset(),
                        custom_preset_names: custom_names,
                        on_preset_selected: select_preset,
                        on_save_preset: save_preset,
                        on_delete_preset: delete_preset,
                        can_delete_preset: can_delete,
                        can_generate: can_generate,
                        generating: generating,
                        on_generate: run_generate,
                    }
                }

                main { class: "studio-main",
                    ResultView {
                        entries: entries(),
                        aspect_ratio: aspect(),
                        generating: generating,
                        status_message: status_message(),
                        error: error(),
                        share_available: share::share_supported(),
                        on_edit_request: move |mode| editor_mode.set(Some(mode)),
                        on_save: save_jpeg,
                        on_share: share_current,
                        on_upscale: upscale,
                    }
                }

                aside { class: "studio-history",
                    HistoryPanel {
                        items: history.read().list_all().to_vec(),
                        on_view: view_item,
                        on_reuse: reuse_item,
                        on_delete: delete_item,
                        on_clear: clear_history,
                    }
                }
            }

            if let Some((mode, image)) = editor_open {
                div { class: "editor-overlay",
                    ImageEditor {
                        image: image,
                        initial_mode: mode,
                        busy: generating,
                        on_apply_mask: apply_mask_edit,
                        on_apply_adjust: apply_adjust,
                        on_apply_crop: apply_crop,
                        on_cancel: move |()| editor_mode.set(None),
                    }
                }
            }

            if let Some(message) = toast() {
                div { class: "toast", "{message}" }
            }
        }
    }
}
