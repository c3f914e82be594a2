//! Reference slot grid with per-slot upload, drag-and-drop, and clear.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdImagePlus, LdX};

use charstudio_core::{ImageResource, SLOT_COUNT};

/// Allowed file extensions for reference uploads.
const ALLOWED_EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
];

/// MIME type for a filename, by extension. `None` for unsupported types.
fn mime_for(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    ALLOWED_EXTENSIONS
        .iter()
        .find(|(allowed, _)| allowed.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

/// Read a batch of dropped/picked files into resources, skipping
/// unsupported or unreadable ones.
async fn read_files(files: Vec<FileData>) -> Vec<ImageResource> {
    let mut resources = Vec::new();
    for file in files {
        let Some(mime) = mime_for(&file.name()) else {
            continue;
        };
        if let Ok(bytes) = file.read_bytes().await {
            resources.push(ImageResource::new(bytes.to_vec(), mime));
        }
    }
    resources
}

/// Props for the [`SlotGrid`] component.
#[derive(Props, Clone, PartialEq)]
pub struct SlotGridProps {
    /// Data-URI previews per slot, `None` for empty slots. Must have
    /// exactly `SLOT_COUNT` entries.
    previews: Vec<Option<String>>,
    /// Called with `(start_index, resources)` after files are read;
    /// the caller runs the circular first-fit assignment.
    on_assign: EventHandler<(usize, Vec<ImageResource>)>,
    /// Called with the index of a slot whose clear button was clicked.
    on_clear: EventHandler<usize>,
}

/// A fixed grid of reference image slots.
///
/// Each slot accepts a multi-file pick or drop; the batch lands
/// starting at that slot. Occupied slots show a preview with a clear
/// button.
#[component]
pub fn SlotGrid(props: SlotGridProps) -> Element {
    let mut drag_over = use_signal(|| Option::<usize>::None);

    rsx! {
        div { class: "slot-grid",
            for index in 0..SLOT_COUNT {
                {
                    let preview = props.previews.get(index).cloned().flatten();
                    let is_target = drag_over() == Some(index);
                    let slot_number = index + 1;
                    let on_assign = props.on_assign;
                    let on_clear = props.on_clear;
                    rsx! {
                        div {
                            key: "{index}",
                            class: if is_target { "slot slot-drag" } else { "slot" },
                            ondragover: move |evt| {
                                evt.prevent_default();
                                drag_over.set(Some(index));
                            },
                            ondragleave: move |_| {
                                drag_over.set(None);
                            },
                            ondrop: move |evt: DragEvent| async move {
                                evt.prevent_default();
                                drag_over.set(None);
                                let resources = read_files(evt.files()).await;
                                on_assign.call((index, resources));
                            },

                            if let Some(uri) = preview {
                                img {
                                    class: "slot-preview",
                                    src: "{uri}",
                                    alt: "Reference {slot_number}",
                                }
                                button {
                                    class: "slot-clear",
                                    title: "Remove reference",
                                    onclick: move |_| on_clear.call(index),
                                    Icon { icon: LdX, width: 14, height: 14 }
                                }
                            } else {
                                label { class: "slot-empty",
                                    Icon { icon: LdImagePlus, width: 22, height: 22 }
                                    span { class: "slot-hint", "Add" }
                                    input {
                                        r#type: "file",
                                        accept: ".png,.jpg,.jpeg,.bmp,.webp",
                                        multiple: true,
                                        class: "hidden-input",
                                        onchange: move |evt: FormEvent| async move {
                                            let resources = read_files(evt.files()).await;
                                            on_assign.call((index, resources));
                                        },
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mime_mapping_is_case_insensitive() {
        assert_eq!(mime_for("face.PNG"), Some("image/png"));
        assert_eq!(mime_for("face.JpEg"), Some("image/jpeg"));
        assert_eq!(mime_for("face.webp"), Some("image/webp"));
    }

    #[test]
    fn unsupported_extensions_are_rejected() {
        assert_eq!(mime_for("face.gif"), None);
        assert_eq!(mime_for("face.svg"), None);
        assert_eq!(mime_for("noextension"), None);
    }
}
