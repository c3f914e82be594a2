//! Generation history panel.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdEye, LdRotateCcw, LdTrash2};

use charstudio_core::HistoryItem;

/// Props for the [`HistoryPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct HistoryPanelProps {
    /// History items, newest first.
    items: Vec<HistoryItem>,
    /// Fired with an item id to load its image as the working image.
    on_view: EventHandler<String>,
    /// Fired with an item id to restore its prompt and aspect ratio.
    on_reuse: EventHandler<String>,
    /// Fired with an item id to delete it.
    on_delete: EventHandler<String>,
    /// Fired to clear the whole log.
    on_clear: EventHandler<()>,
}

/// Newest-first list of past generations with view/reuse/delete
/// actions and a clear-all button.
#[component]
pub fn HistoryPanel(props: HistoryPanelProps) -> Element {
    rsx! {
        div { class: "history-panel",
            div { class: "history-header",
                h3 { class: "panel-title", "History" }
                if !props.items.is_empty() {
                    button {
                        class: "icon-btn",
                        title: "Clear history",
                        onclick: move |_| props.on_clear.call(()),
                        "Clear all"
                    }
                }
            }

            if props.items.is_empty() {
                p { class: "history-empty", "Generated images will appear here." }
            }

            ul { class: "history-list",
                for item in props.items.iter() {
                    {
                        let id = item.id.clone();
                        let on_view = props.on_view;
                        let on_reuse = props.on_reuse;
                        let on_delete = props.on_delete;
                        let view_id = id.clone();
                        let reuse_id = id.clone();
                        let delete_id = id.clone();
                        rsx! {
                            li { key: "{id}", class: "history-item",
                                img {
                                    class: "history-thumb",
                                    src: "{item.image}",
                                    alt: "{item.prompt}",
                                }
                                div { class: "history-meta",
                                    p { class: "history-prompt", "{item.prompt}" }
                                    span { class: "history-ratio", "{item.aspect_ratio}" }
                                }
                                div { class: "history-actions",
                                    button {
                                        class: "icon-btn",
                                        title: "View",
                                        onclick: move |_| on_view.call(view_id.clone()),
                                        Icon { icon: LdEye, width: 14, height: 14 }
                                    }
                                    button {
                                        class: "icon-btn",
                                        title: "Reuse prompt and aspect ratio",
                                        onclick: move |_| on_reuse.call(reuse_id.clone()),
                                        Icon { icon: LdRotateCcw, width: 14, height: 14 }
                                    }
                                    button {
                                        class: "icon-btn",
                                        title: "Delete",
                                        onclick: move |_| on_delete.call(delete_id.clone()),
                                        Icon { icon: LdTrash2, width: 14, height: 14 }
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
