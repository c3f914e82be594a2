//! Generation result display.
//!
//! Renders the classified result entries in order (images in an
//! aspect-ratio-shaped frame, text beneath), the rotating status
//! message while waiting, and the action bar for the working image:
//! edit tools, JPEG save tiers, share, and the upscale stub.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{
    LdCrop, LdPaintbrush, LdShare2, LdSlidersHorizontal, LdSparkles,
};

use charstudio_client::ResultEntry;
use charstudio_core::{AspectRatio, EditMode, QualityTier};

/// CSS class shaping the image frame to the requested aspect ratio.
const fn aspect_class(ratio: AspectRatio) -> &'static str {
    match ratio {
        AspectRatio::Square => "aspect-1-1",
        AspectRatio::Portrait => "aspect-4-5",
        AspectRatio::Widescreen => "aspect-16-9",
        AspectRatio::Anamorphic => "aspect-2-39-1",
    }
}

/// Props for the [`ResultView`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ResultViewProps {
    /// Classified result entries, in part order.
    entries: Vec<ResultEntry>,
    /// The aspect ratio the result was requested at.
    aspect_ratio: AspectRatio,
    /// Whether a generation is in flight.
    generating: bool,
    /// The rotating status message while generating.
    status_message: String,
    /// User-facing error, if the last run failed.
    error: Option<String>,
    /// Whether `navigator.share` is available.
    share_available: bool,
    /// Fired with the tool to open the editor with.
    on_edit_request: EventHandler<EditMode>,
    /// Fired with the JPEG quality tier to save at.
    on_save: EventHandler<QualityTier>,
    /// Fired on share click.
    on_share: EventHandler<()>,
    /// Fired on upscale click (stub).
    on_upscale: EventHandler<()>,
}

/// The main result area.
#[component]
pub fn ResultView(props: ResultViewProps) -> Element {
    let frame = aspect_class(props.aspect_ratio);
    let on_edit_request = props.on_edit_request;
    let on_save = props.on_save;
    let on_share = props.on_share;
    let on_upscale = props.on_upscale;
    let share_available = props.share_available;

    // The action bar appears once, under the first image entry.
    let first_image = props
        .entries
        .iter()
        .position(|entry| matches!(entry, ResultEntry::Image(_)));

    let entry_nodes = props.entries.iter().enumerate().map(|(index, entry)| {
        match entry {
            ResultEntry::Image(uri) => rsx! {
                div { key: "{index}", class: "generated-image-wrapper {frame}",
                    img { class: "generated-image", src: "{uri}", alt: "Generated image" }
                }
                if first_image == Some(index) {
                    div { class: "result-actions",
                        button {
                            class: "icon-btn",
                            title: "AI edit",
                            onclick: move |_| on_edit_request.call(EditMode::Mask),
                            Icon { icon: LdPaintbrush, width: 16, height: 16 }
                        }
                        button {
                            class: "icon-btn",
                            title: "Adjust",
                            onclick: move |_| on_edit_request.call(EditMode::Adjust),
                            Icon { icon: LdSlidersHorizontal, width: 16, height: 16 }
                        }
                        button {
                            class: "icon-btn",
                            title: "Crop",
                            onclick: move |_| on_edit_request.call(EditMode::Crop),
                            Icon { icon: LdCrop, width: 16, height: 16 }
                        }
                        span { class: "toolbar-spacer" }
                        button {
                            class: "save-btn",
                            title: "Save in high quality",
                            onclick: move |_| on_save.call(QualityTier::High),
                            "HD"
                        }
                        button {
                            class: "save-btn",
                            title: "Save in medium quality",
                            onclick: move |_| on_save.call(QualityTier::Medium),
                            "SD"
                        }
                        button {
                            class: "save-btn",
                            title: "Save in low quality",
                            onclick: move |_| on_save.call(QualityTier::Low),
                            "Low"
                        }
                        if share_available {
                            button {
                                class: "icon-btn",
                                title: "Share",
                                onclick: move |_| on_share.call(()),
                                Icon { icon: LdShare2, width: 16, height: 16 }
                            }
                        }
                        button {
                            class: "icon-btn",
                            title: "Upscale",
                            onclick: move |_| on_upscale.call(()),
                            Icon { icon: LdSparkles, width: 16, height: 16 }
                            "Upscale"
                        }
                    }
                }
            },
            ResultEntry::Text(text) => rsx! {
                p { key: "{index}", class: "result-text", "{text}" }
            },
        }
    });

    let has_image = first_image.is_some();

    rsx! {
        div { class: "result-view",
            if props.generating {
                div { class: "result-loading",
                    div { class: "spinner" }
                    p { class: "status-message", "{props.status_message}" }
                }
            }

            if let Some(message) = props.error.as_ref() {
                p { class: "result-error", "{message}" }
            }

            if !props.generating && !has_image && props.error.is_none() {
                p { class: "result-placeholder",
                    "Upload reference images and describe a scene to get started."
                }
            }

            {entry_nodes}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn aspect_classes_cover_every_ratio() {
        assert_eq!(aspect_class(AspectRatio::Square), "aspect-1-1");
        assert_eq!(aspect_class(AspectRatio::Portrait), "aspect-4-5");
        assert_eq!(aspect_class(AspectRatio::Widescreen), "aspect-16-9");
        assert_eq!(aspect_class(AspectRatio::Anamorphic), "aspect-2-39-1");
    }
}
