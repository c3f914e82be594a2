//! Mask / adjust / crop image editor.
//!
//! Renders the working image with a tool-specific overlay: a paint
//! canvas for mask edits, live CSS-filter sliders for adjustments, or
//! a draggable crop box. Applying a tool hands the parameters back to
//! the caller; all pixel work happens in `charstudio-core`.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{
    LdCheck, LdCrop, LdEraser, LdPaintbrush, LdSlidersHorizontal, LdX,
};

use charstudio_core::geometry::{self, CanvasPoint, CropHandle};
use charstudio_core::{Adjustments, CropRect, EditMode, EditSession, ImageResource};

use crate::canvas;

/// Element id of the paint canvas overlay.
const MASK_CANVAS_ID: &str = "mask-paint-canvas";
/// Element id of the working image.
const EDIT_IMAGE_ID: &str = "edit-source-image";
/// Element id of the image wrapper (crop coordinate space).
const EDIT_WRAPPER_ID: &str = "edit-image-wrapper";

/// An in-progress crop drag.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CropDrag {
    handle: CropHandle,
    start_rect: CropRect,
    start_x: f64,
    start_y: f64,
}

fn element_rect(id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    Some(document.get_element_by_id(id)?.get_bounding_client_rect())
}

/// Size the paint canvas to the displayed image so the mask matches
/// what the user sees. The mask is produced at displayed (not native)
/// dimensions.
fn sync_canvas_to_image() {
    let Ok(canvas) = canvas::canvas_by_id(MASK_CANVAS_ID) else {
        return;
    };
    let Some(rect) = element_rect(EDIT_IMAGE_ID) else {
        return;
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        canvas.set_width(rect.width().max(0.0) as u32);
        canvas.set_height(rect.height().max(0.0) as u32);
    }
}

/// The pointer position in paint-canvas coordinates.
fn mask_point(client_x: f64, client_y: f64) -> Option<CanvasPoint> {
    let rect = element_rect(MASK_CANVAS_ID)?;
    Some(geometry::to_canvas_point(
        client_x,
        client_y,
        rect.left(),
        rect.top(),
    ))
}

/// Props for the [`ImageEditor`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ImageEditorProps {
    /// The working image as a data URI.
    image: String,
    /// Tool to open with.
    initial_mode: EditMode,
    /// Disables apply while a generation is in flight.
    busy: bool,
    /// Fired with the binarized mask and the edit prompt.
    on_apply_mask: EventHandler<(ImageResource, String)>,
    /// Fired with the final slider values.
    on_apply_adjust: EventHandler<Adjustments>,
    /// Fired with the final crop selection.
    on_apply_crop: EventHandler<CropRect>,
    /// Fired when the editor is dismissed.
    on_cancel: EventHandler<()>,
}

/// The modal image editor.
#[component]
pub fn ImageEditor(props: ImageEditorProps) -> Element {
    let ImageEditorProps {
        image,
        initial_mode,
        busy,
        on_apply_mask,
        on_apply_adjust,
        on_apply_crop,
        on_cancel,
    } = props;
    let mut session = use_signal(move || EditSession::open(initial_mode));
    let mut painting = use_signal(|| Option::<CanvasPoint>::None);
    let mut crop_drag = use_signal(|| Option::<CropDrag>::None);
    let mut error = use_signal(|| Option::<String>::None);

    let mut set_mode = move |mode: EditMode| {
        session.write().switch_to(mode);
        error.set(None);
        if mode == EditMode::Mask {
            sync_canvas_to_image();
        }
    };

    let current = session();
    let mode = current.mode;

    let apply = move |_| {
        let state = session();
        match state.mode {
            EditMode::Mask => {
                if state.edit_prompt.trim().is_empty() {
                    error.set(Some("Describe the change to make first.".to_string()));
                    return;
                }
                match canvas::canvas_by_id(MASK_CANVAS_ID).and_then(|c| canvas::read_mask(&c)) {
                    Ok(mask) => on_apply_mask.call((mask, state.edit_prompt.clone())),
                    Err(e) => error.set(Some(format!("Could not read the mask: {e}"))),
                }
            }
            EditMode::Adjust => on_apply_adjust.call(state.adjustments),
            EditMode::Crop => on_apply_crop.call(state.crop_rect),
            EditMode::None => {}
        }
    };

    // CSS filter string mirroring the adjustment semantics applied on
    // save, so the preview is faithful to the final pixels.
    let a = current.adjustments;
    let filter = if mode == EditMode::Adjust {
        format!(
            "brightness({}%) contrast({}%) saturate({}%)",
            a.brightness, a.contrast, a.saturation,
        )
    } else {
        String::new()
    };

    let rect = current.crop_rect;
    let handles: [(CropHandle, &str); 8] = [
        (CropHandle::TopLeft, "tl"),
        (CropHandle::Top, "tm"),
        (CropHandle::TopRight, "tr"),
        (CropHandle::Left, "ml"),
        (CropHandle::Right, "mr"),
        (CropHandle::BottomLeft, "bl"),
        (CropHandle::Bottom, "bm"),
        (CropHandle::BottomRight, "br"),
    ];

    rsx! {
        div { class: "editor",
            div { class: "editor-toolbar",
                button {
                    class: if mode == EditMode::Mask { "tool-btn tool-active" } else { "tool-btn" },
                    title: "AI edit (paint a mask)",
                    onclick: move |_| set_mode(EditMode::Mask),
                    Icon { icon: LdPaintbrush, width: 16, height: 16 }
                }
                button {
                    class: if mode == EditMode::Adjust { "tool-btn tool-active" } else { "tool-btn" },
                    title: "Adjust",
                    onclick: move |_| set_mode(EditMode::Adjust),
                    Icon { icon: LdSlidersHorizontal, width: 16, height: 16 }
                }
                button {
                    class: if mode == EditMode::Crop { "tool-btn tool-active" } else { "tool-btn" },
                    title: "Crop",
                    onclick: move |_| set_mode(EditMode::Crop),
                    Icon { icon: LdCrop, width: 16, height: 16 }
                }
                span { class: "toolbar-spacer" }
                button {
                    class: "tool-btn apply-btn",
                    title: "Apply",
                    disabled: busy,
                    onclick: apply,
                    Icon { icon: LdCheck, width: 16, height: 16 }
                }
                button {
                    class: "tool-btn",
                    title: "Cancel",
                    onclick: move |_| on_cancel.call(()),
                    Icon { icon: LdX, width: 16, height: 16 }
                }
            }

            if let Some(message) = error() {
                p { class: "editor-error", "{message}" }
            }

            div {
                id: EDIT_WRAPPER_ID,
                class: "edit-image-wrapper",
                onpointermove: move |evt| {
                    let Some(drag) = crop_drag() else { return };
                    let Some(bounds) = element_rect(EDIT_WRAPPER_ID) else { return };
                    let point = evt.client_coordinates();
                    let (dx, dy) = geometry::to_percent_delta(
                        point.x - drag.start_x,
                        point.y - drag.start_y,
                        bounds.width(),
                        bounds.height(),
                    );
                    session.write().crop_rect =
                        geometry::drag_crop_rect(&drag.start_rect, drag.handle, dx, dy);
                },
                onpointerup: move |_| crop_drag.set(None),
                onpointerleave: move |_| crop_drag.set(None),

                img {
                    id: EDIT_IMAGE_ID,
                    class: "edit-image",
                    src: "{image}",
                    style: if filter.is_empty() { String::new() } else { format!("filter: {filter}") },
                    onload: move |_| {
                        if session.read().mode == EditMode::Mask {
                            sync_canvas_to_image();
                        }
                    },
                }

                canvas {
                    id: MASK_CANVAS_ID,
                    class: if mode == EditMode::Mask { "mask-canvas" } else { "mask-canvas hidden-input" },
                    onpointerdown: move |evt| {
                        if session.read().mode != EditMode::Mask {
                            return;
                        }
                        let point = evt.client_coordinates();
                        if let Some(local) = mask_point(point.x, point.y) {
                            let diameter = session.read().brush_diameter;
                            let _ = canvas::canvas_by_id(MASK_CANVAS_ID)
                                .and_then(|c| canvas::stroke_segment(&c, local, local, diameter));
                            painting.set(Some(local));
                        }
                    },
                    onpointermove: move |evt| {
                        let Some(last) = painting() else { return };
                        let point = evt.client_coordinates();
                        if let Some(local) = mask_point(point.x, point.y) {
                            let diameter = session.read().brush_diameter;
                            let _ = canvas::canvas_by_id(MASK_CANVAS_ID)
                                .and_then(|c| canvas::stroke_segment(&c, last, local, diameter));
                            painting.set(Some(local));
                        }
                    },
                    onpointerup: move |_| painting.set(None),
                    onpointerleave: move |_| painting.set(None),
                }

                if mode == EditMode::Crop {
                    div {
                        class: "crop-box",
                        style: "left: {rect.x}%; top: {rect.y}%; width: {rect.width}%; height: {rect.height}%;",
                        onpointerdown: move |evt| {
                            evt.stop_propagation();
                            let point = evt.client_coordinates();
                            crop_drag.set(Some(CropDrag {
                                handle: CropHandle::Move,
                                start_rect: session.read().crop_rect,
                                start_x: point.x,
                                start_y: point.y,
                            }));
                        },
                        for (handle, code) in handles {
                            div {
                                key: "{code}",
                                class: "crop-handle crop-{code}",
                                onpointerdown: move |evt| {
                                    evt.stop_propagation();
                                    let point = evt.client_coordinates();
                                    crop_drag.set(Some(CropDrag {
                                        handle,
                                        start_rect: session.read().crop_rect,
                                        start_x: point.x,
                                        start_y: point.y,
                                    }));
                                },
                            }
                        }
                    }
                }
            }

            match mode {
                EditMode::Mask => rsx! {
                    div { class: "editor-controls",
                        label { class: "control-label", r#for: "brush-size", "Brush size" }
                        input {
                            id: "brush-size",
                            r#type: "range",
                            min: 5,
                            max: 100,
                            value: "{current.brush_diameter}",
                            oninput: move |evt| {
                                if let Ok(size) = evt.value().parse::<u32>() {
                                    session.write().brush_diameter = size;
                                }
                            },
                        }
                        button {
                            class: "icon-btn",
                            title: "Clear mask",
                            onclick: move |_| {
                                let _ = canvas::canvas_by_id(MASK_CANVAS_ID)
                                    .and_then(|c| canvas::clear(&c));
                            },
                            Icon { icon: LdEraser, width: 16, height: 16 }
                        }
                        input {
                            class: "edit-prompt-input",
                            placeholder: "Describe the change for the painted area...",
                            value: "{current.edit_prompt}",
                            oninput: move |evt| session.write().edit_prompt = evt.value(),
                        }
                    }
                },
                EditMode::Adjust => rsx! {
                    div { class: "editor-controls",
                        AdjustSlider {
                            label: "Brightness",
                            value: a.brightness,
                            on_change: move |value| session.write().adjustments.brightness = value,
                        }
                        AdjustSlider {
                            label: "Contrast",
                            value: a.contrast,
                            on_change: move |value| session.write().adjustments.contrast = value,
                        }
                        AdjustSlider {
                            label: "Saturation",
                            value: a.saturation,
                            on_change: move |value| session.write().adjustments.saturation = value,
                        }
                        button {
                            class: "icon-btn",
                            title: "Reset adjustments",
                            onclick: move |_| session.write().adjustments = Adjustments::IDENTITY,
                            "Reset"
                        }
                    }
                },
                EditMode::Crop => rsx! {
                    div { class: "editor-controls",
                        p { class: "editor-hint", "Drag the box or its handles, then apply." }
                    }
                },
                EditMode::None => rsx! {},
            }
        }
    }
}

/// Props for one 0-200% adjustment slider.
#[derive(Props, Clone, PartialEq)]
struct AdjustSliderProps {
    label: &'static str,
    value: u16,
    on_change: EventHandler<u16>,
}

#[component]
fn AdjustSlider(props: AdjustSliderProps) -> Element {
    rsx! {
        label { class: "slider-row",
            span { class: "control-label", "{props.label}" }
            input {
                r#type: "range",
                min: 0,
                max: 200,
                value: "{props.value}",
                oninput: move |evt| {
                    if let Ok(value) = evt.value().parse::<u16>() {
                        props.on_change.call(value);
                    }
                },
            }
            span { class: "slider-value", "{props.value}%" }
        }
    }
}
