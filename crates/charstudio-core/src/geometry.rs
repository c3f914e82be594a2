//! Pointer and crop-rectangle geometry.
//!
//! Pure coordinate math shared by the editor: converting viewport
//! pointer positions to canvas-local coordinates, pixel deltas to
//! percentage deltas, and resolving crop-handle drags into a new rect
//! that always satisfies the [`CropRect`] invariants.

use crate::types::CropRect;

/// A point in canvas-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPoint {
    /// Pixels from the canvas left edge.
    pub x: f64,
    /// Pixels from the canvas top edge.
    pub y: f64,
}

/// Convert a viewport (client) position to canvas-local coordinates,
/// given the canvas bounding rect's origin. Works identically for
/// mouse, touch, and pointer events once the caller has extracted a
/// client position.
#[must_use]
pub const fn to_canvas_point(
    client_x: f64,
    client_y: f64,
    bounds_left: f64,
    bounds_top: f64,
) -> CanvasPoint {
    CanvasPoint {
        x: client_x - bounds_left,
        y: client_y - bounds_top,
    }
}

/// Convert a pixel delta to a percentage-of-bounds delta.
///
/// Zero-sized bounds yield a zero delta rather than infinity (the
/// wrapper element can be momentarily unlaid-out during mount).
#[must_use]
pub fn to_percent_delta(dx: f64, dy: f64, bounds_width: f64, bounds_height: f64) -> (f64, f64) {
    let px = if bounds_width > 0.0 {
        dx / bounds_width * 100.0
    } else {
        0.0
    };
    let py = if bounds_height > 0.0 {
        dy / bounds_height * 100.0
    } else {
        0.0
    };
    (px, py)
}

/// Which part of the crop box a drag grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropHandle {
    /// Top-left corner.
    TopLeft,
    /// Top edge midpoint.
    Top,
    /// Top-right corner.
    TopRight,
    /// Left edge midpoint.
    Left,
    /// Right edge midpoint.
    Right,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom edge midpoint.
    Bottom,
    /// Bottom-right corner.
    BottomRight,
    /// The box interior: translate without resizing.
    Move,
}

impl CropHandle {
    const fn moves_left_edge(self) -> bool {
        matches!(self, Self::TopLeft | Self::Left | Self::BottomLeft)
    }

    const fn moves_right_edge(self) -> bool {
        matches!(self, Self::TopRight | Self::Right | Self::BottomRight)
    }

    const fn moves_top_edge(self) -> bool {
        matches!(self, Self::TopLeft | Self::Top | Self::TopRight)
    }

    const fn moves_bottom_edge(self) -> bool {
        matches!(self, Self::BottomLeft | Self::Bottom | Self::BottomRight)
    }
}

/// Resolve a crop-handle drag into a new rect.
///
/// `start` is the rect at drag start; `dx`/`dy` are the cumulative
/// percentage-space deltas since then. Edge handles pin the opposite
/// edge and clamp so the result always satisfies the [`CropRect`]
/// invariants: within `[0, 100]` on both axes and at least
/// [`CropRect::MIN_EXTENT`] along each.
#[must_use]
pub fn drag_crop_rect(start: &CropRect, handle: CropHandle, dx: f64, dy: f64) -> CropRect {
    let mut rect = *start;
    let right = start.x + start.width;
    let bottom = start.y + start.height;

    if handle == CropHandle::Move {
        rect.x = (start.x + dx).clamp(0.0, 100.0 - rect.width);
        rect.y = (start.y + dy).clamp(0.0, 100.0 - rect.height);
        return rect;
    }

    if handle.moves_left_edge() {
        rect.x = (start.x + dx).clamp(0.0, right - CropRect::MIN_EXTENT);
        rect.width = right - rect.x;
    } else if handle.moves_right_edge() {
        let new_right = (right + dx).clamp(start.x + CropRect::MIN_EXTENT, 100.0);
        rect.width = new_right - start.x;
    }

    if handle.moves_top_edge() {
        rect.y = (start.y + dy).clamp(0.0, bottom - CropRect::MIN_EXTENT);
        rect.height = bottom - rect.y;
    } else if handle.moves_bottom_edge() {
        let new_bottom = (bottom + dy).clamp(start.y + CropRect::MIN_EXTENT, 100.0);
        rect.height = new_bottom - start.y;
    }

    rect
}
