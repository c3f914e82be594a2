//! charstudio-core: Pure editing and session logic (sans-IO).
//!
//! Reference slot allocation, mask binarization, adjustment and crop
//! compositing, crop-drag geometry, data-URI encoding, and the
//! generation history log.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte buffers and returns structured data. All browser and network
//! interaction lives in `charstudio-io` and `charstudio-client`.

pub mod adjust;
pub mod crop;
pub mod encode;
pub mod geometry;
pub mod history;
pub mod mask;
pub mod slots;
pub mod types;

pub use encode::QualityTier;
pub use history::{HistoryItem, HistoryLog, HistoryStatus};
pub use slots::{ReferenceSlots, SLOT_COUNT};
pub use types::{
    Adjustments, AspectRatio, CropRect, EditError, EditMode, EditSession, ImageResource,
};
