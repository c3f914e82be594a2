//! charstudio-io: Browser I/O and Dioxus component library.
//!
//! Handles canvas access for mask painting, file downloads and Web
//! Share, `localStorage` persistence, API-key resolution, the rotating
//! generation status display, and the application's UI components.

pub mod canvas;
pub mod components;
pub mod config;
pub mod download;
pub mod presets;
pub mod share;
pub mod status;
pub mod storage;

pub use components::{ControlsPanel, HistoryPanel, ImageEditor, ResultView, SlotGrid};
pub use presets::CustomPresets;
pub use status::StatusRotation;
