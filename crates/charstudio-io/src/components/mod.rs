//! Dioxus UI components for charstudio.
//!
//! Provides the reference slot grid, the prompt/preset/aspect controls
//! panel, the mask/adjust/crop image editor, the generation result
//! view, and the history panel.

mod controls;
mod editor;
mod history_panel;
mod result;
mod slots;

pub use controls::ControlsPanel;
pub use editor::ImageEditor;
pub use history_panel::HistoryPanel;
pub use result::ResultView;
pub use slots::SlotGrid;
