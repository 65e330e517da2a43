/// Preview widgets for imgscii: scrollable ASCII canvas, settings sidebar,
/// status line, and overlays.
pub mod canvas;
pub mod ui;

pub use ui::{DrawContext, SIDEBAR_WIDTH, UiState, draw};
