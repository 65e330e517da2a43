/// Artifact export for imgscii: plain-text save and PNG rasterization.
pub mod rasterizer;
pub mod text;

pub use rasterizer::{ExportStyle, Rasterizer, export_png, find_system_font};
pub use text::save_text;
