//! Page layout for export: flows a preview document into positioned draw
//! operations on an A4-proportioned canvas.
//! CPU-bound; callers on the async runtime run it inside tokio::task::spawn_blocking.

pub mod flow;
pub mod font_metrics;

pub use flow::{layout_document, DrawOp, Layout, RectOp, TextRun};
pub use font_metrics::{get_metrics, FontFamily};

/// Text width oracle used while flowing text into lines.
pub trait TextMeasure {
    /// Advance width of `text` in css px when set at `size_px`.
    fn measure(&self, text: &str, size_px: f32, bold: bool) -> f32;
}
