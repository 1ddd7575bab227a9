//! Export pipeline: preview document → bitmap at 2× → A4 PDF.
//! CPU-bound; callers on the async runtime run it inside tokio::task::spawn_blocking.

pub mod pdf;
pub mod raster;

use thiserror::Error;

use crate::render::document::Document;

pub use raster::{Bitmap, PreviewRasterizer, Rasterizer, RusttypeFace, Typeface};

/// Upscale applied when rasterizing so the embedded image stays legible.
pub const RASTER_SCALE: f32 = 2.0;

const FILENAME_SUFFIX: &str = "_resume.pdf";
const FALLBACK_STEM: &str = "resume";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no preview font is configured")]
    FontUnavailable,

    #[error("font data could not be parsed")]
    InvalidFont,

    #[error("font file unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("rasterized preview is empty")]
    EmptyBitmap,

    #[error("canvas of {width}x{height} px exceeds the export limit")]
    TooLarge { width: u32, height: u32 },

    #[error("PDF encoding failed: {0}")]
    Encode(String),
}

impl From<lopdf::Error> for ExportError {
    fn from(e: lopdf::Error) -> Self {
        ExportError::Encode(e.to_string())
    }
}

/// A finished download.
#[derive(Debug, Clone)]
pub struct PdfExport {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// `<name>_resume.pdf`, with whitespace runs collapsed to `_` and anything
/// outside `[A-Za-z0-9_.-]` dropped. An empty result falls back to `resume`.
pub fn pdf_filename(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.trim().chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
            stem.push(c);
        }
    }
    if stem.trim_matches('_').is_empty() {
        stem = FALLBACK_STEM.to_string();
    }
    format!("{stem}{FILENAME_SUFFIX}")
}

/// Rasterizes `doc` and wraps the bitmap in a page-width-fitted PDF.
/// Nothing is produced unless every stage succeeds.
pub fn export_to_pdf(
    doc: &Document,
    suggested_name: &str,
    rasterizer: &dyn Rasterizer,
) -> Result<PdfExport, ExportError> {
    let bitmap = rasterizer.rasterize(doc, RASTER_SCALE)?;
    if bitmap.is_empty() {
        return Err(ExportError::EmptyBitmap);
    }
    let (bytes, pages) = pdf::encode_pdf(&bitmap)?;
    tracing::debug!(
        width = bitmap.width,
        height = bitmap.height,
        pages,
        size = bytes.len(),
        "Encoded resume PDF"
    );
    Ok(PdfExport {
        filename: pdf_filename(suggested_name),
        bytes,
        pages,
    })
}
