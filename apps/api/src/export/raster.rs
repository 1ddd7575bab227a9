//! Software rasterizer for flowed preview layouts.

use std::path::Path;

use rusttype::{point, Font, Scale};

use crate::export::ExportError;
use crate::layout::{layout_document, DrawOp, RectOp, TextMeasure, TextRun};
use crate::render::document::{Color, Document};

/// Upper bound on pixels per export; a runaway layout fails instead of
/// allocating without limit.
const MAX_PIXELS: u64 = 60_000_000;

/// 8-bit RGB canvas, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl Bitmap {
    /// White canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgb: vec![0xFF; width as usize * height as usize * 3],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some(Color::rgb(self.rgb[idx], self.rgb[idx + 1], self.rgb[idx + 2]))
    }

    /// Mixes `color` over the pixel at (`x`, `y`) with `alpha` coverage.
    /// Out-of-canvas coordinates are ignored.
    pub fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        for (i, src) in [color.r, color.g, color.b].into_iter().enumerate() {
            let dst = self.rgb[idx + i] as f32;
            self.rgb[idx + i] = (src as f32 * alpha + dst * (1.0 - alpha)).round() as u8;
        }
    }

    /// Fills a rectangle, clipped to the canvas. A non-zero `radius` rounds
    /// the corners.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color, radius: f32) {
        let x0 = x.max(0.0).floor() as i32;
        let y0 = y.max(0.0).floor() as i32;
        let x1 = (x + width).min(self.width as f32).ceil() as i32;
        let y1 = (y + height).min(self.height as f32).ceil() as i32;
        let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
        for py in y0..y1 {
            for px in x0..x1 {
                let cx = px as f32 + 0.5;
                let cy = py as f32 + 0.5;
                let coverage = if r > 0.0 {
                    corner_coverage(cx, cy, x, y, width, height, r)
                } else {
                    1.0
                };
                if coverage > 0.0 {
                    self.blend(px, py, color, coverage);
                }
            }
        }
    }
}

fn corner_coverage(cx: f32, cy: f32, x: f32, y: f32, w: f32, h: f32, r: f32) -> f32 {
    let nx = cx.clamp(x + r, x + w - r);
    let ny = cy.clamp(y + r, y + h - r);
    let dist = ((cx - nx).powi(2) + (cy - ny).powi(2)).sqrt();
    (r - dist + 0.5).clamp(0.0, 1.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Seams
// ────────────────────────────────────────────────────────────────────────────

/// Turns a preview document into pixels.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, doc: &Document, scale: f32) -> Result<Bitmap, ExportError>;
}

/// A font that can both measure text for layout and paint it.
pub trait Typeface: TextMeasure + Send + Sync {
    /// Paints `run` (in layout px) onto `canvas`, multiplying coordinates by `scale`.
    fn draw_text(&self, canvas: &mut Bitmap, run: &TextRun, scale: f32);
}

/// Flows the document with the typeface's own metrics, then paints the
/// draw operations in order.
pub struct PreviewRasterizer<T> {
    face: T,
}

impl<T: Typeface> PreviewRasterizer<T> {
    pub fn new(face: T) -> Self {
        Self { face }
    }
}

impl<T: Typeface> Rasterizer for PreviewRasterizer<T> {
    fn rasterize(&self, doc: &Document, scale: f32) -> Result<Bitmap, ExportError> {
        let layout = layout_document(doc, &self.face);
        let width = (layout.width * scale).ceil() as u32;
        let height = (layout.height * scale).ceil() as u32;
        if width as u64 * height as u64 > MAX_PIXELS {
            return Err(ExportError::TooLarge { width, height });
        }

        let mut canvas = Bitmap::new(width, height);
        if layout.background != Color::WHITE {
            canvas.fill_rect(0.0, 0.0, width as f32, height as f32, layout.background, 0.0);
        }
        for op in &layout.ops {
            match op {
                DrawOp::Rect(RectOp {
                    x,
                    y,
                    width,
                    height,
                    color,
                    radius,
                }) => canvas.fill_rect(
                    x * scale,
                    y * scale,
                    width * scale,
                    height * scale,
                    *color,
                    radius * scale,
                ),
                DrawOp::Text(run) => self.face.draw_text(&mut canvas, run, scale),
            }
        }
        Ok(canvas)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TrueType
// ────────────────────────────────────────────────────────────────────────────

/// A TrueType/OpenType face rendered through `rusttype`. Bold is synthesized
/// by over-striking; italic is drawn upright.
pub struct RusttypeFace {
    font: Font<'static>,
}

impl RusttypeFace {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ExportError> {
        let font = Font::try_from_vec(bytes).ok_or(ExportError::InvalidFont)?;
        Ok(Self { font })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        Self::from_bytes(std::fs::read(path)?)
    }

    fn embolden_offset(size_px: f32) -> f32 {
        (size_px / 24.0).max(0.5)
    }
}

impl TextMeasure for RusttypeFace {
    fn measure(&self, text: &str, size_px: f32, bold: bool) -> f32 {
        let scale = Scale::uniform(size_px);
        let advance: f32 = self
            .font
            .layout(text, scale, point(0.0, 0.0))
            .map(|glyph| glyph.unpositioned().h_metrics().advance_width)
            .sum();
        if bold {
            advance + Self::embolden_offset(size_px)
        } else {
            advance
        }
    }
}

impl Typeface for RusttypeFace {
    fn draw_text(&self, canvas: &mut Bitmap, run: &TextRun, scale: f32) {
        let size = run.size * scale;
        let origin_x = run.x * scale;
        let baseline = run.baseline * scale;
        let strikes: &[f32] = if run.bold {
            &[0.0, 1.0]
        } else {
            &[0.0]
        };
        for strike in strikes {
            let dx = strike * Self::embolden_offset(size);
            let glyphs = self
                .font
                .layout(&run.text, Scale::uniform(size), point(origin_x + dx, baseline));
            for glyph in glyphs {
                if let Some(bb) = glyph.pixel_bounding_box() {
                    glyph.draw(|gx, gy, coverage| {
                        canvas.blend(bb.min.x + gx as i32, bb.min.y + gy as i32, run.color, coverage);
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::flow::{PAGE_HEIGHT_PX, PAGE_WIDTH_PX};
    use crate::models::resume::ResumeRecord;
    use crate::render::render;

    /// Paints each character as a solid box the size of its advance.
    struct BoxFace;

    impl TextMeasure for BoxFace {
        fn measure(&self, text: &str, size_px: f32, _bold: bool) -> f32 {
            text.chars().count() as f32 * size_px * 0.5
        }
    }

    impl Typeface for BoxFace {
        fn draw_text(&self, canvas: &mut Bitmap, run: &TextRun, scale: f32) {
            let width = self.measure(&run.text, run.size, run.bold) * scale;
            let height = run.size * 0.7 * scale;
            canvas.fill_rect(
                run.x * scale,
                run.baseline * scale - height,
                width,
                height,
                run.color,
                0.0,
            );
        }
    }

    #[test]
    fn test_blend_mixes_and_clips() {
        let mut bitmap = Bitmap::new(2, 2);
        bitmap.blend(0, 0, Color::BLACK, 1.0);
        bitmap.blend(1, 0, Color::BLACK, 0.5);
        bitmap.blend(-1, 5, Color::BLACK, 1.0);
        assert_eq!(bitmap.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(bitmap.pixel(1, 0), Some(Color::rgb(128, 128, 128)));
        assert_eq!(bitmap.pixel(1, 1), Some(Color::WHITE));
        assert_eq!(bitmap.pixel(2, 0), None);
    }

    #[test]
    fn test_rounded_rect_leaves_corners() {
        let mut bitmap = Bitmap::new(20, 20);
        bitmap.fill_rect(0.0, 0.0, 20.0, 20.0, Color::BLACK, 8.0);
        assert_eq!(bitmap.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(bitmap.pixel(10, 10), Some(Color::BLACK));
        assert_eq!(bitmap.pixel(10, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_canvas_is_upscaled() {
        let raster = PreviewRasterizer::new(BoxFace);
        let doc = render(&ResumeRecord::default());
        let bitmap = raster.rasterize(&doc, 2.0).unwrap();
        assert_eq!(bitmap.width, (PAGE_WIDTH_PX * 2.0).ceil() as u32);
        assert_eq!(bitmap.height, (PAGE_HEIGHT_PX * 2.0).ceil() as u32);
        assert_eq!(bitmap.rgb.len(), bitmap.width as usize * bitmap.height as usize * 3);
    }

    #[test]
    fn test_text_is_painted() {
        let raster = PreviewRasterizer::new(BoxFace);
        let mut record = ResumeRecord::default();
        record.personal_details.name = "Ada Lovelace".to_string();
        let bitmap = raster.rasterize(&render(&record), 1.0).unwrap();
        let dark = bitmap.rgb.chunks(3).filter(|px| px.iter().all(|c| *c < 100)).count();
        assert!(dark > 100);
    }

    #[test]
    fn test_runaway_canvas_is_rejected() {
        let raster = PreviewRasterizer::new(BoxFace);
        let doc = render(&ResumeRecord::default());
        let err = raster.rasterize(&doc, 20.0).unwrap_err();
        assert!(matches!(err, ExportError::TooLarge { .. }));
    }

    #[test]
    fn test_invalid_font_bytes_rejected() {
        let err = RusttypeFace::from_bytes(b"not a font".to_vec()).err().unwrap();
        assert!(matches!(err, ExportError::InvalidFont));
    }

    #[test]
    fn test_missing_font_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RusttypeFace::from_path(dir.path().join("missing.ttf")).err().unwrap();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
