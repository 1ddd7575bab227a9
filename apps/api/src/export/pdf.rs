//! Bitmap-in-PDF assembly.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::export::{Bitmap, ExportError};

pub const A4_WIDTH_PT: f32 = 595.0;
pub const A4_HEIGHT_PT: f32 = 842.0;

const IMAGE_NAME: &str = "Im0";

/// Where a bitmap lands once scaled to the page width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub width_pt: f32,
    pub height_pt: f32,
    pub pages: usize,
}

/// Scales a `width_px` × `height_px` image to the A4 width, keeping its
/// aspect ratio. Content taller than a page continues on the next one.
pub fn fit_to_page_width(width_px: u32, height_px: u32) -> PagePlacement {
    let height_pt = if width_px == 0 {
        0.0
    } else {
        height_px as f32 * A4_WIDTH_PT / width_px as f32
    };
    let pages = ((height_pt / A4_HEIGHT_PT) - 1e-3).ceil().max(1.0) as usize;
    PagePlacement {
        width_pt: A4_WIDTH_PT,
        height_pt,
        pages,
    }
}

/// Embeds `bitmap` as a single image XObject and draws it on as many A4
/// pages as its fitted height needs, shifted up one page height each time.
/// Returns the file bytes and the page count.
pub fn encode_pdf(bitmap: &Bitmap) -> Result<(Vec<u8>, usize), ExportError> {
    if bitmap.is_empty() {
        return Err(ExportError::EmptyBitmap);
    }
    let placement = fit_to_page_width(bitmap.width, bitmap.height);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => bitmap.width as i64,
            "Height" => bitmap.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
        },
        bitmap.rgb.clone(),
    );
    let image_id = doc.add_object(image);

    let mut kids: Vec<Object> = Vec::with_capacity(placement.pages);
    for page in 0..placement.pages {
        let y = A4_HEIGHT_PT - placement.height_pt + page as f32 * A4_HEIGHT_PT;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        placement.width_pt.into(),
                        0.0f32.into(),
                        0.0f32.into(),
                        placement.height_pt.into(),
                        0.0f32.into(),
                        y.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.0f32.into(), 0.0f32.into(), A4_WIDTH_PT.into(), A4_HEIGHT_PT.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { IMAGE_NAME => image_id },
            },
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => placement.pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok((bytes, placement.pages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_preserves_aspect_ratio() {
        let placement = fit_to_page_width(1588, 2246);
        assert_eq!(placement.width_pt, A4_WIDTH_PT);
        assert!((placement.height_pt - 2246.0 * 595.0 / 1588.0).abs() < 1e-3);
        assert_eq!(placement.pages, 1);
    }

    #[test]
    fn test_tall_bitmap_needs_more_pages() {
        assert_eq!(fit_to_page_width(595, 842).pages, 1);
        assert_eq!(fit_to_page_width(595, 843).pages, 2);
        assert_eq!(fit_to_page_width(595, 842 * 3).pages, 3);
    }

    #[test]
    fn test_encoded_pdf_loads_with_expected_pages() {
        let bitmap = Bitmap::new(100, 300);
        let (bytes, pages) = encode_pdf(&bitmap).unwrap();
        assert_eq!(pages, 3);
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_image_stream_is_compressed() {
        let bitmap = Bitmap::new(64, 64);
        let (bytes, _) = encode_pdf(&bitmap).unwrap();
        assert!(bytes.len() < bitmap.rgb.len());
    }

    #[test]
    fn test_empty_bitmap_not_encoded() {
        let err = encode_pdf(&Bitmap::new(0, 10)).unwrap_err();
        assert!(matches!(err, ExportError::EmptyBitmap));
    }
}
