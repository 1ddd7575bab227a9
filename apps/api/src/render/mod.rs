//! Template renderer: a pure mapping from a resume record to a structured
//! preview document. Every call rebuilds the whole tree.

pub mod blocks;
pub mod document;
pub mod html;
pub mod layouts;

use crate::models::resume::ResumeRecord;
use crate::models::template::TemplateType;

use self::blocks::Theme;
use self::document::Document;

/// Renders `record` with the layout its `template_type` selects. Unknown
/// types use the fallback layout.
pub fn render(record: &ResumeRecord) -> Document {
    let theme = Theme::from_record(record);
    let root = match record.template_type {
        TemplateType::Modern => layouts::modern::render(record, &theme),
        TemplateType::Minimalist => layouts::minimalist::render(record, &theme),
        TemplateType::Classic => layouts::classic::render(record, &theme),
        TemplateType::Creative => layouts::creative::render(record, &theme),
        TemplateType::Executive => layouts::executive::render(record, &theme),
        TemplateType::Unknown => layouts::fallback::render(record, &theme),
    };
    Document {
        template_type: record.template_type,
        accent: theme.accent,
        background_image: None,
        root,
    }
}
