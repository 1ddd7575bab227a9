//! One module per layout variant. Each builds the full preview tree for a
//! record; a section whose backing string or list is empty is never emitted.

pub mod classic;
pub mod creative;
pub mod executive;
pub mod fallback;
pub mod minimalist;
pub mod modern;

use crate::editor::fields::TagList;
use crate::models::resume::ResumeRecord;
use crate::render::blocks::{chips, heading, section, separated, tag_items, underline, Theme};
use crate::render::document::{Color, Element, SectionKind, Style, Tag, Weight};

fn plain_heading(kind: SectionKind, title: &str) -> Element {
    heading(
        kind,
        Tag::H3,
        title,
        underline(
            Style::new().size(1.0).uppercase().bold().padding(0.2).margin_bottom(0.5),
            1.0,
            Color::rgb(0xE6, 0xE6, 0xE6),
        ),
    )
}

/// Skills as chips under a plain rule, optionally tinted.
pub(crate) fn skills_block(record: &ResumeRecord, theme: &Theme, color: Option<Color>) -> Element {
    let mut style = Style::new().margin_bottom(1.5);
    if let Some(color) = color {
        style = style.color(color);
    }
    section(SectionKind::Skills, style)
        .child(plain_heading(SectionKind::Skills, "Skills"))
        .child(chips(
            tag_items(record, TagList::Skills),
            Style::new().gap(0.4),
            Style::inline()
                .background(theme.tint())
                .padding(0.2)
                .radius(4.0)
                .size(0.85),
        ))
}

/// Languages as one comma-separated line.
pub(crate) fn languages_block(record: &ResumeRecord) -> Element {
    section(SectionKind::Languages, Style::new().margin_bottom(1.5))
        .child(plain_heading(SectionKind::Languages, "Languages"))
        .child(separated(
            tag_items(record, TagList::Languages),
            ", ",
            Style::new().size(0.9).weight(Weight::Normal),
        ))
}
