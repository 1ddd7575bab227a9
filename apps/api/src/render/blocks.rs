//! Building blocks shared by the layout variants.

use crate::editor::fields::{EditTarget, ListSection, PersonalField, TagList};
use crate::models::resume::{ResumeRecord, DEFAULT_ACCENT_COLOR};
use crate::render::document::{
    Color, Display, Editable, Element, Mark, Node, SectionKind, Side, Style, Tag,
};

pub const NAME_PLACEHOLDER: &str = "Your Name";

/// Colours a layout draws with. `accent` comes from the record; the neutrals
/// are fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
}

impl Theme {
    /// An unparseable accent falls back to the default accent.
    pub fn from_record(record: &ResumeRecord) -> Self {
        let accent = Color::from_hex(&record.accent_color)
            .or_else(|| Color::from_hex(DEFAULT_ACCENT_COLOR))
            .unwrap_or(Color::BLACK);
        Theme {
            accent,
            text: Color::rgb(0x1F, 0x29, 0x37),
            muted: Color::rgb(0x6B, 0x72, 0x80),
            border: Color::rgb(0xE5, 0xE7, 0xEB),
        }
    }

    /// A dark shade of the accent, for filled panels and rules.
    pub fn deep(&self) -> Color {
        self.accent.mix(Color::BLACK, 0.45)
    }

    /// A pale tint of the accent, for chip backgrounds.
    pub fn tint(&self) -> Color {
        self.accent.mix(Color::WHITE, 0.88)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Editable text
// ────────────────────────────────────────────────────────────────────────────

/// `value`, or `placeholder` when the value is blank.
pub fn editable(target: EditTarget, value: &str, placeholder: &str) -> Editable {
    if value.trim().is_empty() {
        Editable {
            target,
            text: placeholder.to_string(),
            placeholder: !placeholder.is_empty(),
        }
    } else {
        Editable {
            target,
            text: value.to_string(),
            placeholder: false,
        }
    }
}

/// An element wrapping a single editable node.
pub fn text_el(tag: Tag, style: Style, ed: Editable) -> Element {
    Element::new(tag).style(style).child(ed)
}

pub fn personal(record: &ResumeRecord, field: PersonalField, placeholder: &str) -> Editable {
    editable(
        EditTarget::personal(field),
        field.get(&record.personal_details),
        placeholder,
    )
}

pub fn name(record: &ResumeRecord) -> Editable {
    personal(record, PersonalField::Name, NAME_PLACEHOLDER)
}

pub fn summary(record: &ResumeRecord) -> Editable {
    editable(EditTarget::summary(), &record.summary, "")
}

/// Field `field` of `section[index]`.
pub fn entry(
    record: &ResumeRecord,
    section: ListSection,
    index: usize,
    field: &str,
    placeholder: &str,
) -> Editable {
    let value = section.value(record, index, field).unwrap_or_default();
    editable(EditTarget::entry(section, index, field), value, placeholder)
}

/// `start - end` of a dated entry.
pub fn date_range(record: &ResumeRecord, section: ListSection, index: usize, style: Style) -> Element {
    Element::new(Tag::Span)
        .style(style)
        .child(entry(record, section, index, "startDate", ""))
        .child(Node::text(" - "))
        .child(entry(record, section, index, "endDate", ""))
}

/// One editable per list item, in input order.
pub fn tag_items(record: &ResumeRecord, list: TagList) -> Vec<Editable> {
    list.items(record)
        .iter()
        .enumerate()
        .map(|(i, item)| editable(EditTarget::tag(list, i), item, ""))
        .collect()
}

/// Editables for the non-empty contact fields among `fields`.
pub fn contacts(record: &ResumeRecord, fields: &[PersonalField]) -> Vec<Editable> {
    fields
        .iter()
        .filter(|f| !f.get(&record.personal_details).trim().is_empty())
        .map(|f| personal(record, *f, ""))
        .collect()
}

/// Interleaves `items` with a literal separator, all inline.
pub fn separated(items: Vec<Editable>, separator: &str, style: Style) -> Element {
    let mut el = Element::new(Tag::P).style(style);
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            el = el.child(Node::text(separator));
        }
        el = el.child(item);
    }
    el
}

/// Each item as a chip in a wrapping row.
pub fn chips(items: Vec<Editable>, row: Style, chip: Style) -> Element {
    Element::new(Tag::Div)
        .style(row.display(Display::Wrap))
        .children(items.into_iter().map(|item| text_el(Tag::Span, chip.clone(), item)))
}

/// Each item as a list entry.
pub fn bullets(items: Vec<Editable>, list: Style, item: Style) -> Element {
    Element::new(Tag::Ul)
        .style(list)
        .children(items.into_iter().map(|ed| text_el(Tag::Li, item.clone(), ed)))
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

pub fn section(kind: SectionKind, style: Style) -> Element {
    Element::new(Tag::Section)
        .mark(Mark::Section(kind))
        .style(style)
}

pub fn heading(kind: SectionKind, tag: Tag, title: &str, style: Style) -> Element {
    Element::new(tag)
        .mark(Mark::Heading(kind))
        .style(style)
        .child(Node::text(title))
}

pub fn header(style: Style) -> Element {
    Element::new(Tag::Header).mark(Mark::Header).style(style)
}

/// Two-slot row: `left` flush left, `right` flush right.
pub fn spread(left: impl Into<Node>, right: impl Into<Node>, style: Style) -> Element {
    Element::new(Tag::Div)
        .style(style.display(Display::Row))
        .child(left)
        .child(right)
}

/// Rule under a heading.
pub fn underline(style: Style, width: f32, color: Color) -> Style {
    style.border(Side::Bottom, width, color)
}

/// Sections shared by every variant, omitted when the backing data is empty.
pub fn has(record: &ResumeRecord, kind: SectionKind) -> bool {
    match kind {
        SectionKind::Summary => !record.summary.trim().is_empty(),
        SectionKind::Experience => !record.experience.is_empty(),
        SectionKind::Education => !record.education.is_empty(),
        SectionKind::Projects => !record.projects.is_empty(),
        SectionKind::Skills => !record.skills.is_empty(),
        SectionKind::Languages => !record.languages.is_empty(),
        SectionKind::Certifications => !record.certifications.is_empty(),
        SectionKind::Contact => PersonalField::ALL
            .iter()
            .filter(|f| !matches!(f, PersonalField::Name | PersonalField::JobTitle))
            .any(|f| !f.get(&record.personal_details).trim().is_empty()),
    }
}
