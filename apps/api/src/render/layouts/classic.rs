use crate::editor::fields::{ListSection, PersonalField};
use crate::models::resume::ResumeRecord;
use crate::render::blocks::{
    contacts, date_range, entry, has, header, heading, name, section, separated, spread, summary,
    text_el, underline, Theme,
};
use crate::render::document::{Align, Element, Node, SectionKind, Side, Style, Tag};
use crate::render::layouts::skills_block;

pub fn render(record: &ResumeRecord, theme: &Theme) -> Element {
    let mut root = Element::new(Tag::Div).style(Style::new().size(1.0).color(theme.text));

    root = root.child(
        header(
            Style::new()
                .align(Align::Center)
                .border(Side::Bottom, 1.0, theme.accent)
                .padding(1.0)
                .margin_bottom(1.0),
        )
        .child(text_el(
            Tag::H1,
            Style::new().size(2.0).bold().uppercase(),
            name(record),
        ))
        .child(separated(
            contacts(
                record,
                &[PersonalField::Address, PersonalField::Phone, PersonalField::Email],
            ),
            " | ",
            Style::new().size(1.0),
        )),
    );

    if has(record, SectionKind::Summary) {
        root = root.child(
            section(SectionKind::Summary, Style::new().margin_bottom(1.0))
                .child(section_heading(SectionKind::Summary, "PROFESSIONAL SUMMARY", theme))
                .child(text_el(Tag::P, Style::new().size(0.95).pre_line(), summary(record))),
        );
    }

    if has(record, SectionKind::Experience) {
        root = root.child(
            section(SectionKind::Experience, Style::new().margin_bottom(1.0))
                .child(section_heading(SectionKind::Experience, "EXPERIENCE", theme))
                .children((0..record.experience.len()).map(|i| experience_item(record, i))),
        );
    }

    if has(record, SectionKind::Education) {
        root = root.child(
            section(SectionKind::Education, Style::new().margin_bottom(1.0))
                .child(section_heading(SectionKind::Education, "EDUCATION", theme))
                .children((0..record.education.len()).map(|i| education_item(record, i))),
        );
    }

    if has(record, SectionKind::Skills) {
        root = root.child(skills_block(record, theme, None));
    }

    root
}

fn section_heading(kind: SectionKind, title: &str, theme: &Theme) -> Element {
    heading(
        kind,
        Tag::H3,
        title,
        underline(Style::new().size(1.1).bold().margin_bottom(0.5), 1.0, theme.accent),
    )
}

fn experience_item(record: &ResumeRecord, i: usize) -> Node {
    let s = ListSection::Experience;
    Element::new(Tag::Div)
        .style(Style::new().margin_bottom(0.8))
        .child(spread(
            text_el(Tag::Span, Style::inline().bold(), entry(record, s, i, "company", "")),
            date_range(record, s, i, Style::inline()),
            Style::new(),
        ))
        .child(text_el(Tag::Div, Style::new().italic(), entry(record, s, i, "role", "")))
        .child(text_el(
            Tag::P,
            Style::new().size(0.9).pre_line(),
            entry(record, s, i, "description", ""),
        ))
        .into()
}

fn education_item(record: &ResumeRecord, i: usize) -> Node {
    let s = ListSection::Education;
    Element::new(Tag::Div)
        .style(Style::new().margin_bottom(0.5))
        .child(spread(
            text_el(Tag::Span, Style::inline().bold(), entry(record, s, i, "institution", "")),
            date_range(record, s, i, Style::inline()),
            Style::new(),
        ))
        .child(text_el(Tag::Div, Style::new(), entry(record, s, i, "degree", "")))
        .into()
}
