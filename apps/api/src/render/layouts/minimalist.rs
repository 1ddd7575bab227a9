use crate::editor::fields::{ListSection, PersonalField, TagList};
use crate::models::resume::ResumeRecord;
use crate::render::blocks::{
    bullets, contacts, date_range, entry, has, header, heading, name, section, separated, spread,
    tag_items, text_el, underline, Theme,
};
use crate::render::document::{Align, Element, Node, SectionKind, Side, Style, Tag};

pub fn render(record: &ResumeRecord, theme: &Theme) -> Element {
    let root = Element::new(Tag::Div).style(Style::new().size(1.0).color(theme.text));

    let head = header(Style::new().align(Align::Center).margin_bottom(2.0))
        .child(text_el(
            Tag::H1,
            Style::new().size(3.0).bold().margin_bottom(0.5),
            name(record),
        ))
        .child(separated(
            contacts(
                record,
                &[PersonalField::Email, PersonalField::Phone, PersonalField::Address],
            ),
            " | ",
            Style::new().size(0.9).color(theme.muted),
        ));

    let mut aside = Element::new(Tag::Aside);
    if has(record, SectionKind::Skills) {
        aside = aside.child(
            section(SectionKind::Skills, Style::new().margin_bottom(2.0))
                .child(section_heading(SectionKind::Skills, "SKILLS", theme))
                .child(bullets(
                    tag_items(record, TagList::Skills),
                    Style::new().size(0.9),
                    Style::new().margin_bottom(0.3),
                )),
        );
    }
    if has(record, SectionKind::Education) {
        aside = aside.child(
            section(SectionKind::Education, Style::new().margin_bottom(2.0))
                .child(section_heading(SectionKind::Education, "EDUCATION", theme))
                .children((0..record.education.len()).map(|i| education_item(record, i, theme))),
        );
    }

    let mut main = Element::new(Tag::Div).style(
        Style::new()
            .border(Side::Left, 1.0, theme.border)
            .padding(1.0),
    );
    if has(record, SectionKind::Experience) {
        main = main.child(
            section(SectionKind::Experience, Style::new().margin_bottom(2.0))
                .child(section_heading(SectionKind::Experience, "EXPERIENCE", theme))
                .children((0..record.experience.len()).map(|i| experience_item(record, i))),
        );
    }
    if has(record, SectionKind::Projects) {
        main = main.child(
            section(SectionKind::Projects, Style::new())
                .child(section_heading(SectionKind::Projects, "PROJECTS", theme))
                .children((0..record.projects.len()).map(|i| project_item(record, i))),
        );
    }

    root.child(head).child(
        Element::new(Tag::Div)
            .style(Style::new().columns(&[1.0, 2.0], 2.0))
            .child(aside)
            .child(main),
    )
}

fn section_heading(kind: SectionKind, title: &str, theme: &Theme) -> Element {
    heading(
        kind,
        Tag::H4,
        title,
        underline(
            Style::new().bold().color(theme.accent).padding(0.2).margin_bottom(1.0),
            1.0,
            theme.text,
        ),
    )
}

fn education_item(record: &ResumeRecord, i: usize, theme: &Theme) -> Node {
    let s = ListSection::Education;
    Element::new(Tag::Div)
        .style(Style::new().size(0.85).margin_bottom(1.0))
        .child(text_el(Tag::Div, Style::new().bold(), entry(record, s, i, "degree", "")))
        .child(text_el(Tag::Div, Style::new(), entry(record, s, i, "institution", "")))
        .child(
            Element::new(Tag::Div)
                .style(Style::new().color(theme.muted))
                .child(date_range(record, s, i, Style::inline())),
        )
        .into()
}

fn experience_item(record: &ResumeRecord, i: usize) -> Node {
    let s = ListSection::Experience;
    Element::new(Tag::Div)
        .style(Style::new().margin_bottom(1.5))
        .child(spread(
            text_el(Tag::Span, Style::inline().bold(), entry(record, s, i, "role", "")),
            date_range(record, s, i, Style::inline()),
            Style::new(),
        ))
        .child(text_el(Tag::Div, Style::new().italic(), entry(record, s, i, "company", "")))
        .child(text_el(
            Tag::P,
            Style::new().size(0.9).pre_line(),
            entry(record, s, i, "description", ""),
        ))
        .into()
}

fn project_item(record: &ResumeRecord, i: usize) -> Node {
    let s = ListSection::Projects;
    Element::new(Tag::Div)
        .style(Style::new().margin_bottom(1.0))
        .child(text_el(Tag::Div, Style::new().bold(), entry(record, s, i, "title", "")))
        .child(text_el(
            Tag::P,
            Style::new().size(0.9).pre_line(),
            entry(record, s, i, "description", ""),
        ))
        .into()
}
