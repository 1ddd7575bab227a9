use crate::editor::fields::{ListSection, PersonalField, TagList};
use crate::models::resume::ResumeRecord;
use crate::render::blocks::{
    bullets, contacts, date_range, entry, has, header, heading, name, personal, section, spread,
    summary, tag_items, text_el, underline, Theme,
};
use crate::render::document::{
    Color, Display, Element, Node, SectionKind, Side, Style, Tag, Weight,
};

pub fn render(record: &ResumeRecord, theme: &Theme) -> Element {
    let navy = theme.accent.mix(Color::BLACK, 0.35);

    let mut root = Element::new(Tag::Div).style(
        Style::new()
            .border(Side::All, 1.0, Color::rgb(0xEE, 0xEE, 0xEE))
            .padding(2.0)
            .color(theme.text),
    );

    root = root.child(
        header(
            Style::new()
                .border(Side::Bottom, 4.0, navy)
                .padding(1.5)
                .margin_bottom(2.0),
        )
        .child(text_el(
            Tag::H1,
            Style::new().size(2.8).bold().color(navy),
            name(record),
        ))
        .child(text_el(
            Tag::H2,
            Style::new()
                .size(1.3)
                .weight(Weight::Light)
                .uppercase()
                .color(Color::rgb(0x55, 0x55, 0x55)),
            personal(record, PersonalField::JobTitle, "EXECUTIVE LEADER"),
        ))
        .child(
            Element::new(Tag::Div)
                .style(
                    Style::new()
                        .display(Display::Wrap)
                        .gap(1.5)
                        .size(0.85)
                        .color(Color::rgb(0x77, 0x77, 0x77)),
                )
                .children(contacts(
                    record,
                    &[PersonalField::Email, PersonalField::Phone, PersonalField::Address],
                )),
        ),
    );

    if has(record, SectionKind::Summary) {
        root = root.child(
            section(SectionKind::Summary, Style::new().margin_bottom(2.0))
                .child(heading(
                    SectionKind::Summary,
                    Tag::H3,
                    "PROFILE",
                    Style::new()
                        .background(navy)
                        .color(Color::WHITE)
                        .bold()
                        .padding(0.3)
                        .margin_bottom(1.0),
                ))
                .child(text_el(
                    Tag::P,
                    Style::new().color(Color::rgb(0x44, 0x44, 0x44)).pre_line(),
                    summary(record),
                )),
        );
    }

    let mut career = Element::new(Tag::Div);
    if has(record, SectionKind::Experience) {
        career = career.child(
            section(SectionKind::Experience, Style::new().margin_bottom(2.0))
                .child(ruled_heading(SectionKind::Experience, "CAREER HISTORY", navy))
                .children((0..record.experience.len()).map(|i| experience_item(record, i, navy))),
        );
    }

    let mut side = Element::new(Tag::Div);
    if has(record, SectionKind::Skills) {
        side = side.child(
            section(SectionKind::Skills, Style::new().margin_bottom(2.0))
                .child(ruled_heading(SectionKind::Skills, "CORE COMPETENCIES", navy))
                .child(bullets(
                    tag_items(record, TagList::Skills),
                    Style::new().size(0.9).color(Color::rgb(0x44, 0x44, 0x44)),
                    Style::new().margin_bottom(0.5),
                )),
        );
    }
    if has(record, SectionKind::Education) {
        side = side.child(
            section(SectionKind::Education, Style::new())
                .child(ruled_heading(SectionKind::Education, "ACADEMIC BACKGROUND", navy))
                .children((0..record.education.len()).map(|i| education_item(record, i))),
        );
    }

    if !career.children.is_empty() || !side.children.is_empty() {
        root = root.child(
            Element::new(Tag::Div)
                .style(Style::new().columns(&[2.0, 1.0], 2.5))
                .child(career)
                .child(side),
        );
    }

    root
}

fn ruled_heading(kind: SectionKind, title: &str, navy: Color) -> Element {
    heading(
        kind,
        Tag::H3,
        title,
        underline(
            Style::new().size(1.1).bold().color(navy).padding(0.3).margin_bottom(1.0),
            2.0,
            navy,
        ),
    )
}

fn experience_item(record: &ResumeRecord, i: usize, navy: Color) -> Node {
    let s = ListSection::Experience;
    Element::new(Tag::Div)
        .style(Style::new().margin_bottom(1.5))
        .child(spread(
            text_el(
                Tag::H4,
                Style::inline().size(1.1).bold().color(Color::rgb(0x22, 0x22, 0x22)),
                entry(record, s, i, "role", ""),
            ),
            date_range(record, s, i, Style::inline().size(0.8).bold()),
            Style::new(),
        ))
        .child(text_el(
            Tag::Div,
            Style::new().bold().size(0.95).color(navy).margin_bottom(0.5),
            entry(record, s, i, "company", ""),
        ))
        .child(text_el(
            Tag::P,
            Style::new().size(0.9).color(Color::rgb(0x55, 0x55, 0x55)).pre_line(),
            entry(record, s, i, "description", ""),
        ))
        .into()
}

fn education_item(record: &ResumeRecord, i: usize) -> Node {
    let s = ListSection::Education;
    Element::new(Tag::Div)
        .style(Style::new().size(0.85).margin_bottom(1.0))
        .child(text_el(Tag::Div, Style::new().bold(), entry(record, s, i, "degree", "")))
        .child(text_el(
            Tag::Div,
            Style::new().color(Color::rgb(0x66, 0x66, 0x66)),
            entry(record, s, i, "institution", ""),
        ))
        .child(
            Element::new(Tag::Div)
                .style(Style::new().color(Color::rgb(0x99, 0x99, 0x99)))
                .child(date_range(record, s, i, Style::inline())),
        )
        .into()
}
