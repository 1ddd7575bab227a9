use crate::editor::fields::{ListSection, PersonalField, TagList};
use crate::models::resume::ResumeRecord;
use crate::render::blocks::{
    chips, contacts, date_range, entry, has, header, heading, name, personal, section, spread,
    summary, tag_items, text_el, underline, Theme,
};
use crate::render::document::{
    Align, Color, Element, Node, SectionKind, Side, Style, Tag, Weight,
};

pub fn render(record: &ResumeRecord, theme: &Theme) -> Element {
    let panel = theme.deep();
    let soft_white = Color::WHITE.mix(panel, 0.3);

    let mut sidebar = Element::new(Tag::Aside).style(
        Style::new()
            .background(panel)
            .color(Color::WHITE)
            .padding(2.0),
    );
    sidebar = sidebar.child(
        header(Style::new().align(Align::Center).margin_bottom(2.0))
            .child(text_el(
                Tag::H1,
                Style::new().size(1.8).bold().margin_bottom(1.0),
                name(record),
            ))
            .child(text_el(
                Tag::P,
                Style::new().size(1.0).weight(Weight::Light).color(soft_white),
                personal(record, PersonalField::JobTitle, ""),
            )),
    );

    if has(record, SectionKind::Contact) {
        let lines = contacts(
            record,
            &[PersonalField::Email, PersonalField::Phone, PersonalField::Linkedin],
        );
        if !lines.is_empty() {
            sidebar = sidebar.child(
                section(SectionKind::Contact, Style::new().margin_bottom(2.0))
                    .child(sidebar_heading(SectionKind::Contact, "CONTACT", soft_white))
                    .children(
                        lines
                            .into_iter()
                            .map(|ed| text_el(Tag::Div, Style::new().size(0.85).margin_bottom(0.5), ed)),
                    ),
            );
        }
    }

    if has(record, SectionKind::Skills) {
        sidebar = sidebar.child(
            section(SectionKind::Skills, Style::new())
                .child(sidebar_heading(SectionKind::Skills, "SKILLS", soft_white))
                .child(chips(
                    tag_items(record, TagList::Skills),
                    Style::new().gap(0.4),
                    Style::inline()
                        .border(Side::All, 1.0, soft_white)
                        .padding(0.2)
                        .radius(20.0)
                        .size(0.75),
                )),
        );
    }

    let mut main = Element::new(Tag::Div).style(Style::new().padding(3.0).background(Color::WHITE));
    if has(record, SectionKind::Summary) {
        main = main.child(
            section(SectionKind::Summary, Style::new().margin_bottom(2.5))
                .child(main_heading(SectionKind::Summary, "SUMMARY", panel))
                .child(text_el(
                    Tag::P,
                    Style::new().color(Color::rgb(0x66, 0x66, 0x66)).pre_line(),
                    summary(record),
                )),
        );
    }
    if has(record, SectionKind::Experience) {
        main = main.child(
            section(SectionKind::Experience, Style::new().margin_bottom(2.5))
                .child(main_heading(SectionKind::Experience, "EXPERIENCE", panel))
                .children((0..record.experience.len()).map(|i| experience_item(record, i, panel))),
        );
    }
    if has(record, SectionKind::Education) {
        main = main.child(
            section(SectionKind::Education, Style::new())
                .child(main_heading(SectionKind::Education, "EDUCATION", panel))
                .children((0..record.education.len()).map(|i| education_item(record, i))),
        );
    }

    Element::new(Tag::Div)
        .style(Style::new().columns(&[1.0, 2.5], 0.0).color(theme.text))
        .child(sidebar)
        .child(main)
}

fn sidebar_heading(kind: SectionKind, title: &str, rule: Color) -> Element {
    heading(
        kind,
        Tag::H4,
        title,
        underline(Style::new().bold().padding(0.5).margin_bottom(1.0), 1.0, rule),
    )
}

fn main_heading(kind: SectionKind, title: &str, panel: Color) -> Element {
    heading(
        kind,
        Tag::H2,
        title,
        Style::new().size(1.5).bold().color(panel).margin_bottom(1.5),
    )
}

fn experience_item(record: &ResumeRecord, i: usize, panel: Color) -> Node {
    let s = ListSection::Experience;
    Element::new(Tag::Div)
        .style(
            Style::new()
                .border(Side::Left, 2.0, Color::rgb(0xEE, 0xEE, 0xEE))
                .padding(0.75)
                .margin_bottom(1.5),
        )
        .child(spread(
            text_el(
                Tag::H4,
                Style::inline().bold().color(Color::rgb(0x33, 0x33, 0x33)),
                entry(record, s, i, "role", ""),
            ),
            date_range(
                record,
                s,
                i,
                Style::inline().size(0.8).color(Color::rgb(0x99, 0x99, 0x99)),
            ),
            Style::new().margin_bottom(0.3),
        ))
        .child(text_el(
            Tag::Div,
            Style::new().bold().size(0.9).color(panel).margin_bottom(0.5),
            entry(record, s, i, "company", ""),
        ))
        .child(text_el(
            Tag::P,
            Style::new().size(0.85).color(Color::rgb(0x66, 0x66, 0x66)).pre_line(),
            entry(record, s, i, "description", ""),
        ))
        .into()
}

fn education_item(record: &ResumeRecord, i: usize) -> Node {
    let s = ListSection::Education;
    Element::new(Tag::Div)
        .style(Style::new().margin_bottom(1.0))
        .child(text_el(
            Tag::H4,
            Style::new().bold().color(Color::rgb(0x33, 0x33, 0x33)),
            entry(record, s, i, "degree", ""),
        ))
        .child(
            Element::new(Tag::Div)
                .style(Style::new().size(0.9).color(Color::rgb(0x66, 0x66, 0x66)))
                .child(entry(record, s, i, "institution", ""))
                .child(Node::text(" | "))
                .child(date_range(record, s, i, Style::inline())),
        )
        .into()
}
