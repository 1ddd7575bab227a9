//! Generic single-column layout for template types no built-in variant claims.
//! Shows every section, in record order, under plain headings.

use crate::editor::fields::{ListSection, PersonalField, TagList};
use crate::models::resume::ResumeRecord;
use crate::render::blocks::{
    contacts, date_range, entry, has, header, heading, name, personal, section, separated, spread,
    summary, tag_items, text_el, underline, Theme,
};
use crate::render::document::{Display, Element, Node, SectionKind, Style, Tag};

pub fn render(record: &ResumeRecord, theme: &Theme) -> Element {
    let mut root = Element::new(Tag::Div).style(Style::new().size(1.0).color(theme.text));

    root = root.child(
        header(Style::new().margin_bottom(1.5))
            .child(text_el(Tag::H1, Style::new().size(2.2).bold(), name(record)))
            .child(text_el(
                Tag::H3,
                Style::new().size(1.1).color(theme.accent),
                personal(record, PersonalField::JobTitle, ""),
            ))
            .child(
                Element::new(Tag::Div)
                    .style(Style::new().display(Display::Wrap).gap(1.0).size(0.9).color(theme.muted))
                    .children(contacts(
                        record,
                        &[
                            PersonalField::Email,
                            PersonalField::Phone,
                            PersonalField::Address,
                            PersonalField::Linkedin,
                            PersonalField::Github,
                        ],
                    )),
            ),
    );

    if has(record, SectionKind::Summary) {
        root = root.child(
            section(SectionKind::Summary, Style::new().margin_bottom(1.2))
                .child(section_heading(SectionKind::Summary, "Summary", theme))
                .child(text_el(Tag::P, Style::new().pre_line(), summary(record))),
        );
    }

    for (kind, list, title) in [
        (SectionKind::Experience, ListSection::Experience, "Experience"),
        (SectionKind::Education, ListSection::Education, "Education"),
        (SectionKind::Projects, ListSection::Projects, "Projects"),
    ] {
        if has(record, kind) {
            root = root.child(
                section(kind, Style::new().margin_bottom(1.2))
                    .child(section_heading(kind, title, theme))
                    .children((0..list.len(record)).map(|i| list_item(record, list, i, theme))),
            );
        }
    }

    for (kind, list, title) in [
        (SectionKind::Skills, TagList::Skills, "Skills"),
        (SectionKind::Certifications, TagList::Certifications, "Certifications"),
        (SectionKind::Languages, TagList::Languages, "Languages"),
    ] {
        if has(record, kind) {
            root = root.child(
                section(kind, Style::new().margin_bottom(1.2))
                    .child(section_heading(kind, title, theme))
                    .child(separated(tag_items(record, list), ", ", Style::new().size(0.9))),
            );
        }
    }

    root
}

fn section_heading(kind: SectionKind, title: &str, theme: &Theme) -> Element {
    heading(
        kind,
        Tag::H3,
        title,
        underline(
            Style::new().size(1.05).bold().color(theme.accent).margin_bottom(0.5),
            1.0,
            theme.border,
        ),
    )
}

/// Title line (with dates where the section has them), subtitle, description.
fn list_item(record: &ResumeRecord, list: ListSection, i: usize, theme: &Theme) -> Node {
    let (title, subtitle) = match list {
        ListSection::Experience => ("role", "company"),
        ListSection::Education => ("degree", "institution"),
        ListSection::Projects => ("title", "link"),
    };
    let title = text_el(Tag::Span, Style::inline().bold(), entry(record, list, i, title, ""));
    let first_line = if list == ListSection::Projects {
        Element::new(Tag::Div).child(title)
    } else {
        spread(
            title,
            date_range(record, list, i, Style::inline().color(theme.muted)),
            Style::new(),
        )
    };

    let mut item = Element::new(Tag::Div)
        .style(Style::new().margin_bottom(0.8))
        .child(first_line)
        .child(text_el(
            Tag::Div,
            Style::new().italic().color(theme.muted),
            entry(record, list, i, subtitle, ""),
        ));
    if list.fields().contains(&"description") {
        item = item.child(text_el(
            Tag::P,
            Style::new().size(0.9).pre_line(),
            entry(record, list, i, "description", ""),
        ));
    }
    item.into()
}
