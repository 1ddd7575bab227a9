use crate::editor::fields::{ListSection, PersonalField, TagList};
use crate::models::resume::ResumeRecord;
use crate::render::blocks::{
    contacts, date_range, entry, has, header, heading, name, personal, section, separated,
    spread, summary, tag_items, text_el, underline, Theme,
};
use crate::render::document::{Display, Element, Node, SectionKind, Side, Style, Tag, Weight};
use crate::render::layouts::{languages_block, skills_block};

const CONTACT_FIELDS: [PersonalField; 5] = [
    PersonalField::Email,
    PersonalField::Phone,
    PersonalField::Address,
    PersonalField::Linkedin,
    PersonalField::Github,
];

pub fn render(record: &ResumeRecord, theme: &Theme) -> Element {
    let mut root = Element::new(Tag::Div).style(Style::new().size(1.0).color(theme.text));

    root = root.child(
        header(
            Style::new()
                .border(Side::Bottom, 2.0, theme.accent)
                .padding(1.0)
                .margin_bottom(1.5),
        )
        .child(text_el(
            Tag::H1,
            Style::new().size(2.5).bold().margin_bottom(0.2),
            name(record),
        ))
        .child(text_el(
            Tag::H3,
            Style::new().size(1.17).color(theme.accent).weight(Weight::Normal),
            personal(record, PersonalField::JobTitle, "Job Title"),
        ))
        .child(
            Element::new(Tag::Div)
                .style(Style::new().display(Display::Wrap).gap(1.0).size(0.9).color(theme.muted))
                .children(contacts(record, &CONTACT_FIELDS)),
        ),
    );

    if has(record, SectionKind::Summary) {
        root = root.child(
            section(SectionKind::Summary, Style::new().margin_bottom(1.5))
                .child(section_heading(SectionKind::Summary, "Summary", theme))
                .child(text_el(Tag::P, Style::new().size(0.95).pre_line(), summary(record))),
        );
    }

    if has(record, SectionKind::Experience) {
        root = root.child(
            section(SectionKind::Experience, Style::new().margin_bottom(1.5))
                .child(section_heading(SectionKind::Experience, "Experience", theme))
                .children((0..record.experience.len()).map(|i| experience_item(record, i, theme))),
        );
    }

    if has(record, SectionKind::Education) {
        root = root.child(
            section(SectionKind::Education, Style::new().margin_bottom(1.5))
                .child(section_heading(SectionKind::Education, "Education", theme))
                .children((0..record.education.len()).map(|i| education_item(record, i, theme))),
        );
    }

    if has(record, SectionKind::Projects) {
        root = root.child(
            section(SectionKind::Projects, Style::new().margin_bottom(1.5))
                .child(section_heading(SectionKind::Projects, "Projects", theme))
                .children((0..record.projects.len()).map(|i| project_item(record, i, theme))),
        );
    }

    if has(record, SectionKind::Certifications) {
        root = root.child(
            section(SectionKind::Certifications, Style::new().margin_bottom(1.5))
                .child(section_heading(SectionKind::Certifications, "Certifications", theme))
                .child(separated(
                    tag_items(record, TagList::Certifications),
                    " · ",
                    Style::new().size(0.9),
                )),
        );
    }

    let has_skills = has(record, SectionKind::Skills);
    let has_languages = has(record, SectionKind::Languages);
    if has_skills || has_languages {
        let left = if has_skills {
            skills_block(record, theme, Some(theme.accent))
        } else {
            Element::new(Tag::Div)
        };
        let right = if has_languages {
            languages_block(record)
        } else {
            Element::new(Tag::Div)
        };
        root = root.child(
            Element::new(Tag::Div)
                .style(Style::new().columns(&[1.0, 1.0], 2.0))
                .child(left)
                .child(right),
        );
    }

    root
}

fn section_heading(kind: SectionKind, title: &str, theme: &Theme) -> Element {
    heading(
        kind,
        Tag::H3,
        title,
        underline(
            Style::new()
                .size(1.0)
                .bold()
                .uppercase()
                .color(theme.accent)
                .padding(0.2)
                .margin_bottom(0.8),
            1.0,
            theme.border,
        ),
    )
}

fn experience_item(record: &ResumeRecord, i: usize, theme: &Theme) -> Node {
    let s = ListSection::Experience;
    Element::new(Tag::Div)
        .style(Style::new().margin_bottom(1.0))
        .child(spread(
            text_el(Tag::Span, Style::inline().bold(), entry(record, s, i, "role", "Role")),
            date_range(record, s, i, Style::inline().color(theme.muted)),
            Style::new(),
        ))
        .child(text_el(
            Tag::Div,
            Style::new().italic().color(theme.muted).margin_bottom(0.3),
            entry(record, s, i, "company", "Company"),
        ))
        .child(text_el(
            Tag::P,
            Style::new().size(0.9).pre_line(),
            entry(record, s, i, "description", ""),
        ))
        .into()
}

fn education_item(record: &ResumeRecord, i: usize, theme: &Theme) -> Node {
    let s = ListSection::Education;
    Element::new(Tag::Div)
        .style(Style::new().margin_bottom(0.8))
        .child(spread(
            text_el(Tag::Span, Style::inline().bold(), entry(record, s, i, "degree", "Degree")),
            date_range(record, s, i, Style::inline().color(theme.muted)),
            Style::new(),
        ))
        .child(text_el(
            Tag::Div,
            Style::new().color(theme.muted),
            entry(record, s, i, "institution", "Institution"),
        ))
        .into()
}

fn project_item(record: &ResumeRecord, i: usize, theme: &Theme) -> Node {
    let s = ListSection::Projects;
    Element::new(Tag::Div)
        .style(Style::new().margin_bottom(0.8))
        .child(spread(
            text_el(Tag::Span, Style::inline().bold(), entry(record, s, i, "title", "Project")),
            text_el(
                Tag::Span,
                Style::inline().color(theme.accent).size(0.85),
                entry(record, s, i, "link", ""),
            ),
            Style::new(),
        ))
        .child(text_el(
            Tag::P,
            Style::new().size(0.9).pre_line(),
            entry(record, s, i, "description", ""),
        ))
        .into()
}
