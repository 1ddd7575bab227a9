//! Addressing vocabulary shared by the binders and the renderer: which
//! personal-detail fields exist, which sections hold index-addressed
//! sub-records, and how the comma-joined list controls round-trip.

use serde::{Deserialize, Serialize};

use crate::editor::BindError;
use crate::models::resume::{
    EducationEntry, ExperienceEntry, PersonalDetails, ProjectEntry, ResumeRecord,
};

// ────────────────────────────────────────────────────────────────────────────
// Personal details
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonalField {
    Name,
    JobTitle,
    Email,
    Phone,
    Address,
    Linkedin,
    Github,
}

impl PersonalField {
    pub const ALL: [PersonalField; 7] = [
        PersonalField::Name,
        PersonalField::JobTitle,
        PersonalField::Email,
        PersonalField::Phone,
        PersonalField::Address,
        PersonalField::Linkedin,
        PersonalField::Github,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// The form control name, identical to the JSON field name.
    pub fn key(&self) -> &'static str {
        match self {
            PersonalField::Name => "name",
            PersonalField::JobTitle => "jobTitle",
            PersonalField::Email => "email",
            PersonalField::Phone => "phone",
            PersonalField::Address => "address",
            PersonalField::Linkedin => "linkedin",
            PersonalField::Github => "github",
        }
    }

    pub fn get<'a>(&self, details: &'a PersonalDetails) -> &'a str {
        match self {
            PersonalField::Name => &details.name,
            PersonalField::JobTitle => &details.job_title,
            PersonalField::Email => &details.email,
            PersonalField::Phone => &details.phone,
            PersonalField::Address => &details.address,
            PersonalField::Linkedin => &details.linkedin,
            PersonalField::Github => &details.github,
        }
    }

    pub fn slot<'a>(&self, details: &'a mut PersonalDetails) -> &'a mut String {
        match self {
            PersonalField::Name => &mut details.name,
            PersonalField::JobTitle => &mut details.job_title,
            PersonalField::Email => &mut details.email,
            PersonalField::Phone => &mut details.phone,
            PersonalField::Address => &mut details.address,
            PersonalField::Linkedin => &mut details.linkedin,
            PersonalField::Github => &mut details.github,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Comma-joined string lists
// ────────────────────────────────────────────────────────────────────────────

/// The three string sequences the sidebar edits through one comma-joined input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagList {
    Skills,
    Certifications,
    Languages,
}

impl TagList {
    pub const ALL: [TagList; 3] = [TagList::Skills, TagList::Certifications, TagList::Languages];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn key(&self) -> &'static str {
        match self {
            TagList::Skills => "skills",
            TagList::Certifications => "certifications",
            TagList::Languages => "languages",
        }
    }

    pub fn items<'a>(&self, record: &'a ResumeRecord) -> &'a Vec<String> {
        match self {
            TagList::Skills => &record.skills,
            TagList::Certifications => &record.certifications,
            TagList::Languages => &record.languages,
        }
    }

    pub fn items_mut<'a>(&self, record: &'a mut ResumeRecord) -> &'a mut Vec<String> {
        match self {
            TagList::Skills => &mut record.skills,
            TagList::Certifications => &mut record.certifications,
            TagList::Languages => &mut record.languages,
        }
    }
}

/// Splits a comma-joined control value into list items: trimmed, empties dropped.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Synthesizes the comma-joined control value from list items.
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

// ────────────────────────────────────────────────────────────────────────────
// Index-addressed sections
// ────────────────────────────────────────────────────────────────────────────

/// Sections made of ordered sub-records, each rendered as one sidebar block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSection {
    Education,
    Experience,
    Projects,
}

impl ListSection {
    pub const ALL: [ListSection; 3] = [
        ListSection::Education,
        ListSection::Experience,
        ListSection::Projects,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn key(&self) -> &'static str {
        match self {
            ListSection::Education => "education",
            ListSection::Experience => "experience",
            ListSection::Projects => "projects",
        }
    }

    /// Field names a sub-record of this section carries, in form order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            ListSection::Education => EducationEntry::FIELDS,
            ListSection::Experience => ExperienceEntry::FIELDS,
            ListSection::Projects => ProjectEntry::FIELDS,
        }
    }

    /// Resolves a field name to this section's canonical `'static` spelling.
    pub fn field(&self, name: &str) -> Result<&'static str, BindError> {
        self.fields()
            .iter()
            .copied()
            .find(|f| *f == name)
            .ok_or_else(|| BindError::UnknownField {
                section: self.key().to_string(),
                field: name.to_string(),
            })
    }

    pub fn len(&self, record: &ResumeRecord) -> usize {
        match self {
            ListSection::Education => record.education.len(),
            ListSection::Experience => record.experience.len(),
            ListSection::Projects => record.projects.len(),
        }
    }

    /// Reads `field` of the element at `index`, if both exist.
    pub fn value<'a>(&self, record: &'a ResumeRecord, index: usize, field: &str) -> Option<&'a str> {
        match self {
            ListSection::Education => record.education.get(index)?.field(field),
            ListSection::Experience => record.experience.get(index)?.field(field),
            ListSection::Projects => record.projects.get(index)?.field(field),
        }
    }

    /// Returns the slot for `field` of the element at `index`.
    ///
    /// When `materialize` is set and `index` is exactly the current length, an
    /// empty element is appended first. Any other missing element is `None`.
    pub fn slot<'a>(
        &self,
        record: &'a mut ResumeRecord,
        index: usize,
        field: &str,
        materialize: bool,
    ) -> Option<&'a mut String> {
        match self {
            ListSection::Education => entry_slot(&mut record.education, index, field, materialize),
            ListSection::Experience => entry_slot(&mut record.experience, index, field, materialize),
            ListSection::Projects => entry_slot(&mut record.projects, index, field, materialize),
        }
    }

    /// Appends an element built from `defaults` (unknown keys ignored).
    pub fn push(&self, record: &mut ResumeRecord, defaults: &[(String, String)]) -> usize {
        match self {
            ListSection::Education => push_entry(&mut record.education, defaults),
            ListSection::Experience => push_entry(&mut record.experience, defaults),
            ListSection::Projects => push_entry(&mut record.projects, defaults),
        }
    }

    /// Removes the element at `position`. Returns false when out of range.
    pub fn remove(&self, record: &mut ResumeRecord, position: usize) -> bool {
        match self {
            ListSection::Education => remove_entry(&mut record.education, position),
            ListSection::Experience => remove_entry(&mut record.experience, position),
            ListSection::Projects => remove_entry(&mut record.projects, position),
        }
    }
}

fn entry_slot<'a, E: ListEntry>(
    entries: &'a mut Vec<E>,
    index: usize,
    field: &str,
    materialize: bool,
) -> Option<&'a mut String> {
    if materialize && index == entries.len() {
        entries.push(E::default());
    }
    entries.get_mut(index)?.field_mut(field)
}

fn push_entry<E: ListEntry>(entries: &mut Vec<E>, defaults: &[(String, String)]) -> usize {
    let mut entry = E::default();
    for (field, value) in defaults {
        if let Some(slot) = entry.field_mut(field) {
            *slot = value.clone();
        }
    }
    entries.push(entry);
    entries.len() - 1
}

fn remove_entry<E>(entries: &mut Vec<E>, position: usize) -> bool {
    if position < entries.len() {
        entries.remove(position);
        true
    } else {
        false
    }
}

/// Field-name access to a sub-record, so one binder serves all three sections.
pub trait ListEntry: Default {
    const FIELDS: &'static [&'static str];

    fn field(&self, name: &str) -> Option<&str>;
    fn field_mut(&mut self, name: &str) -> Option<&mut String>;
}

impl ListEntry for EducationEntry {
    const FIELDS: &'static [&'static str] =
        &["institution", "degree", "startDate", "endDate", "description"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "institution" => Some(&self.institution),
            "degree" => Some(&self.degree),
            "startDate" => Some(&self.start_date),
            "endDate" => Some(&self.end_date),
            "description" => Some(&self.description),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "institution" => Some(&mut self.institution),
            "degree" => Some(&mut self.degree),
            "startDate" => Some(&mut self.start_date),
            "endDate" => Some(&mut self.end_date),
            "description" => Some(&mut self.description),
            _ => None,
        }
    }
}

impl ListEntry for ExperienceEntry {
    const FIELDS: &'static [&'static str] =
        &["company", "role", "startDate", "endDate", "description"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "company" => Some(&self.company),
            "role" => Some(&self.role),
            "startDate" => Some(&self.start_date),
            "endDate" => Some(&self.end_date),
            "description" => Some(&self.description),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "company" => Some(&mut self.company),
            "role" => Some(&mut self.role),
            "startDate" => Some(&mut self.start_date),
            "endDate" => Some(&mut self.end_date),
            "description" => Some(&mut self.description),
            _ => None,
        }
    }
}

impl ListEntry for ProjectEntry {
    const FIELDS: &'static [&'static str] = &["title", "link", "description"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "link" => Some(&self.link),
            "description" => Some(&self.description),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "title" => Some(&mut self.title),
            "link" => Some(&mut self.link),
            "description" => Some(&mut self.description),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Inline-edit addresses
// ────────────────────────────────────────────────────────────────────────────

/// Section part of an inline-edit address carried by every editable preview node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditSection {
    PersonalDetails,
    Summary,
    Skills,
    Certifications,
    Languages,
    Education,
    Experience,
    Projects,
}

impl EditSection {
    pub const ALL: [EditSection; 8] = [
        EditSection::PersonalDetails,
        EditSection::Summary,
        EditSection::Skills,
        EditSection::Certifications,
        EditSection::Languages,
        EditSection::Education,
        EditSection::Experience,
        EditSection::Projects,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn key(&self) -> &'static str {
        match self {
            EditSection::PersonalDetails => "personalDetails",
            EditSection::Summary => "summary",
            EditSection::Skills => TagList::Skills.key(),
            EditSection::Certifications => TagList::Certifications.key(),
            EditSection::Languages => TagList::Languages.key(),
            EditSection::Education => ListSection::Education.key(),
            EditSection::Experience => ListSection::Experience.key(),
            EditSection::Projects => ListSection::Projects.key(),
        }
    }

    pub fn tag_list(&self) -> Option<TagList> {
        match self {
            EditSection::Skills => Some(TagList::Skills),
            EditSection::Certifications => Some(TagList::Certifications),
            EditSection::Languages => Some(TagList::Languages),
            _ => None,
        }
    }

    pub fn list(&self) -> Option<ListSection> {
        match self {
            EditSection::Education => Some(ListSection::Education),
            EditSection::Experience => Some(ListSection::Experience),
            EditSection::Projects => Some(ListSection::Projects),
            _ => None,
        }
    }
}

impl From<TagList> for EditSection {
    fn from(list: TagList) -> Self {
        match list {
            TagList::Skills => EditSection::Skills,
            TagList::Certifications => EditSection::Certifications,
            TagList::Languages => EditSection::Languages,
        }
    }
}

impl From<ListSection> for EditSection {
    fn from(section: ListSection) -> Self {
        match section {
            ListSection::Education => EditSection::Education,
            ListSection::Experience => EditSection::Experience,
            ListSection::Projects => EditSection::Projects,
        }
    }
}

/// `(section, field, index)` address of one editable text node.
///
/// `personalDetails` uses a field and no index, `summary` neither, the string
/// lists an index and no field, and the sub-record sections both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTarget {
    pub section: EditSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl EditTarget {
    pub fn personal(field: PersonalField) -> Self {
        EditTarget {
            section: EditSection::PersonalDetails,
            field: Some(field.key().to_string()),
            index: None,
        }
    }

    pub fn summary() -> Self {
        EditTarget {
            section: EditSection::Summary,
            field: None,
            index: None,
        }
    }

    pub fn tag(list: TagList, index: usize) -> Self {
        EditTarget {
            section: list.into(),
            field: None,
            index: Some(index),
        }
    }

    pub fn entry(section: ListSection, index: usize, field: &str) -> Self {
        EditTarget {
            section: section.into(),
            field: Some(field.to_string()),
            index: Some(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_list_trims_and_drops_empties() {
        assert_eq!(
            parse_list(" Rust,  Go ,, ,SQL, "),
            strings(&["Rust", "Go", "SQL"])
        );
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ,").is_empty());
    }

    #[test]
    fn test_join_then_parse_is_identity_for_plain_items() {
        let cases = [
            strings(&["C++", "Math"]),
            strings(&["English"]),
            strings(&[]),
            strings(&["AWS Certified Developer", "CKA", "PMP"]),
        ];
        for items in cases {
            assert_eq!(parse_list(&join_list(&items)), items);
        }
    }

    #[test]
    fn test_join_then_parse_collapses_blank_items() {
        let items = strings(&["Rust", "", "  ", " Go "]);
        assert_eq!(parse_list(&join_list(&items)), strings(&["Rust", "Go"]));
    }

    #[test]
    fn test_personal_field_keys_round_trip() {
        for field in PersonalField::ALL {
            assert_eq!(PersonalField::from_key(field.key()), Some(field));
        }
        assert_eq!(PersonalField::from_key("summary"), None);
    }

    #[test]
    fn test_edit_section_keys_match_serde_names() {
        for section in EditSection::ALL {
            let json = serde_json::to_value(section).unwrap();
            assert_eq!(json, section.key());
            assert_eq!(EditSection::from_key(section.key()), Some(section));
        }
        assert_eq!(EditSection::from_key("hobbies"), None);
    }

    #[test]
    fn test_section_field_rejects_foreign_names() {
        assert_eq!(ListSection::Projects.field("link").unwrap(), "link");
        assert!(ListSection::Projects.field("company").is_err());
    }

    #[test]
    fn test_slot_materializes_only_the_next_element() {
        let mut record = ResumeRecord::default();
        record.experience.push(ExperienceEntry::default());
        assert!(ListSection::Experience
            .slot(&mut record, 1, "role", false)
            .is_none());
        *ListSection::Experience
            .slot(&mut record, 1, "role", true)
            .unwrap() = "Engineer".to_string();
        assert_eq!(record.experience.len(), 2);
        assert_eq!(record.experience[1].role, "Engineer");

        assert!(ListSection::Experience
            .slot(&mut record, 5, "role", true)
            .is_none());
        assert!(ListSection::Experience
            .slot(&mut record, usize::MAX, "role", true)
            .is_none());
        assert_eq!(record.experience.len(), 2);
    }

    #[test]
    fn test_push_applies_known_defaults_only() {
        let mut record = ResumeRecord::default();
        let idx = ListSection::Projects.push(
            &mut record,
            &[
                ("title".to_string(), "Compiler".to_string()),
                ("bogus".to_string(), "ignored".to_string()),
            ],
        );
        assert_eq!(idx, 0);
        assert_eq!(record.projects[0].title, "Compiler");
        assert_eq!(record.projects[0].link, "");
    }
}
