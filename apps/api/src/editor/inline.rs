//! Inline-edit binder: text typed directly into the preview flows back into
//! the record and is mirrored into the sidebar.
//!
//! Inline commits never re-render. The edited node already shows the typed
//! text, so only the matching editable nodes of the current preview are
//! patched and the render counter is left alone.

use tracing::debug;

use crate::editor::fields::{join_list, EditSection, EditTarget, PersonalField};
use crate::editor::form::SUMMARY_CONTROL;
use crate::editor::{BindError, EditorState};

impl EditorState {
    /// Writes `text` to the record location addressed by
    /// `(section, field, index)`.
    ///
    /// An index one past the end of a list creates the element (and its form
    /// block) instead of failing. Anything further out is rejected before the
    /// record is touched, so indices stay dense.
    pub fn commit_inline_edit(
        &mut self,
        section: EditSection,
        field: Option<&str>,
        index: Option<usize>,
        text: &str,
    ) -> Result<(), BindError> {
        let target = match section {
            EditSection::PersonalDetails => {
                let name = field.ok_or_else(|| BindError::MissingField(section.key().to_string()))?;
                let field = PersonalField::from_key(name).ok_or_else(|| BindError::UnknownField {
                    section: section.key().to_string(),
                    field: name.to_string(),
                })?;
                *field.slot(&mut self.record.personal_details) = text.to_string();
                self.form.mirror_control(field.key(), text);
                EditTarget::personal(field)
            }

            EditSection::Summary => {
                self.record.summary = text.to_string();
                self.form.mirror_control(SUMMARY_CONTROL, text);
                EditTarget::summary()
            }

            EditSection::Skills | EditSection::Certifications | EditSection::Languages => {
                let list = section
                    .tag_list()
                    .ok_or_else(|| BindError::UnknownSection(section.key().to_string()))?;
                let index = index.ok_or_else(|| BindError::MissingIndex(section.key().to_string()))?;
                let items = list.items_mut(&mut self.record);
                check_position(section, index, items.len())?;
                if index == items.len() {
                    // An empty tag would collapse on the next parse of the control.
                    if text.trim().is_empty() {
                        return Ok(());
                    }
                    items.push(String::new());
                }
                items[index] = text.to_string();
                let joined = join_list(items);
                self.form.mirror_control(list.key(), &joined);
                EditTarget::tag(list, index)
            }

            EditSection::Education | EditSection::Experience | EditSection::Projects => {
                let list = section
                    .list()
                    .ok_or_else(|| BindError::UnknownSection(section.key().to_string()))?;
                let index = index.ok_or_else(|| BindError::MissingIndex(section.key().to_string()))?;
                let name = field.ok_or_else(|| BindError::MissingField(section.key().to_string()))?;
                let field = list.field(name)?;

                let before = list.len(&self.record);
                check_position(section, index, before)?;
                if let Some(slot) = list.slot(&mut self.record, index, field, true) {
                    *slot = text.to_string();
                }
                if list.len(&self.record) > before {
                    debug!(section = list.key(), index, "materialized list element from inline edit");
                    self.form.ensure_blocks(list, &self.record);
                }
                self.form.mirror_block(list, index, field, text);
                EditTarget::entry(list, index, field)
            }
        };

        self.preview.set_editable_text(&target, text);
        Ok(())
    }
}

fn check_position(section: EditSection, index: usize, len: usize) -> Result<(), BindError> {
    if index > len {
        return Err(BindError::OutOfRange {
            section: section.key().to_string(),
            position: index,
            len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::fields::ListSection;
    use crate::models::resume::{ExperienceEntry, ResumeRecord};

    fn with_two_jobs() -> EditorState {
        let mut record = ResumeRecord::default();
        for company in ["Acme", "Globex"] {
            record.experience.push(ExperienceEntry {
                company: company.to_string(),
                ..ExperienceEntry::default()
            });
        }
        EditorState::new(record)
    }

    #[test]
    fn test_inline_edit_materializes_missing_entry() {
        let mut state = with_two_jobs();
        state
            .commit_inline_edit(EditSection::Experience, Some("role"), Some(2), "Founder")
            .unwrap();

        assert_eq!(state.record.experience.len(), 3);
        assert_eq!(
            state.record.experience[2],
            ExperienceEntry {
                role: "Founder".to_string(),
                ..ExperienceEntry::default()
            }
        );
        assert_eq!(state.form.experience.len(), 3);
        assert_eq!(state.form.experience.blocks[2].binding.index, 2);
        assert_eq!(state.form.experience.blocks[2].values["role"], "Founder");
    }

    #[test]
    fn test_inline_edit_past_the_next_element_is_rejected() {
        let mut state = with_two_jobs();
        let err = state
            .commit_inline_edit(EditSection::Experience, Some("role"), Some(3), "Founder")
            .unwrap_err();
        assert_eq!(
            err,
            BindError::OutOfRange {
                section: "experience".to_string(),
                position: 3,
                len: 2,
            }
        );
        assert!(state
            .commit_inline_edit(EditSection::Projects, Some("title"), Some(200_000), "x")
            .is_err());
        assert_eq!(state.record.experience.len(), 2);
        assert_eq!(state.form.experience.len(), 2);
        assert!(state.record.projects.is_empty());
        assert!(state.form.projects.is_empty());
    }

    #[test]
    fn test_inline_edit_with_huge_index_leaves_lists_intact() {
        let mut record = ResumeRecord::default();
        record.skills = vec!["C++".to_string()];
        let mut state = EditorState::new(record);
        for section in [EditSection::Skills, EditSection::Languages] {
            assert!(matches!(
                state.commit_inline_edit(section, None, Some(usize::MAX), "x"),
                Err(BindError::OutOfRange { .. })
            ));
        }
        assert!(state
            .commit_inline_edit(EditSection::Education, Some("degree"), Some(usize::MAX), "x")
            .is_err());
        assert_eq!(state.record.skills, vec!["C++"]);
        assert!(state.record.languages.is_empty());
        assert!(state.record.education.is_empty());
    }

    #[test]
    fn test_inline_skill_append_survives_form_reparse() {
        let mut record = ResumeRecord::default();
        record.skills = vec!["C++".to_string(), "Math".to_string()];
        let mut state = EditorState::new(record);
        state
            .commit_inline_edit(EditSection::Skills, None, Some(2), "Rust")
            .unwrap();
        state
            .commit_inline_edit(EditSection::Skills, None, Some(3), "  ")
            .unwrap();
        assert_eq!(state.record.skills, vec!["C++", "Math", "Rust"]);

        let control = state.form.control("skills").unwrap().to_string();
        state.apply_field_change("skills", &control).unwrap();
        assert_eq!(state.record.skills, vec!["C++", "Math", "Rust"]);
    }

    #[test]
    fn test_inline_edit_does_not_rerender() {
        let mut state = with_two_jobs();
        let renders = state.render_count;
        state
            .commit_inline_edit(EditSection::PersonalDetails, Some("name"), None, "Ada Lovelace")
            .unwrap();

        assert_eq!(state.render_count, renders);
        assert_eq!(state.record.personal_details.name, "Ada Lovelace");
        assert_eq!(state.form.control("name"), Some("Ada Lovelace"));
        let node = state
            .preview
            .find_editable(&EditTarget::personal(PersonalField::Name))
            .unwrap();
        assert_eq!(node.text, "Ada Lovelace");
        assert!(!node.placeholder);
    }

    #[test]
    fn test_inline_edit_summary_ignores_index() {
        let mut state = EditorState::new(ResumeRecord::default());
        state
            .commit_inline_edit(EditSection::Summary, None, Some(7), "Curious")
            .unwrap();
        assert_eq!(state.record.summary, "Curious");
        assert_eq!(state.form.control("summary"), Some("Curious"));
    }

    #[test]
    fn test_inline_edit_skill_by_index_mirrors_joined_control() {
        let mut record = ResumeRecord::default();
        record.skills = vec!["C++".to_string(), "Math".to_string()];
        let mut state = EditorState::new(record);

        state
            .commit_inline_edit(EditSection::Skills, None, Some(1), "Analysis")
            .unwrap();
        assert_eq!(state.record.skills, vec!["C++", "Analysis"]);
        assert_eq!(state.form.control("skills"), Some("C++, Analysis"));
    }

    #[test]
    fn test_inline_edit_requires_address_parts() {
        let mut state = EditorState::new(ResumeRecord::default());
        assert_eq!(
            state.commit_inline_edit(EditSection::Skills, None, None, "x"),
            Err(BindError::MissingIndex("skills".to_string()))
        );
        assert_eq!(
            state.commit_inline_edit(EditSection::Education, None, Some(0), "x"),
            Err(BindError::MissingField("education".to_string()))
        );
        assert!(matches!(
            state.commit_inline_edit(EditSection::Education, Some("role"), Some(0), "x"),
            Err(BindError::UnknownField { .. })
        ));
        assert!(state.record.education.is_empty());
    }

    #[test]
    fn test_inline_edit_without_sidebar_block_is_not_an_error() {
        let mut state = with_two_jobs();
        state.form.experience.blocks.clear();
        state
            .commit_inline_edit(EditSection::Experience, Some("role"), Some(0), "CEO")
            .unwrap();
        assert_eq!(state.record.experience[0].role, "CEO");
    }

    #[test]
    fn test_inline_then_form_edit_share_bindings() {
        let mut state = with_two_jobs();
        state
            .commit_inline_edit(EditSection::Experience, Some("company"), Some(2), "Initech")
            .unwrap();
        let block = state.form.experience.blocks[2].block_id;
        state
            .update_list_item(ListSection::Experience, block, "role", "Intern")
            .unwrap();
        assert_eq!(state.record.experience[2].company, "Initech");
        assert_eq!(state.record.experience[2].role, "Intern");
    }
}
