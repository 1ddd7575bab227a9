//! Form-to-model binder.
//!
//! The sidebar is a set of named scalar controls plus one container of form
//! blocks per list section. Each block carries a `ListBinding` naming the
//! record index it edits; every structural change to a list ends with an
//! explicit re-index pass so bindings always equal block positions.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::editor::fields::{join_list, parse_list, ListSection, PersonalField, TagList};
use crate::editor::{BindError, EditorState};
use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::models::template::{TemplateMeta, TemplateType};
use crate::store::TemplateCatalog;

pub const SUMMARY_CONTROL: &str = "summary";
pub const TEMPLATE_TYPE_CONTROL: &str = "templateType";
pub const ACCENT_COLOR_CONTROL: &str = "accentColor";

pub type BlockId = u64;

// ────────────────────────────────────────────────────────────────────────────
// Form surface
// ────────────────────────────────────────────────────────────────────────────

/// Which record element a form block writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBinding {
    pub section: ListSection,
    pub index: usize,
}

/// One sidebar block: the inputs for a single sub-record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormBlock {
    pub block_id: BlockId,
    pub binding: ListBinding,
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListContainer {
    pub blocks: Vec<FormBlock>,
}

impl ListContainer {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn find(&self, block_id: BlockId) -> Option<&FormBlock> {
        self.blocks.iter().find(|b| b.block_id == block_id)
    }

    /// Recomputes every binding from block order.
    fn reindex(&mut self) {
        for (i, block) in self.blocks.iter_mut().enumerate() {
            block.binding.index = i;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarForm {
    /// Scalar controls by name: personal details, `summary`, the comma-joined
    /// lists, `templateType` and `accentColor`.
    pub controls: BTreeMap<String, String>,
    pub education: ListContainer,
    pub experience: ListContainer,
    pub projects: ListContainer,
    #[serde(skip)]
    next_block_id: BlockId,
}

impl SidebarForm {
    pub fn control(&self, name: &str) -> Option<&str> {
        self.controls.get(name).map(String::as_str)
    }

    pub fn container(&self, section: ListSection) -> &ListContainer {
        match section {
            ListSection::Education => &self.education,
            ListSection::Experience => &self.experience,
            ListSection::Projects => &self.projects,
        }
    }

    fn container_mut(&mut self, section: ListSection) -> &mut ListContainer {
        match section {
            ListSection::Education => &mut self.education,
            ListSection::Experience => &mut self.experience,
            ListSection::Projects => &mut self.projects,
        }
    }

    /// Populates every control from `record` and rebuilds all list containers
    /// from scratch, one block per existing element.
    pub(crate) fn bind(&mut self, record: &ResumeRecord) {
        self.controls.clear();
        for field in PersonalField::ALL {
            self.controls.insert(
                field.key().to_string(),
                field.get(&record.personal_details).to_string(),
            );
        }
        self.controls
            .insert(SUMMARY_CONTROL.to_string(), record.summary.clone());
        for list in TagList::ALL {
            self.controls
                .insert(list.key().to_string(), join_list(list.items(record)));
        }
        self.controls.insert(
            TEMPLATE_TYPE_CONTROL.to_string(),
            record.template_type.as_str().to_string(),
        );
        self.controls
            .insert(ACCENT_COLOR_CONTROL.to_string(), record.accent_color.clone());

        for section in ListSection::ALL {
            self.container_mut(section).blocks.clear();
            for index in 0..section.len(record) {
                self.attach_block(section, index, record);
            }
        }
    }

    /// Appends blocks until the container matches the record's length.
    pub(crate) fn ensure_blocks(&mut self, section: ListSection, record: &ResumeRecord) {
        while self.container(section).len() < section.len(record) {
            let index = self.container(section).len();
            self.attach_block(section, index, record);
        }
    }

    fn attach_block(&mut self, section: ListSection, index: usize, record: &ResumeRecord) -> BlockId {
        let values = section
            .fields()
            .iter()
            .map(|f| {
                let value = section.value(record, index, f).unwrap_or_default();
                (f.to_string(), value.to_string())
            })
            .collect();
        self.next_block_id += 1;
        let block_id = self.next_block_id;
        self.container_mut(section).blocks.push(FormBlock {
            block_id,
            binding: ListBinding { section, index },
            values,
        });
        block_id
    }

    /// Best-effort write of `value` into the Nth block of `section`.
    pub(crate) fn mirror_block(&mut self, section: ListSection, index: usize, field: &str, value: &str) -> bool {
        match self.container_mut(section).blocks.get_mut(index) {
            Some(block) => {
                block.values.insert(field.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    /// Best-effort write of `value` into the named control.
    pub(crate) fn mirror_control(&mut self, name: &str, value: &str) -> bool {
        match self.controls.get_mut(name) {
            Some(control) => {
                *control = value.to_string();
                true
            }
            None => false,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Binder operations
// ────────────────────────────────────────────────────────────────────────────

impl EditorState {
    /// Repopulates the whole sidebar from the record and re-renders.
    pub fn load_from_model(&mut self) {
        self.form.bind(&self.record);
        self.rerender();
    }

    /// Routes one control change into the record, then re-renders.
    pub fn apply_field_change(&mut self, name: &str, raw: &str) -> Result<(), BindError> {
        if let Some(field) = PersonalField::from_key(name) {
            *field.slot(&mut self.record.personal_details) = raw.to_string();
        } else if let Some(list) = TagList::from_key(name) {
            *list.items_mut(&mut self.record) = parse_list(raw);
        } else {
            match name {
                SUMMARY_CONTROL => self.record.summary = raw.to_string(),
                ACCENT_COLOR_CONTROL => self.record.accent_color = raw.to_string(),
                TEMPLATE_TYPE_CONTROL => self.record.template_type = TemplateType::resolve(raw),
                other => return Err(BindError::UnknownControl(other.to_string())),
            }
        }
        self.form.controls.insert(name.to_string(), raw.to_string());
        self.rerender();
        Ok(())
    }

    /// Appends a sub-record built from `defaults`, binds a new block to the
    /// new tail index and re-renders. Returns the new block's id.
    pub fn append_list_item(
        &mut self,
        section: ListSection,
        defaults: &[(String, String)],
    ) -> Result<BlockId, BindError> {
        for (field, _) in defaults {
            section.field(field)?;
        }
        // Containers trail the record only after an inline edit materialized
        // elements; catch up before binding the new tail.
        self.form.ensure_blocks(section, &self.record);
        let index = section.push(&mut self.record, defaults);
        let block_id = self.form.attach_block(section, index, &self.record);
        debug!(section = section.key(), index, block_id, "list item appended");
        self.rerender();
        Ok(block_id)
    }

    /// Writes `value` through a form block's binding, then re-renders.
    pub fn update_list_item(
        &mut self,
        section: ListSection,
        block_id: BlockId,
        field: &str,
        value: &str,
    ) -> Result<(), BindError> {
        let field = section.field(field)?;
        let index = self
            .form
            .container(section)
            .find(block_id)
            .map(|b| b.binding.index)
            .ok_or_else(|| BindError::UnknownBlock {
                section: section.key().to_string(),
                block_id,
            })?;

        let len = section.len(&self.record);
        let slot = section
            .slot(&mut self.record, index, field, false)
            .ok_or_else(|| BindError::OutOfRange {
                section: section.key().to_string(),
                position: index,
                len,
            })?;
        *slot = value.to_string();
        self.form.mirror_block(section, index, field, value);
        self.rerender();
        Ok(())
    }

    /// Removes the element at `position` and its block, re-indexes the
    /// surviving blocks, then re-renders.
    pub fn remove_list_item(&mut self, section: ListSection, position: usize) -> Result<(), BindError> {
        let len = section.len(&self.record);
        if !section.remove(&mut self.record, position) {
            return Err(BindError::OutOfRange {
                section: section.key().to_string(),
                position,
                len,
            });
        }
        let container = self.form.container_mut(section);
        if position < container.blocks.len() {
            container.blocks.remove(position);
        }
        container.reindex();
        self.form.ensure_blocks(section, &self.record);
        debug!(section = section.key(), position, "list item removed");
        self.rerender();
        Ok(())
    }

    /// Applies a user's template choice: records the id, resolves layout and
    /// background through `catalog`, and re-renders.
    ///
    /// A failed lookup leaves layout and background as they were; the error
    /// is returned for the caller to surface.
    pub async fn to_template_selection(
        &mut self,
        template_id: Uuid,
        catalog: &dyn TemplateCatalog,
    ) -> Result<(), AppError> {
        self.record.template_id = Some(template_id);
        let outcome = match catalog.get_by_id(template_id).await {
            Ok(meta) => {
                self.apply_template_meta(&meta);
                Ok(())
            }
            Err(e) => {
                warn!(%template_id, "template lookup failed: {e}");
                Err(e)
            }
        };
        self.rerender();
        outcome
    }

    /// Restores the background of the admin template a loaded record points
    /// at. The stored layout is kept, since the user may have switched it
    /// after choosing the template.
    pub async fn restore_template_background(
        &mut self,
        catalog: &dyn TemplateCatalog,
    ) -> Result<(), AppError> {
        let Some(template_id) = self.record.template_id else {
            return Ok(());
        };
        let meta = catalog.get_by_id(template_id).await.map_err(|e| {
            warn!(%template_id, "template lookup failed: {e}");
            e
        })?;
        self.background_image = Some(meta.preview_image);
        self.rerender();
        Ok(())
    }

    fn apply_template_meta(&mut self, meta: &TemplateMeta) {
        self.record.template_type = meta.template_type;
        self.background_image = Some(meta.preview_image.clone());
        self.form.controls.insert(
            TEMPLATE_TYPE_CONTROL.to_string(),
            meta.template_type.as_str().to_string(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::fields::EditTarget;
    use crate::models::resume::ExperienceEntry;
    use crate::render::document::SectionKind;
    use crate::store::memory::MemoryTemplateCatalog;

    fn kv(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn three_jobs() -> EditorState {
        let mut state = EditorState::new(ResumeRecord::default());
        for company in ["Acme", "Globex", "Initech"] {
            state
                .append_list_item(ListSection::Experience, &kv(&[("company", company)]))
                .unwrap();
        }
        state
    }

    fn assert_bindings_match_positions(state: &EditorState, section: ListSection) {
        let container = state.form.container(section);
        assert_eq!(container.len(), section.len(&state.record));
        for (i, block) in container.blocks.iter().enumerate() {
            assert_eq!(block.binding.index, i, "block {} is stale", block.block_id);
        }
    }

    #[test]
    fn test_load_from_model_populates_controls_and_blocks() {
        let mut record = ResumeRecord::default();
        record.personal_details.name = "Ada".to_string();
        record.skills = vec!["C++".to_string(), "Math".to_string()];
        record.education.push(Default::default());
        record.experience.push(ExperienceEntry {
            role: "Analyst".to_string(),
            ..ExperienceEntry::default()
        });
        let mut state = EditorState::new(ResumeRecord::default());
        state.record = record;
        state.load_from_model();

        assert_eq!(state.form.control("name"), Some("Ada"));
        assert_eq!(state.form.control("skills"), Some("C++, Math"));
        assert_eq!(state.form.control("templateType"), Some("modern"));
        assert_eq!(state.form.education.len(), 1);
        assert_eq!(state.form.experience.blocks[0].values["role"], "Analyst");
        assert!(state.form.projects.is_empty());
    }

    #[test]
    fn test_load_from_model_clears_previous_blocks() {
        let mut state = three_jobs();
        state.record.experience.truncate(1);
        state.load_from_model();
        assert_eq!(state.form.experience.len(), 1);
        assert_bindings_match_positions(&state, ListSection::Experience);
    }

    #[test]
    fn test_apply_field_change_routes_by_name() {
        let mut state = EditorState::new(ResumeRecord::default());
        state.apply_field_change("jobTitle", "Engineer").unwrap();
        state.apply_field_change("summary", "Builds things").unwrap();
        state.apply_field_change("languages", "English, , French ").unwrap();
        state.apply_field_change("accentColor", "#FF0000").unwrap();

        assert_eq!(state.record.personal_details.job_title, "Engineer");
        assert_eq!(state.record.summary, "Builds things");
        assert_eq!(state.record.languages, vec!["English", "French"]);
        assert_eq!(state.record.accent_color, "#FF0000");
        assert_eq!(state.form.control("languages"), Some("English, , French "));
    }

    #[test]
    fn test_apply_field_change_rerenders_every_time() {
        let mut state = EditorState::new(ResumeRecord::default());
        let before = state.render_count;
        state.apply_field_change("name", "A").unwrap();
        state.apply_field_change("name", "Ad").unwrap();
        assert_eq!(state.render_count, before + 2);
        assert!(state.preview.text_content().contains("Ad"));
    }

    #[test]
    fn test_apply_field_change_template_type_resolves() {
        let mut state = EditorState::new(ResumeRecord::default());
        state.apply_field_change("templateType", "Executive").unwrap();
        assert_eq!(state.record.template_type, TemplateType::Executive);
        state.apply_field_change("templateType", "bespoke").unwrap();
        assert_eq!(state.record.template_type, TemplateType::Unknown);
    }

    #[test]
    fn test_apply_field_change_unknown_control_is_rejected() {
        let mut state = EditorState::new(ResumeRecord::default());
        let before = state.record.clone();
        let err = state.apply_field_change("salary", "lots").unwrap_err();
        assert_eq!(err, BindError::UnknownControl("salary".to_string()));
        assert_eq!(state.record, before);
    }

    #[test]
    fn test_append_binds_new_tail_index() {
        let mut state = EditorState::new(ResumeRecord::default());
        let first = state
            .append_list_item(ListSection::Projects, &kv(&[("title", "Compiler")]))
            .unwrap();
        let second = state.append_list_item(ListSection::Projects, &[]).unwrap();

        assert_ne!(first, second);
        assert_eq!(state.record.projects.len(), 2);
        assert_eq!(state.form.projects.find(second).unwrap().binding.index, 1);
        assert_eq!(state.form.projects.blocks[0].values["title"], "Compiler");
        assert!(state.preview.section(SectionKind::Projects).is_some());
    }

    #[test]
    fn test_append_rejects_unknown_default_field() {
        let mut state = EditorState::new(ResumeRecord::default());
        let err = state
            .append_list_item(ListSection::Education, &kv(&[("company", "x")]))
            .unwrap_err();
        assert!(matches!(err, BindError::UnknownField { .. }));
        assert!(state.record.education.is_empty());
    }

    #[test]
    fn test_remove_middle_then_edit_survivor_hits_correct_record() {
        let mut state = three_jobs();
        let initech = state.form.experience.blocks[2].block_id;

        state.remove_list_item(ListSection::Experience, 1).unwrap();
        assert_bindings_match_positions(&state, ListSection::Experience);

        state
            .update_list_item(ListSection::Experience, initech, "role", "CTO")
            .unwrap();

        let companies: Vec<_> = state.record.experience.iter().map(|e| e.company.as_str()).collect();
        assert_eq!(companies, ["Acme", "Initech"]);
        assert_eq!(state.record.experience[1].role, "CTO");
        assert_eq!(state.record.experience[0].role, "");
        assert_eq!(state.form.experience.blocks[1].values["role"], "CTO");
    }

    #[test]
    fn test_insert_remove_insert_keeps_bindings_dense() {
        let mut state = three_jobs();
        state.remove_list_item(ListSection::Experience, 0).unwrap();
        let added = state
            .append_list_item(ListSection::Experience, &kv(&[("company", "Hooli")]))
            .unwrap();
        state.remove_list_item(ListSection::Experience, 1).unwrap();
        assert_bindings_match_positions(&state, ListSection::Experience);

        state
            .update_list_item(ListSection::Experience, added, "role", "Lead")
            .unwrap();
        assert_eq!(state.record.experience[1].company, "Hooli");
        assert_eq!(state.record.experience[1].role, "Lead");
    }

    #[test]
    fn test_update_removed_block_is_rejected() {
        let mut state = three_jobs();
        let globex = state.form.experience.blocks[1].block_id;
        state.remove_list_item(ListSection::Experience, 1).unwrap();
        let err = state
            .update_list_item(ListSection::Experience, globex, "role", "ghost")
            .unwrap_err();
        assert!(matches!(err, BindError::UnknownBlock { .. }));
        assert!(state.record.experience.iter().all(|e| e.role.is_empty()));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut state = three_jobs();
        let err = state.remove_list_item(ListSection::Experience, 3).unwrap_err();
        assert_eq!(
            err,
            BindError::OutOfRange {
                section: "experience".to_string(),
                position: 3,
                len: 3
            }
        );
        assert_eq!(state.record.experience.len(), 3);
    }

    #[test]
    fn test_removing_last_item_omits_section() {
        let mut state = EditorState::new(ResumeRecord::default());
        state.append_list_item(ListSection::Education, &[]).unwrap();
        assert!(state.preview.section(SectionKind::Education).is_some());
        state.remove_list_item(ListSection::Education, 0).unwrap();
        assert!(state.preview.section(SectionKind::Education).is_none());
    }

    #[tokio::test]
    async fn test_template_selection_applies_type_and_background() {
        let catalog = MemoryTemplateCatalog::default();
        let id = catalog.add("Navy", "executive");
        let mut state = EditorState::new(ResumeRecord::default());

        state.to_template_selection(id, &catalog).await.unwrap();

        assert_eq!(state.record.template_id, Some(id));
        assert_eq!(state.record.template_type, TemplateType::Executive);
        assert_eq!(state.preview.template_type, TemplateType::Executive);
        assert_eq!(
            state.preview.background_image.as_deref(),
            Some(format!("/api/v1/templates/{id}/image").as_str())
        );
        assert_eq!(state.form.control("templateType"), Some("executive"));
    }

    #[tokio::test]
    async fn test_template_selection_failure_keeps_layout() {
        let catalog = MemoryTemplateCatalog::default();
        let mut state = EditorState::new(ResumeRecord::blank(TemplateType::Classic, "#000000"));
        let missing = Uuid::new_v4();

        assert!(state.to_template_selection(missing, &catalog).await.is_err());
        assert_eq!(state.record.template_id, Some(missing));
        assert_eq!(state.record.template_type, TemplateType::Classic);
        assert!(state.background_image.is_none());
        assert!(state
            .preview
            .find_editable(&EditTarget::personal(PersonalField::Name))
            .is_some());
    }
}
