//! Editor core: an owned editing state per session, mutated by the sidebar form
//! binder (`form`) and the preview inline-edit binder (`inline`), rendered after
//! every committed form change. `session` holds live sessions; `handlers` exposes
//! them over HTTP.

pub mod fields;
pub mod form;
pub mod handlers;
pub mod inline;
pub mod session;

use thiserror::Error;

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::render::{self, document::Document};

use self::form::SidebarForm;

/// Addressing failures raised by the binders. None of them leave the record
/// partially written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("unknown form control '{0}'")]
    UnknownControl(String),

    #[error("unknown section '{0}'")]
    UnknownSection(String),

    #[error("section '{section}' has no field '{field}'")]
    UnknownField { section: String, field: String },

    #[error("section '{section}' has no form block {block_id}")]
    UnknownBlock { section: String, block_id: u64 },

    #[error("position {position} is out of range for '{section}' (length {len})")]
    OutOfRange {
        section: String,
        position: usize,
        len: usize,
    },

    #[error("section '{0}' requires an index")]
    MissingIndex(String),

    #[error("section '{0}' requires a field name")]
    MissingField(String),
}

impl From<BindError> for AppError {
    fn from(e: BindError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Everything one editing session owns: the record, the sidebar form bound to
/// it, and the last rendered preview.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub record: ResumeRecord,
    pub form: SidebarForm,
    pub preview: Document,
    /// Background image of the applied admin template, if any.
    pub background_image: Option<String>,
    /// Full re-renders performed so far.
    pub render_count: u64,
}

impl EditorState {
    /// Builds the state for `record`, populating the form from it and
    /// rendering the first preview.
    pub fn new(record: ResumeRecord) -> Self {
        let mut form = SidebarForm::default();
        form.bind(&record);
        EditorState {
            preview: render::render(&record),
            record,
            form,
            background_image: None,
            render_count: 1,
        }
    }

    /// Replaces the preview with a fresh render of the current record.
    pub fn rerender(&mut self) {
        let mut preview = render::render(&self.record);
        preview.background_image = self.background_image.clone();
        self.preview = preview;
        self.render_count += 1;
    }
}
