use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::editor::fields::{EditSection, ListSection};
use crate::editor::form::{BlockId, TEMPLATE_TYPE_CONTROL};
use crate::editor::session::{
    self, EditorSession, OpenSessionRequest, SessionView, Toast, ToastKind, TOAST_TEMPLATE_FAILED,
};
use crate::editor::BindError;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FieldChangeRequest {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Deserialize)]
pub struct BlockFieldRequest {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Deserialize)]
pub struct InlineEditRequest {
    pub section: String,
    pub field: Option<String>,
    pub index: Option<usize>,
    #[serde(default)]
    pub text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSelectionRequest {
    pub template_id: Option<Uuid>,
    pub template_type: Option<String>,
}

fn list_section(key: &str) -> Result<ListSection, AppError> {
    ListSection::from_key(key).ok_or_else(|| BindError::UnknownSection(key.to_string()).into())
}

/// POST /api/v1/editor/sessions
pub async fn handle_open_session(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let session = EditorSession::open(
        &user,
        &req,
        state.resumes.as_ref(),
        state.templates.as_ref(),
        &state.config.default_accent_color,
    )
    .await;
    tracing::info!(session_id = %session.id, user_id = %user.id, resume_id = ?session.resume_id, "Opened editor session");
    let handle = state.sessions.insert(session)?;
    let view = handle.lock().await.view();
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/editor/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id, user.id)?;
    let view = handle.lock().await.view();
    Ok(Json(view))
}

/// DELETE /api/v1/editor/sessions/:id
pub async fn handle_close_session(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id, user.id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/editor/sessions/:id/fields
pub async fn handle_field_change(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<FieldChangeRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id, user.id)?;
    let mut session = handle.lock().await;
    session.state.apply_field_change(&req.name, &req.value)?;
    Ok(Json(session.view()))
}

/// POST /api/v1/editor/sessions/:id/lists/:section
pub async fn handle_append_list_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, section)): Path<(Uuid, String)>,
    Json(defaults): Json<BTreeMap<String, String>>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let section = list_section(&section)?;
    let handle = state.sessions.get(id, user.id)?;
    let mut session = handle.lock().await;
    let defaults: Vec<(String, String)> = defaults.into_iter().collect();
    session.state.append_list_item(section, &defaults)?;
    Ok((StatusCode::CREATED, Json(session.view())))
}

/// PATCH /api/v1/editor/sessions/:id/lists/:section/blocks/:block
pub async fn handle_update_list_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, section, block_id)): Path<(Uuid, String, BlockId)>,
    Json(req): Json<BlockFieldRequest>,
) -> Result<Json<SessionView>, AppError> {
    let section = list_section(&section)?;
    let handle = state.sessions.get(id, user.id)?;
    let mut session = handle.lock().await;
    session
        .state
        .update_list_item(section, block_id, &req.field, &req.value)?;
    Ok(Json(session.view()))
}

/// DELETE /api/v1/editor/sessions/:id/lists/:section/:position
pub async fn handle_remove_list_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, section, position)): Path<(Uuid, String, usize)>,
) -> Result<Json<SessionView>, AppError> {
    let section = list_section(&section)?;
    let handle = state.sessions.get(id, user.id)?;
    let mut session = handle.lock().await;
    session.state.remove_list_item(section, position)?;
    Ok(Json(session.view()))
}

/// POST /api/v1/editor/sessions/:id/inline
pub async fn handle_inline_edit(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<InlineEditRequest>,
) -> Result<Json<SessionView>, AppError> {
    let section = EditSection::from_key(&req.section)
        .ok_or_else(|| BindError::UnknownSection(req.section.clone()))?;
    let handle = state.sessions.get(id, user.id)?;
    let mut session = handle.lock().await;
    session
        .state
        .commit_inline_edit(section, req.field.as_deref(), req.index, &req.text)?;
    Ok(Json(session.view()))
}

/// PUT /api/v1/editor/sessions/:id/template
///
/// `templateId` applies an admin template (lookup failures become a toast and
/// leave the layout unchanged); `templateType` switches the built-in layout.
pub async fn handle_select_template(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<TemplateSelectionRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id, user.id)?;
    let mut session = handle.lock().await;
    match (req.template_id, req.template_type) {
        (Some(template_id), _) => {
            if session
                .state
                .to_template_selection(template_id, state.templates.as_ref())
                .await
                .is_err()
            {
                session.push_toast(Toast {
                    kind: ToastKind::Error,
                    message: TOAST_TEMPLATE_FAILED.to_string(),
                });
            }
        }
        (None, Some(template_type)) => {
            session
                .state
                .apply_field_change(TEMPLATE_TYPE_CONTROL, &template_type)?;
        }
        (None, None) => {
            return Err(AppError::Validation(
                "templateId or templateType is required".to_string(),
            ))
        }
    }
    Ok(Json(session.view()))
}

/// POST /api/v1/editor/sessions/:id/save
pub async fn handle_save(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id, user.id)?;
    let view = session::save(&handle, state.resumes.as_ref()).await?;
    Ok(Json(view))
}

/// POST /api/v1/editor/sessions/:id/export
pub async fn handle_export(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let handle = state.sessions.get(id, user.id)?;
    let pdf = session::export(&handle, state.rasterizer.clone()).await?;
    let disposition = format!("attachment; filename=\"{}\"", pdf.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf.bytes,
    )
        .into_response())
}
