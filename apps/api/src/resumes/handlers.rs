use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, StoredResume};
use crate::state::AppState;

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<StoredResume>>, AppError> {
    Ok(Json(state.resumes.list(user.id).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredResume>, AppError> {
    Ok(Json(state.resumes.get(id, user.id).await?))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(record): Json<ResumeRecord>,
) -> Result<(StatusCode, Json<StoredResume>), AppError> {
    let saved = state.resumes.create(user.id, &record).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(record): Json<ResumeRecord>,
) -> Result<Json<StoredResume>, AppError> {
    Ok(Json(state.resumes.update(id, user.id, &record).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.resumes.delete(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
