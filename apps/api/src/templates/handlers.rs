use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::template::{TemplateMeta, TemplateSummary};
use crate::state::AppState;
use crate::store::postgres::active_template;

/// GET /api/v1/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<TemplateSummary>>, AppError> {
    Ok(Json(state.templates.list().await?))
}

/// GET /api/v1/templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TemplateMeta>, AppError> {
    Ok(Json(state.templates.get_by_id(id).await?))
}

/// GET /api/v1/templates/:id/image
///
/// Unauthenticated: the preview references it as a CSS background, which
/// carries no bearer header.
pub async fn handle_template_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let template = active_template(&state.db, id).await?;
    let object = state
        .s3
        .get_object()
        .bucket(&state.config.s3_bucket)
        .key(&template.s3_key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("get {} failed: {e}", template.s3_key)))?;
    let bytes = object
        .body
        .collect()
        .await
        .map_err(|e| AppError::S3(format!("read {} failed: {e}", template.s3_key)))?
        .into_bytes();

    Ok((
        [
            (header::CONTENT_TYPE, template.file_type),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        bytes,
    )
        .into_response())
}
