use aws_sdk_s3::primitives::ByteStream;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::errors::AppError;
use crate::models::template::{TemplateMeta, TemplateRow, TemplateType};
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: i64,
    pub total_admins: i64,
    pub total_resumes: i64,
}

/// GET /api/v1/admin/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<AdminStats>, AppError> {
    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await?;
    let total_admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_admin")
        .fetch_one(&state.db)
        .await?;
    let total_resumes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes")
        .fetch_one(&state.db)
        .await?;
    Ok(Json(AdminStats {
        total_users,
        total_admins,
        total_resumes,
    }))
}

/// GET /api/v1/admin/users
pub async fn handle_list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<User>>, AppError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(users))
}

/// PUT /api/v1/admin/users/:id/toggle-admin
pub async fn handle_toggle_admin(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if id == admin.id {
        return Err(AppError::Validation(
            "You cannot change your own admin status".to_string(),
        ));
    }
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET is_admin = NOT is_admin WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    info!(user_id = %id, is_admin = user.is_admin, by = %admin.id, "Toggled admin role");
    let verb = if user.is_admin { "promoted to" } else { "removed from" };
    Ok(Json(json!({
        "message": format!("User {verb} admin"),
        "user": user,
    })))
}

/// DELETE /api/v1/admin/users/:id
pub async fn handle_delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if id == admin.id {
        return Err(AppError::Validation("You cannot delete yourself".to_string()));
    }
    let mut tx = state.db.begin().await?;
    let resumes = sqlx::query("DELETE FROM resumes WHERE user_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(AppError::NotFound(format!("User {id} not found")));
    }
    tx.commit().await?;

    info!(user_id = %id, resumes, by = %admin.id, "Deleted user and their resumes");
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Template upload
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct TemplateUpload {
    name: String,
    description: String,
    template_type: String,
    content_type: Option<String>,
    file: Option<Bytes>,
}

#[derive(Debug)]
struct ValidUpload {
    name: String,
    description: String,
    template_type: TemplateType,
    content_type: String,
    extension: &'static str,
    file: Bytes,
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}

impl TemplateUpload {
    fn validate(self) -> Result<ValidUpload, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Template name is required".to_string()));
        }
        let template_type = TemplateType::resolve(&self.template_type);
        if !template_type.is_built_in() {
            return Err(AppError::Validation(format!(
                "Unknown template type '{}'",
                self.template_type
            )));
        }
        let file = self
            .file
            .filter(|f| !f.is_empty())
            .ok_or_else(|| AppError::Validation("Template file is required".to_string()))?;
        let content_type = self.content_type.unwrap_or_default();
        let extension = extension_for(&content_type).ok_or_else(|| {
            AppError::Validation(format!("Unsupported file type '{content_type}'"))
        })?;
        Ok(ValidUpload {
            name,
            description: self.description.trim().to_string(),
            template_type,
            content_type,
            extension,
            file,
        })
    }
}

fn malformed(e: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("Malformed upload: {e}"))
}

/// POST /api/v1/admin/templates (multipart: name, description, type, file)
pub async fn handle_upload_template(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<TemplateMeta>), AppError> {
    let mut upload = TemplateUpload::default();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => upload.name = field.text().await.map_err(malformed)?,
            "description" => upload.description = field.text().await.map_err(malformed)?,
            "type" => upload.template_type = field.text().await.map_err(malformed)?,
            "file" => {
                upload.content_type = field.content_type().map(str::to_string);
                upload.file = Some(field.bytes().await.map_err(malformed)?);
            }
            _ => {}
        }
    }
    let upload = upload.validate()?;

    let id = Uuid::new_v4();
    let s3_key = format!("templates/{id}.{}", upload.extension);
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&s3_key)
        .body(ByteStream::from(upload.file))
        .content_type(&upload.content_type)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload {s3_key} failed: {e}")))?;

    let row = sqlx::query_as::<_, TemplateRow>(
        r#"
        INSERT INTO templates (id, name, description, template_type, s3_key, file_type, uploaded_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&upload.name)
    .bind(&upload.description)
    .bind(upload.template_type.as_str())
    .bind(&s3_key)
    .bind(&upload.content_type)
    .bind(admin.id)
    .fetch_one(&state.db)
    .await?;

    info!(template_id = %id, s3_key = %s3_key, template_type = %upload.template_type, "Uploaded template");
    Ok((StatusCode::CREATED, Json(row.meta())))
}

/// DELETE /api/v1/admin/templates/:id
pub async fn handle_deactivate_template(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let updated = sqlx::query("UPDATE templates SET is_active = FALSE WHERE id = $1 AND is_active")
        .bind(id)
        .execute(&state.db)
        .await?
        .rows_affected();
    if updated == 0 {
        return Err(AppError::NotFound(format!("Template {id} not found")));
    }
    info!(template_id = %id, by = %admin.id, "Deactivated template");
    Ok(StatusCode::NO_CONTENT)
}
