use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, ResumeRow, StoredResume};
use crate::models::template::{TemplateMeta, TemplateRow, TemplateSummary};
use crate::store::{check_owner, ResumeStore, TemplateCatalog};

#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_row(&self, id: Uuid) -> Result<ResumeRow, AppError> {
        sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn get(&self, id: Uuid, owner: Uuid) -> Result<StoredResume, AppError> {
        let row = self.fetch_row(id).await?;
        check_owner(row.user_id, owner)?;
        Ok(row.into())
    }

    async fn list(&self, owner: Uuid) -> Result<Vec<StoredResume>, AppError> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(StoredResume::from).collect())
    }

    async fn create(&self, owner: Uuid, record: &ResumeRecord) -> Result<StoredResume, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (id, user_id, data)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(Json(record))
        .fetch_one(&self.pool)
        .await?;
        tracing::info!(resume_id = %row.id, user_id = %owner, "Created resume");
        Ok(row.into())
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        record: &ResumeRecord,
    ) -> Result<StoredResume, AppError> {
        let existing = self.fetch_row(id).await?;
        check_owner(existing.user_id, owner)?;

        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes
            SET data = $1, updated_at = NOW()
            WHERE id = $2 AND user_id = $3
            RETURNING *
            "#,
        )
        .bind(Json(record))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
        Ok(row.into())
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), AppError> {
        let existing = self.fetch_row(id).await?;
        check_owner(existing.user_id, owner)?;

        sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        tracing::info!(resume_id = %id, user_id = %owner, "Deleted resume");
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgTemplateCatalog {
    pool: PgPool,
}

impl PgTemplateCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Active template row by id, shared with the image and admin handlers.
pub async fn active_template(pool: &PgPool, id: Uuid) -> Result<TemplateRow, AppError> {
    sqlx::query_as::<_, TemplateRow>("SELECT * FROM templates WHERE id = $1 AND is_active")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))
}

#[async_trait]
impl TemplateCatalog for PgTemplateCatalog {
    async fn list(&self) -> Result<Vec<TemplateSummary>, AppError> {
        let rows = sqlx::query_as::<_, TemplateRow>(
            "SELECT * FROM templates WHERE is_active ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(TemplateRow::summary).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<TemplateMeta, AppError> {
        Ok(active_template(&self.pool, id).await?.meta())
    }
}
