//! In-memory stores for session and binder tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, StoredResume};
use crate::models::template::{preview_image_url, TemplateMeta, TemplateSummary, TemplateType};
use crate::store::{check_owner, ResumeStore, TemplateCatalog};

#[derive(Default)]
pub struct MemoryResumeStore {
    rows: Mutex<HashMap<Uuid, StoredResume>>,
    fail_writes: AtomicBool,
}

impl MemoryResumeStore {
    pub fn insert(&self, owner: Uuid, record: ResumeRecord) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.rows.lock().unwrap().insert(
            id,
            StoredResume {
                id,
                user_id: owner,
                record,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn record(&self, id: Uuid) -> Option<ResumeRecord> {
        self.rows.lock().unwrap().get(&id).map(|r| r.record.clone())
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Makes every subsequent create/update fail like a dropped connection.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(AppError::Internal(anyhow::anyhow!("store unavailable")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn get(&self, id: Uuid, owner: Uuid) -> Result<StoredResume, AppError> {
        let rows = self.rows.lock().unwrap();
        let row = rows
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
        check_owner(row.user_id, owner)?;
        Ok(row.clone())
    }

    async fn list(&self, owner: Uuid) -> Result<Vec<StoredResume>, AppError> {
        let mut rows: Vec<StoredResume> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    async fn create(&self, owner: Uuid, record: &ResumeRecord) -> Result<StoredResume, AppError> {
        self.check_writable()?;
        let id = self.insert(owner, record.clone());
        self.get(id, owner).await
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        record: &ResumeRecord,
    ) -> Result<StoredResume, AppError> {
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
        check_owner(row.user_id, owner)?;
        row.record = record.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
        check_owner(row.user_id, owner)?;
        rows.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTemplateCatalog {
    templates: Mutex<Vec<TemplateMeta>>,
}

impl MemoryTemplateCatalog {
    /// Registers an active template declaring `type_tag` and returns its id.
    pub fn add(&self, name: &str, type_tag: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.templates.lock().unwrap().push(TemplateMeta {
            id,
            name: name.to_string(),
            template_type: TemplateType::resolve(type_tag),
            preview_image: preview_image_url(id),
        });
        id
    }
}

#[async_trait]
impl TemplateCatalog for MemoryTemplateCatalog {
    async fn list(&self) -> Result<Vec<TemplateSummary>, AppError> {
        Ok(self
            .templates
            .lock()
            .unwrap()
            .iter()
            .rev()
            .map(|t| TemplateSummary {
                id: t.id,
                name: t.name.clone(),
                description: String::new(),
                template_type: t.template_type,
            })
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<TemplateMeta, AppError> {
        self.templates
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_other_owner_is_forbidden() {
        let store = MemoryResumeStore::default();
        let owner = Uuid::new_v4();
        let id = store.insert(owner, ResumeRecord::default());
        let err = store.get(id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        let err = store.get(Uuid::new_v4(), owner).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let store = MemoryResumeStore::default();
        let owner = Uuid::new_v4();
        let id = store.insert(owner, ResumeRecord::default());
        let mut record = ResumeRecord::default();
        record.summary = "Updated".to_string();
        let saved = store.update(id, owner, &record).await.unwrap();
        assert_eq!(saved.record.summary, "Updated");
        assert!(saved.updated_at >= saved.created_at);
    }
}
