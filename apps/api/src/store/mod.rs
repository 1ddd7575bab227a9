//! Persistence collaborators the editor talks to.
//!
//! Both traits are object-safe and Send + Sync so AppState can hold them as
//! Arc<dyn _>. Production uses the Postgres implementations; tests use the
//! in-memory ones.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, StoredResume};
use crate::models::template::{TemplateMeta, TemplateSummary};

pub use postgres::{PgResumeStore, PgTemplateCatalog};

/// Owner-scoped resume persistence.
///
/// Every id-addressed call checks ownership: a resume that exists but belongs
/// to someone else is `Forbidden`, a missing one `NotFound`.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn get(&self, id: Uuid, owner: Uuid) -> Result<StoredResume, AppError>;

    /// Newest update first.
    async fn list(&self, owner: Uuid) -> Result<Vec<StoredResume>, AppError>;

    async fn create(&self, owner: Uuid, record: &ResumeRecord) -> Result<StoredResume, AppError>;

    /// Replaces the whole record and bumps `updated_at`.
    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        record: &ResumeRecord,
    ) -> Result<StoredResume, AppError>;

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), AppError>;
}

/// Read side of the admin-managed template catalogue. Inactive templates are
/// invisible.
#[async_trait]
pub trait TemplateCatalog: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<TemplateSummary>, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<TemplateMeta, AppError>;
}

/// Maps a row looked up by id alone onto the owner-scoped contract.
pub(crate) fn check_owner(resume_owner: Uuid, caller: Uuid) -> Result<(), AppError> {
    if resume_owner == caller {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
