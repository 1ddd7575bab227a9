use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::editor::session::SessionRegistry;
use crate::export::Rasterizer;
use crate::store::{ResumeStore, TemplateCatalog};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    /// Resume persistence. Default: PgResumeStore.
    pub resumes: Arc<dyn ResumeStore>,
    /// Admin template catalogue. Default: PgTemplateCatalog.
    pub templates: Arc<dyn TemplateCatalog>,
    /// Live editor sessions.
    pub sessions: SessionRegistry,
    /// PDF rasterizer; `None` when no preview font is configured, in which
    /// case export fails with a toast.
    pub rasterizer: Option<Arc<dyn Rasterizer>>,
}
