//! Live editing sessions.
//!
//! Each session owns one `EditorState` behind its own async mutex, so requests
//! against a session are applied one at a time. Save and export release the
//! lock while their collaborator runs; a second save (or export) arriving in
//! that window is refused with 409 instead of being queued.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::editor::form::SidebarForm;
use crate::editor::EditorState;
use crate::errors::AppError;
use crate::export::{export_to_pdf, ExportError, PdfExport, Rasterizer};
use crate::layout::{get_metrics, layout_document, FontFamily};
use crate::models::resume::ResumeRecord;
use crate::models::template::TemplateType;
use crate::models::user::User;
use crate::render::document::Document;
use crate::render::html::to_html;
use crate::store::{ResumeStore, TemplateCatalog};

pub const DEFAULT_TEMPLATE: &str = "modern";

const TOAST_LOAD_FAILED: &str = "Error loading resume";
pub const TOAST_TEMPLATE_FAILED: &str = "Error loading template";
const TOAST_SAVED: &str = "Resume saved successfully";
const TOAST_UPDATED: &str = "Resume updated successfully";
const TOAST_SAVE_FAILED: &str = "Error saving resume";
const TOAST_EXPORTED: &str = "PDF downloaded successfully";
const TOAST_EXPORT_FAILED: &str = "Error generating PDF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

/// Non-blocking notification, delivered with the next session view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    fn success(message: &str) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.to_string(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.to_string(),
        }
    }
}

/// Navigation parameters of the editor page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    pub resume_id: Option<Uuid>,
    pub template: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub record: ResumeRecord,
    pub form: SidebarForm,
    pub preview: Document,
    pub preview_html: String,
    pub estimated_pages: usize,
    pub render_count: u64,
    pub toasts: Vec<Toast>,
}

#[derive(Debug)]
pub struct EditorSession {
    pub id: Uuid,
    pub owner: Uuid,
    /// Persisted resume this session writes to; `None` until the first save.
    pub resume_id: Option<Uuid>,
    pub state: EditorState,
    toasts: Vec<Toast>,
    save_in_flight: bool,
    export_in_flight: bool,
}

impl EditorSession {
    fn new(owner: Uuid, resume_id: Option<Uuid>, state: EditorState) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            resume_id,
            state,
            toasts: Vec::new(),
            save_in_flight: false,
            export_in_flight: false,
        }
    }

    /// Hydrates a session from persistence, or starts an empty record laid out
    /// with the navigation parameters.
    ///
    /// A failed load (missing, someone else's, store down) is reported as a
    /// toast and the session starts from an empty record that is not bound to
    /// the requested id, so a later save cannot overwrite it. A loaded record
    /// that names an admin template gets its background back from `catalog`,
    /// best-effort.
    pub async fn open(
        user: &User,
        req: &OpenSessionRequest,
        store: &dyn ResumeStore,
        catalog: &dyn TemplateCatalog,
        default_accent: &str,
    ) -> Self {
        if let Some(resume_id) = req.resume_id {
            match store.get(resume_id, user.id).await {
                Ok(stored) => {
                    let mut state = EditorState::new(stored.record);
                    state.load_from_model();
                    let template_ok = state.restore_template_background(catalog).await.is_ok();
                    let mut session = Self::new(user.id, Some(resume_id), state);
                    if !template_ok {
                        session.push_toast(Toast::error(TOAST_TEMPLATE_FAILED));
                    }
                    return session;
                }
                Err(e) => {
                    warn!(%resume_id, user_id = %user.id, "Failed to load resume: {e}");
                    let mut session =
                        Self::new(user.id, None, Self::blank_state(user, req, default_accent));
                    session.push_toast(Toast::error(TOAST_LOAD_FAILED));
                    return session;
                }
            }
        }
        Self::new(user.id, None, Self::blank_state(user, req, default_accent))
    }

    fn blank_state(user: &User, req: &OpenSessionRequest, default_accent: &str) -> EditorState {
        let template = req.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        let color = req.color.as_deref().unwrap_or(default_accent);
        let mut record = ResumeRecord::blank(TemplateType::resolve(template), color);
        record.personal_details.name = user.name.clone();
        record.personal_details.email = user.email.clone();
        EditorState::new(record)
    }

    pub fn push_toast(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    /// Snapshot for the client. Pending toasts are handed over and cleared.
    pub fn view(&mut self) -> SessionView {
        let preview = self.state.preview.clone();
        let family = FontFamily::for_template(preview.template_type);
        let estimated_pages = layout_document(&preview, get_metrics(family)).page_count();
        SessionView {
            session_id: self.id,
            resume_id: self.resume_id,
            record: self.state.record.clone(),
            form: self.state.form.clone(),
            preview_html: to_html(&preview),
            preview,
            estimated_pages,
            render_count: self.state.render_count,
            toasts: std::mem::take(&mut self.toasts),
        }
    }

    fn begin_save(&mut self) -> Result<(), AppError> {
        if self.save_in_flight {
            return Err(AppError::Conflict("A save is already in progress".to_string()));
        }
        self.save_in_flight = true;
        Ok(())
    }

    fn begin_export(&mut self) -> Result<(), AppError> {
        if self.export_in_flight {
            return Err(AppError::Conflict("An export is already in progress".to_string()));
        }
        self.export_in_flight = true;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Collaborator round-trips
// ────────────────────────────────────────────────────────────────────────────

pub type SessionHandle = Arc<Mutex<EditorSession>>;

/// Persists the session's record: the first save creates a resume and binds
/// the session to it, later saves replace it. The outcome is a toast.
pub async fn save(
    handle: &SessionHandle,
    store: &dyn ResumeStore,
) -> Result<SessionView, AppError> {
    let (owner, resume_id, record) = {
        let mut session = handle.lock().await;
        session.begin_save()?;
        (session.owner, session.resume_id, session.state.record.clone())
    };

    let outcome = match resume_id {
        Some(id) => store.update(id, owner, &record).await,
        None => store.create(owner, &record).await,
    };

    let mut session = handle.lock().await;
    session.save_in_flight = false;
    match outcome {
        Ok(saved) => {
            info!(session_id = %session.id, resume_id = %saved.id, "Resume saved");
            session.resume_id = Some(saved.id);
            let message = if resume_id.is_some() { TOAST_UPDATED } else { TOAST_SAVED };
            session.push_toast(Toast::success(message));
        }
        Err(e) => {
            error!(session_id = %session.id, "Failed to save resume: {e}");
            session.push_toast(Toast::error(TOAST_SAVE_FAILED));
        }
    }
    Ok(session.view())
}

/// Rasterizes the current preview to a PDF on the blocking pool. Failures
/// queue an error toast and produce no file.
pub async fn export(
    handle: &SessionHandle,
    rasterizer: Option<Arc<dyn Rasterizer>>,
) -> Result<PdfExport, AppError> {
    let (session_id, doc, name) = {
        let mut session = handle.lock().await;
        session.begin_export()?;
        (
            session.id,
            session.state.preview.clone(),
            session.state.record.personal_details.name.clone(),
        )
    };

    let result = match rasterizer {
        None => Err(AppError::Export(ExportError::FontUnavailable)),
        Some(rasterizer) => {
            tokio::task::spawn_blocking(move || export_to_pdf(&doc, &name, rasterizer.as_ref()))
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Export task panicked: {e}")))
                .and_then(|r| r.map_err(AppError::from))
        }
    };

    let mut session = handle.lock().await;
    session.export_in_flight = false;
    match &result {
        Ok(pdf) => {
            info!(%session_id, filename = %pdf.filename, pages = pdf.pages, "PDF exported");
            session.push_toast(Toast::success(TOAST_EXPORTED));
        }
        Err(e) => {
            error!(%session_id, "PDF export failed: {e}");
            session.push_toast(Toast::error(TOAST_EXPORT_FAILED));
        }
    }
    result
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_SESSIONS_PER_OWNER: usize = 5;

struct Entry {
    owner: Uuid,
    handle: SessionHandle,
    last_touched: Instant,
}

/// In-memory table of live sessions.
///
/// A session untouched for `idle` is discarded, the same as a tab that
/// navigated away. Each owner keeps at most `per_owner` sessions; opening one
/// more drops their least recently used.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle: Duration,
    per_owner: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_IDLE, DEFAULT_SESSIONS_PER_OWNER)
    }
}

fn poisoned() -> AppError {
    AppError::Internal(anyhow::anyhow!("session registry lock poisoned"))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Editor session {id} not found"))
}

impl SessionRegistry {
    pub fn new(idle: Duration, per_owner: usize) -> Self {
        Self {
            sessions: Arc::default(),
            idle,
            per_owner: per_owner.max(1),
        }
    }

    pub fn insert(&self, session: EditorSession) -> Result<SessionHandle, AppError> {
        let id = session.id;
        let owner = session.owner;
        let handle = Arc::new(Mutex::new(session));
        let now = Instant::now();

        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;
        let idle = self.idle;
        sessions.retain(|_, e| now.duration_since(e.last_touched) < idle);

        let mut owned: Vec<(Uuid, Instant)> = sessions
            .iter()
            .filter(|(_, e)| e.owner == owner)
            .map(|(id, e)| (*id, e.last_touched))
            .collect();
        if owned.len() >= self.per_owner {
            owned.sort_by_key(|(_, touched)| *touched);
            let excess = owned.len() + 1 - self.per_owner;
            for (old, _) in owned.into_iter().take(excess) {
                debug!(session_id = %old, user_id = %owner, "Dropping least recently used session");
                sessions.remove(&old);
            }
        }

        sessions.insert(
            id,
            Entry {
                owner,
                handle: handle.clone(),
                last_touched: now,
            },
        );
        Ok(handle)
    }

    /// The caller's session `id`, marked as used. Someone else's session is
    /// `Forbidden`; an idle one is gone.
    pub fn get(&self, id: Uuid, owner: Uuid) -> Result<SessionHandle, AppError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;
        let entry = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        if entry.owner != owner {
            return Err(AppError::Forbidden);
        }
        if now.duration_since(entry.last_touched) >= self.idle {
            sessions.remove(&id);
            return Err(not_found(id));
        }
        entry.last_touched = now;
        Ok(entry.handle.clone())
    }

    pub fn remove(&self, id: Uuid, owner: Uuid) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;
        match sessions.get(&id) {
            None => Err(not_found(id)),
            Some(entry) if entry.owner != owner => Err(AppError::Forbidden),
            Some(_) => {
                sessions.remove(&id);
                Ok(())
            }
        }
    }

    /// Drops every idle session. Returns how many were dropped.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let Ok(mut sessions) = self.sessions.write() else {
            return 0;
        };
        let before = sessions.len();
        let idle = self.idle;
        sessions.retain(|_, e| now.duration_since(e.last_touched) < idle);
        before - sessions.len()
    }

    /// Sweeps idle sessions every `every` until the runtime shuts down.
    pub fn spawn_sweeper(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle();
                if evicted > 0 {
                    info!(evicted, live = registry.len(), "Evicted idle editor sessions");
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::Bitmap;
    use crate::store::memory::{MemoryResumeStore, MemoryTemplateCatalog};
    use crate::models::template::preview_image_url;
    use chrono::Utc;

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_ascii_lowercase()),
            is_admin: false,
            api_token: "t".to_string(),
            created_at: Utc::now(),
        }
    }

    struct Blank;

    impl Rasterizer for Blank {
        fn rasterize(&self, _doc: &Document, _scale: f32) -> Result<Bitmap, ExportError> {
            Ok(Bitmap::new(40, 56))
        }
    }

    /// Blocks until released, so a second request can arrive mid-export.
    struct Gated(std::sync::Mutex<std::sync::mpsc::Receiver<()>>);

    impl Rasterizer for Gated {
        fn rasterize(&self, _doc: &Document, _scale: f32) -> Result<Bitmap, ExportError> {
            let _ = self.0.lock().unwrap().recv();
            Ok(Bitmap::new(40, 56))
        }
    }

    #[tokio::test]
    async fn test_new_session_uses_navigation_parameters() {
        let ada = user("Ada");
        let store = MemoryResumeStore::default();
        let catalog = MemoryTemplateCatalog::default();
        let req = OpenSessionRequest {
            resume_id: None,
            template: Some("classic".to_string()),
            color: Some("#FF0000".to_string()),
        };
        let session = EditorSession::open(&ada, &req, &store, &catalog, "#2563EB").await;
        let record = &session.state.record;
        assert_eq!(record.template_type, TemplateType::Classic);
        assert_eq!(record.accent_color, "#FF0000");
        assert_eq!(record.personal_details.name, "Ada");
        assert_eq!(record.personal_details.email, "ada@example.com");
        assert_eq!(session.resume_id, None);
    }

    #[tokio::test]
    async fn test_defaults_without_parameters() {
        let ada = user("Ada");
        let store = MemoryResumeStore::default();
        let catalog = MemoryTemplateCatalog::default();
        let session = EditorSession::open(
            &ada,
            &OpenSessionRequest::default(),
            &store,
            &catalog,
            "#123456",
        )
        .await;
        assert_eq!(session.state.record.template_type, TemplateType::Modern);
        assert_eq!(session.state.record.accent_color, "#123456");
    }

    #[tokio::test]
    async fn test_hydrates_existing_resume() {
        let ada = user("Ada");
        let store = MemoryResumeStore::default();
        let catalog = MemoryTemplateCatalog::default();
        let mut record = ResumeRecord::default();
        record.summary = "Stored".to_string();
        let id = store.insert(ada.id, record);

        let req = OpenSessionRequest {
            resume_id: Some(id),
            ..OpenSessionRequest::default()
        };
        let mut session = EditorSession::open(&ada, &req, &store, &catalog, "#2563EB").await;
        assert_eq!(session.resume_id, Some(id));
        let view = session.view();
        assert_eq!(view.record.summary, "Stored");
        assert_eq!(view.form.control("summary"), Some("Stored"));
        assert!(view.toasts.is_empty());
    }

    #[tokio::test]
    async fn test_missing_resume_falls_back_with_toast() {
        let ada = user("Ada");
        let store = MemoryResumeStore::default();
        let catalog = MemoryTemplateCatalog::default();
        let req = OpenSessionRequest {
            resume_id: Some(Uuid::new_v4()),
            ..OpenSessionRequest::default()
        };
        let mut session = EditorSession::open(&ada, &req, &store, &catalog, "#2563EB").await;
        assert_eq!(session.resume_id, None);
        let view = session.view();
        assert_eq!(view.toasts, vec![Toast::error(TOAST_LOAD_FAILED)]);
        assert!(session.view().toasts.is_empty());
    }

    #[tokio::test]
    async fn test_someone_elses_resume_is_not_loaded() {
        let store = MemoryResumeStore::default();
        let catalog = MemoryTemplateCatalog::default();
        let mut record = ResumeRecord::default();
        record.summary = "Private".to_string();
        let id = store.insert(Uuid::new_v4(), record);
        let req = OpenSessionRequest {
            resume_id: Some(id),
            ..OpenSessionRequest::default()
        };
        let mut session = EditorSession::open(
            &user("Eve"),
            &req,
            &store,
            &catalog,
            "#2563EB",
        )
        .await;
        assert_eq!(session.resume_id, None);
        let view = session.view();
        assert_eq!(view.record.summary, "");
        assert_eq!(view.toasts, vec![Toast::error(TOAST_LOAD_FAILED)]);
    }

    #[tokio::test]
    async fn test_first_save_creates_then_updates() {
        let ada = user("Ada");
        let store = MemoryResumeStore::default();
        let catalog = MemoryTemplateCatalog::default();
        let session = EditorSession::open(
            &ada,
            &OpenSessionRequest::default(),
            &store,
            &catalog,
            "#2563EB",
        )
        .await;
        let handle: SessionHandle = Arc::new(Mutex::new(session));

        let view = save(&handle, &store).await.unwrap();
        let id = view.resume_id.unwrap();
        assert_eq!(view.toasts, vec![Toast::success(TOAST_SAVED)]);
        assert_eq!(store.len(), 1);

        handle
            .lock()
            .await
            .state
            .apply_field_change("summary", "Second draft")
            .unwrap();
        let view = save(&handle, &store).await.unwrap();
        assert_eq!(view.resume_id, Some(id));
        assert_eq!(view.toasts, vec![Toast::success(TOAST_UPDATED)]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.record(id).unwrap().summary, "Second draft");
    }

    #[tokio::test]
    async fn test_failed_save_is_a_toast() {
        let ada = user("Ada");
        let store = MemoryResumeStore::default();
        let catalog = MemoryTemplateCatalog::default();
        store.fail_writes();
        let session = EditorSession::open(
            &ada,
            &OpenSessionRequest::default(),
            &store,
            &catalog,
            "#2563EB",
        )
        .await;
        let handle: SessionHandle = Arc::new(Mutex::new(session));

        let view = save(&handle, &store).await.unwrap();
        assert_eq!(view.resume_id, None);
        assert_eq!(view.toasts, vec![Toast::error(TOAST_SAVE_FAILED)]);
        // flag cleared: a retry is accepted
        assert!(save(&handle, &store).await.is_ok());
    }

    #[tokio::test]
    async fn test_export_names_file_after_person() {
        let ada = user("Ada King");
        let store = MemoryResumeStore::default();
        let catalog = MemoryTemplateCatalog::default();
        let session = EditorSession::open(
            &ada,
            &OpenSessionRequest::default(),
            &store,
            &catalog,
            "#2563EB",
        )
        .await;
        let handle: SessionHandle = Arc::new(Mutex::new(session));

        let rasterizer: Arc<dyn Rasterizer> = Arc::new(Blank);
        let pdf = export(&handle, Some(rasterizer)).await.unwrap();
        assert_eq!(pdf.filename, "Ada_King_resume.pdf");
        assert!(pdf.bytes.starts_with(b"%PDF-"));
        let toasts = handle.lock().await.view().toasts;
        assert_eq!(toasts, vec![Toast::success(TOAST_EXPORTED)]);
    }

    #[tokio::test]
    async fn test_export_without_font_fails_with_toast() {
        let ada = user("Ada");
        let store = MemoryResumeStore::default();
        let catalog = MemoryTemplateCatalog::default();
        let session = EditorSession::open(
            &ada,
            &OpenSessionRequest::default(),
            &store,
            &catalog,
            "#2563EB",
        )
        .await;
        let handle: SessionHandle = Arc::new(Mutex::new(session));

        let err = export(&handle, None).await.unwrap_err();
        assert!(matches!(err, AppError::Export(ExportError::FontUnavailable)));
        let toasts = handle.lock().await.view().toasts;
        assert_eq!(toasts, vec![Toast::error(TOAST_EXPORT_FAILED)]);
    }

    #[tokio::test]
    async fn test_concurrent_export_is_rejected() {
        let ada = user("Ada");
        let store = MemoryResumeStore::default();
        let catalog = MemoryTemplateCatalog::default();
        let session = EditorSession::open(
            &ada,
            &OpenSessionRequest::default(),
            &store,
            &catalog,
            "#2563EB",
        )
        .await;
        let handle: SessionHandle = Arc::new(Mutex::new(session));

        let (release, gate) = std::sync::mpsc::channel();
        let rasterizer: Arc<dyn Rasterizer> = Arc::new(Gated(std::sync::Mutex::new(gate)));
        let first = tokio::spawn({
            let handle = handle.clone();
            let rasterizer = rasterizer.clone();
            async move { export(&handle, Some(rasterizer)).await }
        });

        // wait until the first export holds the flag
        loop {
            if handle.lock().await.export_in_flight {
                break;
            }
            tokio::task::yield_now().await;
        }
        let err = export(&handle, Some(rasterizer.clone())).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        release.send(()).unwrap();
        assert!(first.await.unwrap().is_ok());
        assert!(!handle.lock().await.export_in_flight);
    }

    #[tokio::test]
    async fn test_estimated_pages_in_view() {
        let ada = user("Ada");
        let store = MemoryResumeStore::default();
        let catalog = MemoryTemplateCatalog::default();
        let mut session = EditorSession::open(
            &ada,
            &OpenSessionRequest::default(),
            &store,
            &catalog,
            "#2563EB",
        )
        .await;
        assert_eq!(session.view().estimated_pages, 1);
        assert!(session.view().preview_html.contains("Ada"));
    }

    #[test]
    fn test_registry_scopes_sessions_to_owner() {
        let registry = SessionRegistry::default();
        let owner = Uuid::new_v4();
        let session = EditorSession::new(owner, None, EditorState::new(ResumeRecord::default()));
        let id = session.id;
        registry.insert(session).unwrap();

        assert!(registry.get(id, owner).is_ok());
        assert!(matches!(registry.get(id, Uuid::new_v4()), Err(AppError::Forbidden)));
        assert!(matches!(
            registry.remove(id, Uuid::new_v4()),
            Err(AppError::Forbidden)
        ));
        registry.remove(id, owner).unwrap();
        assert!(matches!(registry.get(id, owner), Err(AppError::NotFound(_))));
        assert_eq!(registry.len(), 0);
    }

    fn blank_session(owner: Uuid) -> EditorSession {
        EditorSession::new(owner, None, EditorState::new(ResumeRecord::default()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_evicted() {
        let registry = SessionRegistry::new(Duration::from_secs(60), 5);
        let owner = Uuid::new_v4();
        let stale = blank_session(owner);
        let stale_id = stale.id;
        registry.insert(stale).unwrap();
        let active = blank_session(owner);
        let active_id = active.id;
        registry.insert(active).unwrap();

        tokio::time::advance(Duration::from_secs(40)).await;
        assert!(registry.get(active_id, owner).is_ok());
        tokio::time::advance(Duration::from_secs(40)).await;

        assert!(matches!(registry.get(stale_id, owner), Err(AppError::NotFound(_))));
        assert_eq!(registry.len(), 1);
        assert!(registry.get(active_id, owner).is_ok());

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(registry.evict_idle(), 1);
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_discards_abandoned_sessions() {
        let registry = SessionRegistry::new(Duration::from_secs(60), 5);
        registry.insert(blank_session(Uuid::new_v4())).unwrap();
        let sweeper = registry.spawn_sweeper(Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(95)).await;
        assert_eq!(registry.len(), 0);
        sweeper.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_owner_session_cap_drops_least_recently_used() {
        let registry = SessionRegistry::new(Duration::from_secs(600), 2);
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        registry.insert(blank_session(other)).unwrap();

        let mut ids = Vec::new();
        for _ in 0..2 {
            let session = blank_session(owner);
            ids.push(session.id);
            registry.insert(session).unwrap();
            tokio::time::advance(Duration::from_secs(1)).await;
        }
        // Touch the first so the second becomes the oldest.
        registry.get(ids[0], owner).unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        registry.insert(blank_session(owner)).unwrap();

        assert!(registry.get(ids[0], owner).is_ok());
        assert!(matches!(registry.get(ids[1], owner), Err(AppError::NotFound(_))));
        assert_eq!(registry.len(), 3);
    }

    #[tokio::test]
    async fn test_reopened_resume_gets_its_template_background() {
        let ada = user("Ada");
        let store = MemoryResumeStore::default();
        let catalog = MemoryTemplateCatalog::default();
        let template_id = catalog.add("Navy", "executive");
        let mut record = ResumeRecord::default();
        record.template_id = Some(template_id);
        record.template_type = TemplateType::Classic;
        let id = store.insert(ada.id, record);
        let req = OpenSessionRequest {
            resume_id: Some(id),
            ..OpenSessionRequest::default()
        };

        let mut session = EditorSession::open(&ada, &req, &store, &catalog, "#2563EB").await;
        let view = session.view();
        assert_eq!(
            view.preview.background_image.as_deref(),
            Some(preview_image_url(template_id).as_str())
        );
        assert_eq!(view.record.template_type, TemplateType::Classic);
        assert!(view.toasts.is_empty());
    }

    #[tokio::test]
    async fn test_reopened_resume_with_missing_template_keeps_record() {
        let ada = user("Ada");
        let store = MemoryResumeStore::default();
        let catalog = MemoryTemplateCatalog::default();
        let mut record = ResumeRecord::default();
        record.template_id = Some(Uuid::new_v4());
        record.summary = "Stored".to_string();
        let id = store.insert(ada.id, record);
        let req = OpenSessionRequest {
            resume_id: Some(id),
            ..OpenSessionRequest::default()
        };

        let mut session = EditorSession::open(&ada, &req, &store, &catalog, "#2563EB").await;
        assert_eq!(session.resume_id, Some(id));
        let view = session.view();
        assert_eq!(view.record.summary, "Stored");
        assert!(view.preview.background_image.is_none());
        assert_eq!(view.toasts, vec![Toast::error(TOAST_TEMPLATE_FAILED)]);
    }
}
