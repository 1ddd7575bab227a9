pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::admin::handlers as admin;
use crate::editor::handlers as editor;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::templates::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resumes
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        // Template catalogue
        .route("/api/v1/templates", get(templates::handle_list_templates))
        .route("/api/v1/templates/:id", get(templates::handle_get_template))
        .route(
            "/api/v1/templates/:id/image",
            get(templates::handle_template_image),
        )
        // Editor sessions
        .route("/api/v1/editor/sessions", post(editor::handle_open_session))
        .route(
            "/api/v1/editor/sessions/:id",
            get(editor::handle_get_session).delete(editor::handle_close_session),
        )
        .route(
            "/api/v1/editor/sessions/:id/fields",
            patch(editor::handle_field_change),
        )
        .route(
            "/api/v1/editor/sessions/:id/lists/:section",
            post(editor::handle_append_list_item),
        )
        .route(
            "/api/v1/editor/sessions/:id/lists/:section/blocks/:block",
            patch(editor::handle_update_list_item),
        )
        .route(
            "/api/v1/editor/sessions/:id/lists/:section/:position",
            delete(editor::handle_remove_list_item),
        )
        .route(
            "/api/v1/editor/sessions/:id/inline",
            post(editor::handle_inline_edit),
        )
        .route(
            "/api/v1/editor/sessions/:id/template",
            put(editor::handle_select_template),
        )
        .route("/api/v1/editor/sessions/:id/save", post(editor::handle_save))
        .route(
            "/api/v1/editor/sessions/:id/export",
            post(editor::handle_export),
        )
        // Admin
        .route("/api/v1/admin/stats", get(admin::handle_stats))
        .route("/api/v1/admin/users", get(admin::handle_list_users))
        .route(
            "/api/v1/admin/users/:id/toggle-admin",
            put(admin::handle_toggle_admin),
        )
        .route("/api/v1/admin/users/:id", delete(admin::handle_delete_user))
        .route("/api/v1/admin/templates", post(admin::handle_upload_template))
        .route(
            "/api/v1/admin/templates/:id",
            delete(admin::handle_deactivate_template),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use aws_sdk_s3::config::{BehaviorVersion, Region};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::editor::session::SessionRegistry;
    use crate::store::memory::{MemoryResumeStore, MemoryTemplateCatalog};

    /// State whose database is never reached: every request here is turned
    /// away before a query runs.
    fn offline_state() -> AppState {
        let config = Config {
            database_url: "postgres://localhost/resume_test".to_string(),
            s3_bucket: "templates".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            preview_font_path: None,
            default_accent_color: "#2563EB".to_string(),
            session_idle_minutes: 30,
            max_sessions_per_user: 5,
        };
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let s3 = aws_sdk_s3::Client::from_conf(
            aws_sdk_s3::Config::builder()
                .behavior_version(BehaviorVersion::latest())
                .region(Region::new("us-east-1"))
                .build(),
        );
        AppState {
            db,
            s3,
            config,
            resumes: Arc::new(MemoryResumeStore::default()),
            templates: Arc::new(MemoryTemplateCatalog::default()),
            sessions: SessionRegistry::default(),
            rasterizer: None,
        }
    }

    #[tokio::test]
    async fn test_health() {
        let response = build_router(offline_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["service"], "resume-api");
    }

    #[tokio::test]
    async fn test_missing_credentials_are_401() {
        for (method, uri) in [
            ("GET", "/api/v1/resumes"),
            ("POST", "/api/v1/editor/sessions"),
            ("GET", "/api/v1/admin/stats"),
        ] {
            let response = build_router(offline_state())
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from("{}"))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_401() {
        let response = build_router(offline_state())
            .oneshot(
                Request::get("/api/v1/templates")
                    .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
