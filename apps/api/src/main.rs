mod admin;
mod auth;
mod config;
mod db;
mod editor;
mod errors;
mod export;
mod layout;
mod models;
mod render;
mod resumes;
mod routes;
mod state;
mod store;
mod templates;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::editor::session::SessionRegistry;
use crate::export::{PreviewRasterizer, Rasterizer, RusttypeFace};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{PgResumeStore, PgTemplateCatalog};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // PDF export needs a real font; without one the editor still works
    let rasterizer = load_rasterizer(&config);

    // Abandoned editor sessions are swept in the background
    let sessions = SessionRegistry::new(
        Duration::from_secs(config.session_idle_minutes * 60),
        config.max_sessions_per_user,
    );
    sessions.spawn_sweeper(Duration::from_secs(60));

    let state = AppState {
        resumes: Arc::new(PgResumeStore::new(db.clone())),
        templates: Arc::new(PgTemplateCatalog::new(db.clone())),
        sessions,
        db,
        s3,
        config: config.clone(),
        rasterizer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_rasterizer(config: &Config) -> Option<Arc<dyn Rasterizer>> {
    let Some(path) = config.preview_font_path.as_deref() else {
        warn!("PREVIEW_FONT_PATH not set; PDF export disabled");
        return None;
    };
    match RusttypeFace::from_path(path) {
        Ok(face) => {
            info!("Preview font loaded from {path}");
            Some(Arc::new(PreviewRasterizer::new(face)))
        }
        Err(e) => {
            warn!("Preview font {path} unusable ({e}); PDF export disabled");
            None
        }
    }
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "resume-api-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
