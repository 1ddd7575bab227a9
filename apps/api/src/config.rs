use anyhow::{Context, Result};

use crate::models::resume::DEFAULT_ACCENT_COLOR;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub rust_log: String,
    /// TrueType font the PDF rasterizer draws with. Export is unavailable without it.
    pub preview_font_path: Option<String>,
    /// Accent for new resumes when the gallery passes no `color`.
    pub default_accent_color: String,
    /// Editor sessions untouched this long are discarded.
    pub session_idle_minutes: u64,
    pub max_sessions_per_user: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            preview_font_path: optional_env("PREVIEW_FONT_PATH"),
            default_accent_color: optional_env("DEFAULT_ACCENT_COLOR")
                .unwrap_or_else(|| DEFAULT_ACCENT_COLOR.to_string()),
            session_idle_minutes: optional_env("SESSION_IDLE_MINUTES")
                .unwrap_or_else(|| "30".to_string())
                .parse::<u64>()
                .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?,
            max_sessions_per_user: optional_env("MAX_SESSIONS_PER_USER")
                .unwrap_or_else(|| "5".to_string())
                .parse::<usize>()
                .context("MAX_SESSIONS_PER_USER must be a positive integer")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
