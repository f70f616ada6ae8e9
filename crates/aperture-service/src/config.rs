use std::env;
use std::path::PathBuf;

use chrono::Duration;

/// Runtime settings, built once at process start and passed by reference
/// into [`crate::Service::new`]. Never a process-wide global.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub media_root: PathBuf,
    pub token_secret: String,
    pub token_ttl: Duration,
}

impl Config {
    /// Reads settings from the environment, honoring a `.env` file in dev.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("APERTURE_DB_PATH")
            .unwrap_or_else(|_| "aperture.db".to_string())
            .into();
        let media_root = env::var("APERTURE_MEDIA_ROOT")
            .unwrap_or_else(|_| "media".to_string())
            .into();
        let token_secret = env::var("APERTURE_TOKEN_SECRET")
            .unwrap_or_else(|_| "dev-secret-change-me".to_string());
        let token_ttl_hours = env::var("APERTURE_TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24 * 7);

        Self {
            db_path,
            media_root,
            token_secret,
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }
}
