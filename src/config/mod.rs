use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the service.
///
/// Constructed once in `main` and handed to each component through
/// `AppState`; nothing reads the environment after startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listening port (default: 3000)
    pub port: u16,

    /// Directory where raw uploads are staged before transcoding
    pub staging_dir: PathBuf,

    /// Directory where processed artifacts are stored
    pub artifact_dir: PathBuf,

    /// Maximum accepted upload size in bytes (default: 100 MB)
    pub max_upload_bytes: u64,

    /// Public base URL used to compose download links
    pub base_url: String,

    /// CORS origin allowlist; empty means permissive
    pub allowed_origins: Vec<String>,

    /// Shared secret for `/api/*` routes; `None` disables the check
    pub api_key: Option<String>,

    /// Sliding-window duration for the per-client rate ceiling
    pub rate_window: Duration,

    /// Maximum requests per client within one window
    pub rate_max_requests: u32,

    /// Transcoder backend: "ffmpeg" or "copy" (passthrough, for development)
    pub transcoder_kind: String,

    /// Path to the ffmpeg binary
    pub ffmpeg_path: String,

    /// Include subprocess diagnostics in error bodies (development only)
    pub expose_error_details: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            staging_dir: PathBuf::from("uploads"),
            artifact_dir: PathBuf::from("processed"),
            max_upload_bytes: 100 * 1024 * 1024, // 100 MB
            base_url: "http://localhost:3000".to_string(),
            allowed_origins: Vec::new(),
            api_key: None,
            rate_window: Duration::from_secs(60),
            rate_max_requests: 30,
            transcoder_kind: "ffmpeg".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            expose_error_details: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            staging_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.staging_dir),

            artifact_dir: env::var("PROCESSED_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.artifact_dir),

            max_upload_bytes: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_bytes),

            base_url: env::var("BASE_URL").unwrap_or(default.base_url),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or(default.allowed_origins),

            api_key: env::var("API_KEY").ok().filter(|k| !k.is_empty()),

            rate_window: env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.rate_window),

            rate_max_requests: env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.rate_max_requests),

            transcoder_kind: env::var("TRANSCODER").unwrap_or(default.transcoder_kind),

            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or(default.ffmpeg_path),

            expose_error_details: env::var("EXPOSE_ERROR_DETAILS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(default.expose_error_details),
        }
    }

    /// Create config for development (passthrough transcoder, relaxed limits)
    pub fn development() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
            rate_max_requests: 1000,
            transcoder_kind: "copy".to_string(),
            expose_error_details: true,
            ..Self::default()
        }
    }
}
