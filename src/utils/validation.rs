use crate::error::AppError;
use std::path::Path;

/// Declared MIME types accepted for upload. Anything else is rejected before
/// a single byte reaches the staging directory.
pub const ALLOWED_VIDEO_TYPES: &[&str] = &[
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-ms-wmv",
    "video/webm",
    "video/ogg",
    "application/ogg",
];

/// Validates the declared content type against the video allowlist.
pub fn validate_media_type(content_type: &str) -> Result<(), AppError> {
    let normalized = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if ALLOWED_VIDEO_TYPES.iter().any(|&allowed| allowed == normalized) {
        return Ok(());
    }

    Err(AppError::UnsupportedMediaType(content_type.to_string()))
}

/// Derives a safe extension (including the dot) from a client-supplied
/// filename. Only ascii alphanumerics survive; the rest of the client name is
/// never used, so path traversal through the filename is impossible.
pub fn safe_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            e.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}
