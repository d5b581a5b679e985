use crate::error::AppError;
use std::path::{Path, PathBuf};

/// A directory of processed artifacts, addressable by id prefix.
///
/// Artifacts are named `{video_id}{extension}` with 128-bit random ids, so a
/// shared prefix between two artifacts is treated as negligible rather than
/// enforced. The directory is append-only from this service's perspective;
/// retention is handled out of band.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute location of an artifact inside the store.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Composes the public download URL for a stored filename.
    pub fn download_url(&self, filename: &str, base_url: &str) -> String {
        format!("{}/downloads/{}", base_url.trim_end_matches('/'), filename)
    }

    /// Returns the first stored filename that starts with `id`.
    ///
    /// A missing or unreadable directory is a `StoreUnavailable`, distinct
    /// from `NotFound` (directory readable, zero matches).
    pub async fn resolve_prefix(&self, id: &str) -> Result<String, AppError> {
        if id.is_empty() {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            AppError::StoreUnavailable(format!("cannot read {}: {}", self.dir.display(), e))
        })?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?
        {
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(id) {
                    return Ok(name.to_string());
                }
            }
        }

        Err(AppError::NotFound("Video not found".to_string()))
    }
}
