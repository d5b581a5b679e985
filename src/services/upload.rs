use crate::config::AppConfig;
use crate::error::AppError;
use crate::utils::ids::new_id;
use crate::utils::validation::{safe_extension, validate_media_type};
use axum::extract::Multipart;
use std::path::PathBuf;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

/// A raw upload staged on disk, alive for at most one request: it is either
/// consumed by the transcoder or discarded on the failure path.
#[derive(Debug)]
pub struct StagedUpload {
    pub path: PathBuf,
    pub extension: String,
    pub media_type: String,
    pub size: u64,
}

impl StagedUpload {
    /// Removes the staged file. Failures are logged, never surfaced; by the
    /// time this runs the request's outcome is already decided.
    pub async fn discard(self) {
        if let Err(e) = fs::remove_file(&self.path).await {
            tracing::warn!(
                "failed to remove staged upload {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Accepts exactly one multipart file field named `video`, validating the
/// declared media type before any byte is persisted and enforcing the size
/// ceiling while streaming to the staging directory. The staged file is named
/// `{new_id()}{ext}`; the client-supplied filename only contributes a
/// sanitized extension.
pub async fn receive(
    multipart: &mut Multipart,
    config: &AppConfig,
) -> Result<StagedUpload, AppError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("video") {
            continue;
        }

        let extension = field.file_name().map(safe_extension).unwrap_or_default();
        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        validate_media_type(&media_type)?;

        fs::create_dir_all(&config.staging_dir).await?;
        let path = config.staging_dir.join(format!("{}{}", new_id(), extension));
        let mut file = File::create(&path).await?;
        let mut size: u64 = 0;

        loop {
            let chunk = match field.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    let _ = fs::remove_file(&path).await;
                    return Err(AppError::InvalidInput(format!("upload stream aborted: {e}")));
                }
            };

            size += chunk.len() as u64;
            if size > config.max_upload_bytes {
                let _ = fs::remove_file(&path).await;
                return Err(AppError::PayloadTooLarge(
                    config.max_upload_bytes / (1024 * 1024),
                ));
            }

            if let Err(e) = file.write_all(&chunk).await {
                let _ = fs::remove_file(&path).await;
                return Err(e.into());
            }
        }

        if let Err(e) = file.flush().await {
            let _ = fs::remove_file(&path).await;
            return Err(e.into());
        }

        return Ok(StagedUpload {
            path,
            extension,
            media_type,
            size,
        });
    }

    Err(AppError::MissingFile)
}
