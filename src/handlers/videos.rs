use crate::AppState;
use crate::error::AppError;
use crate::services::{transcoder, upload};
use crate::utils::ids::new_id;
use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub success: bool,
    pub video_id: String,
    pub download_url: String,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    pub success: bool,
    pub video_id: String,
    pub download_url: String,
    pub filename: String,
}

/// POST /api/process: stage the upload, run the transcoder, store the
/// artifact and answer with its download URL. The staged input is removed on
/// success and failure alike; the whole pipeline runs within this request,
/// there is no deferred job.
pub async fn process(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, AppError> {
    let staged = upload::receive(&mut multipart, &state.config).await?;
    tracing::info!(
        size = staged.size,
        media_type = %staged.media_type,
        "staged upload at {}",
        staged.path.display()
    );

    // the artifact id is generated independently of the staged filename
    let video_id = new_id();
    let filename = format!("{}{}", video_id, staged.extension);
    let output = state.store.path_for(&filename);

    let result = transcoder::normalize(state.transcoder.as_ref(), &staged.path, &output).await;
    staged.discard().await;

    if let Err(err) = result {
        return Err(match err {
            AppError::TranscodeFailed(diag) if !state.config.expose_error_details => {
                tracing::error!("transcode failed: {diag}");
                AppError::TranscodeFailed("ffmpeg exited with an error".to_string())
            }
            other => other,
        });
    }

    tracing::info!(%video_id, "stored processed video as {filename}");

    Ok(Json(ProcessResponse {
        success: true,
        download_url: state.store.download_url(&filename, &state.config.base_url),
        video_id,
        message: "Video processed successfully".to_string(),
    }))
}

/// GET /api/video/:id: resolve an artifact by id prefix and return its
/// download URL. Never re-invokes the transcoder.
pub async fn lookup(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LookupResponse>, AppError> {
    let filename = state.store.resolve_prefix(&id).await?;
    let download_url = state.store.download_url(&filename, &state.config.base_url);

    Ok(Json(LookupResponse {
        success: true,
        video_id: id,
        download_url,
        filename,
    }))
}
