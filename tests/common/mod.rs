#![allow(dead_code)] // each integration test crate uses a subset of these

use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use vidpress::config::AppConfig;
use vidpress::middleware::rate_limit::RateLimiter;
use vidpress::services::store::ArtifactStore;
use vidpress::services::transcoder::Transcoder;
use vidpress::AppState;

pub const BOUNDARY: &str = "---------------------------123456789012345678901234567";

/// Test state over fresh temp directories, with a pluggable transcoder and a
/// config tweak hook.
pub fn test_state(
    staging: &TempDir,
    artifacts: &TempDir,
    transcoder: Arc<dyn Transcoder>,
    tweak: impl FnOnce(&mut AppConfig),
) -> AppState {
    let mut config = AppConfig::development();
    config.staging_dir = staging.path().to_path_buf();
    config.artifact_dir = artifacts.path().to_path_buf();
    config.max_upload_bytes = 1024 * 1024; // 1 MB keeps oversize tests cheap
    tweak(&mut config);

    AppState {
        store: Arc::new(ArtifactStore::new(config.artifact_dir.clone())),
        rate_limiter: Arc::new(RateLimiter::new(
            config.rate_window,
            config.rate_max_requests,
        )),
        transcoder,
        config,
    }
}

/// Builds a multipart POST carrying one file field.
pub fn multipart_request(
    uri: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    content: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn dir_entry_count(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path()).unwrap().count()
}
