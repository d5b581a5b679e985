pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::middleware::rate_limit::RateLimiter;
use crate::services::store::ArtifactStore;
use crate::services::transcoder::Transcoder;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub transcoder: Arc<dyn Transcoder>,
    pub store: Arc<ArtifactStore>,
    pub rate_limiter: Arc<RateLimiter>,
}

pub fn create_app(state: AppState) -> Router {
    let cors = if state.config.allowed_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // slightly above the configured ceiling so the receiver's own 413
    // message (with the limit in MB) wins over the framework's
    let body_limit = state.config.max_upload_bytes as usize + 1024 * 1024;

    let api = Router::new()
        .route("/process", post(handlers::videos::process))
        .route("/video/:id", get(handlers::videos::lookup))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth::require_api_key,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::rate_limit::enforce,
        ));

    Router::new()
        .nest("/api", api)
        .route("/downloads/:filename", get(handlers::downloads::serve))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}
