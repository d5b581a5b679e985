use crate::AppState;
use crate::error::AppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Shared-secret check for `/api/*` routes: the `x-api-key` header must match
/// the configured key exactly. A missing configuration disables the check.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let provided = req.headers().get("x-api-key").and_then(|h| h.to_str().ok());

    if provided == Some(expected) {
        Ok(next.run(req).await)
    } else {
        Err(AppError::Unauthorized)
    }
}
