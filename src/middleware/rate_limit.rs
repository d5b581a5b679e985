use crate::AppState;
use crate::error::AppError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding-window request counter keyed by client address.
///
/// Timestamps older than the window are pruned on each hit and clients with
/// no hit inside the window are dropped entirely, so memory stays
/// proportional to recent traffic.
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Records a hit for `key`; returns false when the window is already full.
    pub fn try_acquire(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(|p| p.into_inner());

        // forget clients whose entire window has lapsed, so the map only
        // tracks addresses seen within the last window
        hits.retain(|_, entry| {
            entry
                .back()
                .is_some_and(|&t| now.duration_since(t) < self.window)
        });

        let entry = hits.entry(key.to_string()).or_default();

        while entry
            .front()
            .is_some_and(|&t| now.duration_since(t) >= self.window)
        {
            entry.pop_front();
        }

        if entry.len() as u32 >= self.max_requests {
            return false;
        }
        entry.push_back(now);
        true
    }
}

/// Applies the per-client ceiling to every `/api/*` request.
pub async fn enforce(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&req);
    if !state.rate_limiter.try_acquire(&key) {
        tracing::warn!("rate limit exceeded for {key}");
        return Err(AppError::RateLimited);
    }
    Ok(next.run(req).await)
}

/// Client identity: forwarded address when behind a proxy, otherwise the
/// connection peer.
fn client_key(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
