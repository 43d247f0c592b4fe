//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Every call into the
//! engine is bounded by a deadline; a call that misses it never touches the
//! cache, because the engine only mutates after it holds the lock.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::CacheEngine;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, validate_value, DeleteResponse, HealthResponse, SetParams, SetResponse,
    StatsResponse,
};

/// Request header a caller may use to ask for a shorter deadline, in ms.
pub const TIMEOUT_HEADER: &str = "x-timeout-ms";

/// Deadline applied when the configuration does not set one.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache engine
    pub cache: Arc<CacheEngine>,
    /// Upper bound on how long a request may wait for the cache
    pub request_timeout: Duration,
}

impl AppState {
    /// Creates a new AppState around the given engine.
    pub fn new(cache: CacheEngine) -> Self {
        Self {
            cache: Arc::new(cache),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Creates a new AppState from configuration.
    ///
    /// Must be called within a Tokio runtime, as it starts the engine.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheEngine::with_config(config.engine_config()))
            .with_request_timeout(config.request_timeout())
    }

    /// The deadline for one request: the caller's `x-timeout-ms` if present
    /// and shorter, otherwise the configured timeout.
    fn deadline_for(&self, headers: &HeaderMap) -> Duration {
        headers
            .get(TIMEOUT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .map_or(self.request_timeout, |requested| {
                requested.min(self.request_timeout)
            })
    }
}

/// Runs `fut`, failing with `DeadlineExceeded` if it takes longer than
/// `deadline`.
pub async fn with_deadline<F>(deadline: Duration, fut: F) -> Result<F::Output>
where
    F: Future,
{
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| CacheError::DeadlineExceeded(deadline))
}

/// Handler for PUT /set/:key?ttl=<secs>
///
/// Stores the raw request body under `key`. A missing or zero `ttl` never
/// expires.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<SetParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = validate_key(&key).or_else(|| validate_value(&body)) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let deadline = state.deadline_for(&headers);
    with_deadline(
        deadline,
        state.cache.set(key.clone(), body.to_vec(), params.ttl()),
    )
    .await?;

    Ok(Json(SetResponse::new(key)))
}

/// Handler for GET /get/:key
///
/// Returns the stored bytes as `application/octet-stream`.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let deadline = state.deadline_for(&headers);
    let value = with_deadline(deadline, state.cache.get(&key)).await?;
    let value = value.ok_or_else(|| CacheError::NotFound(key))?;

    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], value).into_response())
}

/// Handler for DELETE /del/:key
///
/// Deleting an absent key is not an error.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<Json<DeleteResponse>> {
    let deadline = state.deadline_for(&headers);
    let deleted = with_deadline(deadline, state.cache.delete(&key)).await?;

    Ok(Json(DeleteResponse::new(key, deleted)))
}

/// Handler for GET /stats
pub async fn stats_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>> {
    let deadline = state.deadline_for(&headers);
    let stats = with_deadline(deadline, state.cache.stats()).await?;

    Ok(Json(StatsResponse::new(&stats, state.cache.capacity())))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
