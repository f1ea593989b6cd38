//! API Handlers
//!
//! HTTP request handlers for each cache endpoint. Cache operations touch
//! the filesystem, so they run on tokio's blocking pool.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::CodableCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{GetResponse, HealthResponse, SetRequest, WriteResponse};

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub cache: Arc<CodableCache>,
}

impl AppState {
    pub fn new(cache: CodableCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Builds the cache from the configured location and default TTL.
    pub fn from_config(config: &Config) -> Self {
        let cache = CodableCache::new(config.storage_type(), config.app_group_id.clone())
            .with_default_ttl(config.default_ttl);
        Self::new(cache)
    }

    /// Runs `op` against the cache on the blocking pool.
    async fn with_cache<F, R>(&self, op: F) -> Result<R>
    where
        F: FnOnce(&CodableCache) -> R + Send + 'static,
        R: Send + 'static,
    {
        let cache = self.cache.clone();
        tokio::task::spawn_blocking(move || op(&cache))
            .await
            .map_err(CacheError::TaskFailed)
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<WriteResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let SetRequest { key, value, ttl } = req;
    let response = WriteResponse::stored(key.as_str());
    state
        .with_cache(move |cache| match ttl {
            Some(ttl) => cache.store_with_ttl(&value, key.as_str(), ttl),
            None => cache.store(&value, key.as_str()),
        })
        .await??;

    Ok(Json(response))
}

/// Handler for GET /get/:key
///
/// Expired and unreadable entries are evicted and reported as not found.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let lookup = key.clone();
    let value = state
        .with_cache(move |cache| cache.fetch::<Value>(lookup.as_str()))
        .await?
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
///
/// Missing keys are not an error.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<WriteResponse>> {
    let response = WriteResponse::deleted(key.as_str());
    state
        .with_cache(move |cache| cache.delete(key.as_str()))
        .await??;

    Ok(Json(response))
}

/// Handler for DELETE /flush
pub async fn flush_handler(State(state): State<AppState>) -> Result<Json<WriteResponse>> {
    state.with_cache(|cache| cache.delete_all()).await??;

    Ok(Json(WriteResponse::flushed()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
