//! Error types for the envelope cache
//!
//! Provides unified error handling using thiserror.

use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Only the write path (`store`, `delete`, `delete_all`) ever hands one of
/// these to a caller. Read-path failures are resolved inside the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Value could not be encoded into an envelope
    #[error("Serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Stored bytes do not match the envelope shape for the requested type
    #[error("Deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// Byte store rejected a write or delete
    #[error("Store write failed: {0}")]
    StoreWrite(#[source] io::Error),

    /// Byte store could not be constructed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] io::Error),

    /// Blocking cache task panicked or was cancelled
    #[error("Cache task failed: {0}")]
    TaskFailed(#[source] tokio::task::JoinError),

    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Returns true when the underlying store reported a missing entry.
    pub fn is_not_found(&self) -> bool {
        match self {
            CacheError::NotFound(_) => true,
            CacheError::StoreWrite(err) => err.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Serialization(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Deserialization(_)
            | CacheError::StoreWrite(_)
            | CacheError::TaskFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
