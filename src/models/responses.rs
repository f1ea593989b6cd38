//! Response DTOs for the cache HTTP API

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Body of GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Acknowledgement for PUT /set, DELETE /del/:key and DELETE /flush.
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    pub message: String,
    /// Absent for namespace-wide operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl WriteResponse {
    pub fn stored(key: impl Into<String>) -> Self {
        Self::for_key(key.into(), "stored")
    }

    pub fn deleted(key: impl Into<String>) -> Self {
        Self::for_key(key.into(), "deleted")
    }

    pub fn flushed() -> Self {
        Self {
            message: "All entries deleted".to_string(),
            key: None,
        }
    }

    fn for_key(key: String, action: &str) -> Self {
        Self {
            message: format!("Key '{}' {}", key, action),
            key: Some(key),
        }
    }
}

/// Body of GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            timestamp: Utc::now(),
        }
    }
}

/// Body of every error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_response_keeps_structure() {
        let resp = GetResponse::new("test_key", json!({"nested": [1, 2]}));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["key"], "test_key");
        assert_eq!(json["value"]["nested"][1], 2);
    }

    #[test]
    fn test_write_responses() {
        let json = serde_json::to_value(WriteResponse::stored("my_key")).unwrap();
        assert_eq!(json["key"], "my_key");
        assert_eq!(json["message"], "Key 'my_key' stored");

        let json = serde_json::to_value(WriteResponse::deleted("old")).unwrap();
        assert_eq!(json["message"], "Key 'old' deleted");

        let json = serde_json::to_value(WriteResponse::flushed()).unwrap();
        assert!(json.get("key").is_none());
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_value(HealthResponse::healthy()).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
