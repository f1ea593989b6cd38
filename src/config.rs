//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::Ttl;
use crate::store::{Directory, StorageType, DEFAULT_DIRECTORY_NAME};

/// Storage scope selected by `CACHE_STORAGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    Temporary,
    Permanent,
}

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Temporary or permanent storage
    pub storage_scope: StorageScope,
    /// Directory name under the storage root
    pub directory: String,
    /// Explicit storage directory, overrides scope and directory
    pub path: Option<PathBuf>,
    /// Optional shared-group identifier
    pub app_group_id: Option<String>,
    /// Default TTL for entries stored without an explicit TTL
    pub default_ttl: Ttl,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_STORAGE` - `temporary` or `permanent` (default: temporary)
    /// - `CACHE_DIRECTORY` - Directory name (default: envelope-cache)
    /// - `CACHE_PATH` - Explicit storage directory (default: unset)
    /// - `CACHE_APP_GROUP` - Shared-group identifier (default: unset)
    /// - `DEFAULT_TTL` - Seconds or `never` (default: 86400)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            storage_scope: match env::var("CACHE_STORAGE").ok().as_deref() {
                Some(v) if v.eq_ignore_ascii_case("permanent") => StorageScope::Permanent,
                Some(v) if v.eq_ignore_ascii_case("temporary") => StorageScope::Temporary,
                _ => defaults.storage_scope,
            },
            directory: non_empty_var("CACHE_DIRECTORY").unwrap_or(defaults.directory),
            path: non_empty_var("CACHE_PATH").map(PathBuf::from),
            app_group_id: non_empty_var("CACHE_APP_GROUP"),
            default_ttl: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_ttl),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }

    /// Resolves the storage type described by this configuration.
    pub fn storage_type(&self) -> StorageType {
        if let Some(path) = &self.path {
            return StorageType::Path(path.clone());
        }

        let directory = Directory::Custom(self.directory.clone());
        match self.storage_scope {
            StorageScope::Temporary => StorageType::Temporary(directory),
            StorageScope::Permanent => StorageType::Permanent(directory),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_scope: StorageScope::Temporary,
            directory: DEFAULT_DIRECTORY_NAME.to_string(),
            path: None,
            app_group_id: None,
            default_ttl: Ttl::default(),
            server_port: 3000,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
