//! Cached Value Binding
//!
//! A typed handle bound to a single cache key, falling back to a default
//! value whenever nothing fresh is cached.

use std::sync::OnceLock;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::cache::{CodableCache, Keyable, Ttl};
use crate::error::{CacheError, Result};
use crate::store::StorageType;

// == Cached Value ==
/// A value persisted under one key with a fixed TTL.
///
/// Reads never fail: a missing, expired or unreadable entry yields the
/// default value. Write failures are logged rather than returned.
///
/// ```no_run
/// use envelope_cache::binding::CachedValue;
/// use envelope_cache::cache::Ttl;
///
/// let launches = CachedValue::new(0u32, "launch-count").with_ttl(Ttl::Never);
/// launches.set(&(launches.get() + 1));
/// ```
#[derive(Debug)]
pub struct CachedValue<T> {
    /// Lazily created cache
    cache: OnceLock<CodableCache>,
    /// Raw key of the bound entry
    key: String,
    /// Storage location of the cache
    storage_type: StorageType,
    /// Optional shared-group identifier
    app_group_id: Option<String>,
    /// TTL applied on every write
    ttl: Ttl,
    /// Value returned when nothing is cached
    default_value: T,
}

impl<T> CachedValue<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    // == Constructor ==
    /// Binds `key` with the default storage location and TTL.
    pub fn new(default_value: T, key: impl Keyable) -> Self {
        Self {
            cache: OnceLock::new(),
            key: key.raw_value(),
            storage_type: StorageType::default(),
            app_group_id: None,
            ttl: Ttl::default(),
            default_value,
        }
    }

    /// Sets where the backing cache keeps its files.
    pub fn with_storage(mut self, storage_type: StorageType, app_group_id: Option<String>) -> Self {
        self.storage_type = storage_type;
        self.app_group_id = app_group_id;
        self
    }

    /// Sets the TTL applied on every write.
    pub fn with_ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the raw key this value is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    // == Get ==
    /// Returns the cached value, or the default if nothing fresh is cached.
    pub fn get(&self) -> T {
        self.cache()
            .fetch(self.key.as_str())
            .unwrap_or_else(|| self.default_value.clone())
    }

    // == Set ==
    /// Caches `value` with the bound TTL.
    ///
    /// A value that serializes to null, such as `None`, clears the entry
    /// instead, so `get` returns the default again.
    pub fn set(&self, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => return self.report("store", Err(CacheError::Serialization(err))),
        };
        if value.is_null() {
            return self.clear();
        }

        let result = self.cache().store_with_ttl(&value, self.key.as_str(), self.ttl);
        self.report("store", result);
    }

    // == Clear ==
    /// Removes the cached value so `get` returns the default again.
    pub fn clear(&self) {
        let result = self.cache().delete(self.key.as_str());
        self.report("delete", result);
    }

    fn cache(&self) -> &CodableCache {
        self.cache.get_or_init(|| {
            CodableCache::new(self.storage_type.clone(), self.app_group_id.clone())
        })
    }

    fn report(&self, operation: &str, result: Result<()>) {
        match result {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {}
            Err(err) => warn!(key = %self.key, operation, error = %err, "Cached value write failed"),
        }
    }
}
