//! Codable Cache Module
//!
//! Typed store/fetch/delete over a byte store, with eviction of stale and
//! unreadable entries on read.

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::{EnvelopeCodec, Keyable, Ttl};
use crate::error::{CacheError, Result};
use crate::store::{ByteStore, DiskStore, StorageType};

type StoreFactory<S> = Box<dyn Fn() -> io::Result<S> + Send + Sync>;
type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

// == Codable Cache ==
/// TTL-aware cache of serializable values.
///
/// One handle serves any number of value types under different keys. The
/// byte store is built at most once, on first use, and reused afterwards.
///
/// Write operations (`store`, `delete`, `delete_all`) report failures.
/// `fetch` never does: anything that cannot be read back as a fresh value
/// is treated as absent and removed from the store.
pub struct CodableCache<S = DiskStore> {
    /// Lazily constructed byte store
    store: OnceLock<S>,
    /// Serializes store construction
    init_lock: Mutex<()>,
    /// Builds the byte store on first use
    factory: Option<StoreFactory<S>>,
    /// Envelope codec
    codec: EnvelopeCodec,
    /// TTL used by `store`
    default_ttl: Ttl,
    /// Source of `created` timestamps and staleness checks
    clock: Clock,
}

impl CodableCache<DiskStore> {
    // == Constructor ==
    /// Creates a cache backed by a disk store.
    ///
    /// The directory is resolved and created on first use, not here.
    ///
    /// # Arguments
    /// * `storage_type` - Where the disk store keeps its files
    /// * `app_group_id` - Optional shared-group identifier
    pub fn new(storage_type: StorageType, app_group_id: Option<String>) -> Self {
        Self::lazy(move || DiskStore::new(&storage_type, app_group_id.as_deref()))
    }
}

impl Default for CodableCache<DiskStore> {
    fn default() -> Self {
        Self::new(StorageType::default(), None)
    }
}

impl<S: ByteStore> CodableCache<S> {
    /// Creates a cache over an already constructed byte store.
    pub fn with_store(store: S) -> Self {
        Self::from_parts(OnceLock::from(store), None)
    }

    /// Creates a cache whose byte store is built by `factory` on first use.
    pub fn lazy<F>(factory: F) -> Self
    where
        F: Fn() -> io::Result<S> + Send + Sync + 'static,
    {
        Self::from_parts(OnceLock::new(), Some(Box::new(factory)))
    }

    fn from_parts(store: OnceLock<S>, factory: Option<StoreFactory<S>>) -> Self {
        Self {
            store,
            init_lock: Mutex::new(()),
            factory,
            codec: EnvelopeCodec::new(),
            default_ttl: Ttl::default(),
            clock: Arc::new(Utc::now),
        }
    }

    /// Sets the TTL used by `store`.
    pub fn with_default_ttl(mut self, ttl: Ttl) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Replaces the clock used for timestamps and staleness checks.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the TTL used by `store`.
    pub fn default_ttl(&self) -> Ttl {
        self.default_ttl
    }

    // == Byte Store ==
    /// Returns the underlying byte store, building it if needed.
    ///
    /// # Errors
    /// `CacheError::StoreUnavailable` if construction fails. A failed
    /// construction is retried on the next call.
    pub fn byte_store(&self) -> Result<&S> {
        if let Some(store) = self.store.get() {
            return Ok(store);
        }

        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = self.store.get() {
            return Ok(store);
        }

        let factory = self.factory.as_ref().ok_or_else(|| {
            CacheError::StoreUnavailable(io::Error::new(
                io::ErrorKind::Other,
                "no byte store configured",
            ))
        })?;
        let store = factory().map_err(CacheError::StoreUnavailable)?;
        debug!("Byte store initialized");

        Ok(self.store.get_or_init(|| store))
    }

    // == Store ==
    /// Stores `value` under `key` with the default TTL.
    pub fn store<T>(&self, value: &T, key: &(impl Keyable + ?Sized)) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.store_with_ttl(value, key, self.default_ttl)
    }

    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// # Errors
    /// - `CacheError::Serialization` if `value` cannot be encoded
    /// - `CacheError::StoreWrite` if the byte store rejects the write
    /// - `CacheError::StoreUnavailable` if the byte store cannot be built
    pub fn store_with_ttl<T>(&self, value: &T, key: &(impl Keyable + ?Sized), ttl: Ttl) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let key = key.raw_value();
        let bytes = self.codec.encode(value, ttl, self.now())?;

        self.byte_store()?
            .put(&bytes, &key)
            .map_err(CacheError::StoreWrite)?;

        debug!(key = %key, ttl = %ttl, size = bytes.len(), "Stored cache entry");
        Ok(())
    }

    // == Fetch ==
    /// Returns the value stored under `key` if it is present and fresh.
    ///
    /// Stale entries, entries that cannot be decoded as a `T`, and entries
    /// the store fails to read are deleted (best effort) and reported as
    /// `None`.
    pub fn fetch<T>(&self, key: &(impl Keyable + ?Sized)) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let key = key.raw_value();

        let store = match self.byte_store() {
            Ok(store) => store,
            Err(err) => {
                warn!(key = %key, error = %err, "Cache read skipped");
                return None;
            }
        };

        let bytes = match store.data(&key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = %key, error = %err, "Failed to read cache entry");
                self.evict(store, &key);
                return None;
            }
        };

        match self.codec.decode::<T>(&bytes) {
            Ok(envelope) if envelope.is_stale_at(self.now()) => {
                debug!(key = %key, created = %envelope.created, ttl = %envelope.ttl, "Evicting stale entry");
                self.evict(store, &key);
                None
            }
            Ok(envelope) => Some(envelope.object),
            Err(err) => {
                warn!(key = %key, error = %err, "Evicting unreadable entry");
                self.evict(store, &key);
                None
            }
        }
    }

    // == Delete ==
    /// Removes the entry stored under `key`.
    ///
    /// Deleting a missing entry succeeds.
    pub fn delete(&self, key: &(impl Keyable + ?Sized)) -> Result<()> {
        let key = key.raw_value();

        match self.byte_store()?.delete(&key) {
            Ok(()) => {
                debug!(key = %key, "Deleted cache entry");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CacheError::StoreWrite(err)),
        }
    }

    // == Delete All ==
    /// Removes every entry in this cache's store.
    pub fn delete_all(&self) -> Result<()> {
        self.byte_store()?
            .delete_all()
            .map_err(CacheError::StoreWrite)?;

        debug!("Deleted all cache entries");
        Ok(())
    }

    /// Deletes `key` from `store`, logging instead of returning failures.
    fn evict(&self, store: &S, key: &str) {
        match store.delete(key) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(key = %key, error = %err, "Failed to evict cache entry"),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

impl<S: fmt::Debug> fmt::Debug for CodableCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodableCache")
            .field("store", &self.store.get())
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
