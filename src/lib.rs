//! Envelope Cache - A persistent, TTL-aware cache for serializable values
//!
//! Values are wrapped with their TTL and creation time before being written
//! to a byte store; expired or unreadable entries are evicted when read.

pub mod api;
pub mod binding;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use api::AppState;
pub use binding::CachedValue;
pub use cache::{CodableCache, Keyable, Ttl};
pub use config::Config;
pub use error::{CacheError, Result};
pub use store::{ByteStore, Directory, DiskStore, MemoryStore, StorageType};
