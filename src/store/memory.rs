//! Memory Store Module
//!
//! HashMap-backed byte store for tests and throwaway caches.

use std::collections::HashMap;
use std::io;
use std::sync::{PoisonError, RwLock};

use super::ByteStore;

// == Memory Store ==
/// In-process byte store. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Key-bytes storage
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ByteStore for MemoryStore {
    fn put(&self, bytes: &[u8], key: &str) -> io::Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn data(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn delete(&self, key: &str) -> io::Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no entry for {}", key)))
    }

    fn delete_all(&self) -> io::Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}
