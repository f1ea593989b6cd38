//! Disk Store Module
//!
//! File-per-key byte store rooted in a single directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};
use tracing::debug;

use super::{ByteStore, StorageType};

/// Suffix of in-flight writes, renamed into place once complete.
const PARTIAL_SUFFIX: &str = "partial";

/// Length of an entry filename (hex SHA-256).
const ENTRY_NAME_LEN: usize = 64;

// == Disk Store ==
/// Byte store keeping one file per key.
///
/// Filenames are the SHA-256 hex digest of the key, so any key string maps
/// to a safe, fixed-length name inside the root directory.
#[derive(Debug)]
pub struct DiskStore {
    /// Directory holding the entry files
    root: PathBuf,
    /// Counter for unique partial-write names
    writes: AtomicU64,
}

impl DiskStore {
    // == Constructor ==
    /// Opens a store at the location described by `storage_type`.
    ///
    /// # Arguments
    /// * `storage_type` - Storage scope and directory
    /// * `app_group_id` - Optional shared-group identifier
    pub fn new(storage_type: &StorageType, app_group_id: Option<&str>) -> io::Result<Self> {
        Self::at(storage_type.resolve(app_group_id)?)
    }

    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn at(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "Disk store opened");

        Ok(Self {
            root,
            writes: AtomicU64::new(0),
        })
    }

    /// Returns the directory holding this store's entries.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.root.join(hex::encode(hasher.finalize()))
    }
}

impl ByteStore for DiskStore {
    fn put(&self, bytes: &[u8], key: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;

        let path = self.path_for(key);
        let seq = self.writes.fetch_add(1, Ordering::Relaxed);
        let partial = path.with_extension(format!("{}.{}.{}", process::id(), seq, PARTIAL_SUFFIX));

        fs::write(&partial, bytes)?;
        if let Err(err) = fs::rename(&partial, &path) {
            let _ = fs::remove_file(&partial);
            return Err(err);
        }
        Ok(())
    }

    fn data(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn delete(&self, key: &str) -> io::Result<()> {
        fs::remove_file(self.path_for(key))
    }

    fn delete_all(&self) -> io::Result<()> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err),
        };

        let mut removed = 0usize;
        for entry in entries {
            let entry = entry?;
            let owned = entry
                .file_name()
                .to_str()
                .is_some_and(is_entry_file_name);
            if owned && entry.file_type()?.is_file() {
                match fs::remove_file(entry.path()) {
                    Ok(()) => removed += 1,
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                    Err(err) => return Err(err),
                }
            }
        }

        debug!(root = %self.root.display(), removed, "Disk store cleared");
        Ok(())
    }
}

/// Returns true for names this store writes: a hex digest, optionally
/// followed by a `.<pid>.<seq>.partial` suffix.
fn is_entry_file_name(name: &str) -> bool {
    let Some(digest) = name.get(..ENTRY_NAME_LEN) else {
        return false;
    };
    let rest = &name[ENTRY_NAME_LEN..];
    let is_digest = digest
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));

    is_digest
        && (rest.is_empty()
            || (rest.starts_with('.') && rest.ends_with(&format!(".{}", PARTIAL_SUFFIX))))
}
