//! Byte Store Module
//!
//! Raw key to bytes persistence underneath the envelope cache, plus the
//! storage location policy used to place a disk store on the filesystem.

mod disk;
mod memory;

use std::env;
use std::io;
use std::path::PathBuf;

pub use disk::DiskStore;
pub use memory::MemoryStore;

// == Public Constants ==
/// Directory name used when no custom directory is given.
pub const DEFAULT_DIRECTORY_NAME: &str = "envelope-cache";

// == Byte Store Trait ==
/// Byte-oriented persistent store addressed by string keys.
///
/// Absence is not an error for reads: `data` returns `Ok(None)`. Deleting a
/// missing key reports `io::ErrorKind::NotFound` so callers can decide whether
/// that matters to them.
pub trait ByteStore: Send + Sync {
    /// Writes `bytes` under `key`, replacing any previous value.
    fn put(&self, bytes: &[u8], key: &str) -> io::Result<()>;

    /// Reads the bytes stored under `key`.
    fn data(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// Removes the entry stored under `key`.
    fn delete(&self, key: &str) -> io::Result<()>;

    /// Removes every entry in the store.
    fn delete_all(&self) -> io::Result<()>;
}

// == Directory ==
/// Name of the folder holding a store's entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Directory {
    /// The crate-wide default folder name
    #[default]
    Default,
    /// A caller-chosen folder name
    Custom(String),
}

impl Directory {
    /// Returns the folder name for this directory.
    pub fn name(&self) -> &str {
        match self {
            Directory::Default => DEFAULT_DIRECTORY_NAME,
            Directory::Custom(name) => name,
        }
    }
}

// == Storage Type ==
/// Where a disk store keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// Under the platform cache directory; the OS may purge it.
    Temporary(Directory),
    /// Under the platform data directory.
    Permanent(Directory),
    /// An explicit directory. Group identifiers are not applied.
    Path(PathBuf),
}

impl Default for StorageType {
    fn default() -> Self {
        StorageType::Temporary(Directory::Custom(DEFAULT_DIRECTORY_NAME.to_string()))
    }
}

impl StorageType {
    // == Resolve ==
    /// Resolves the directory a store of this type lives in.
    ///
    /// A shared group identifier adds a `<group>` segment between the
    /// platform root and the directory name, so every process using the same
    /// group resolves the same container.
    pub fn resolve(&self, app_group_id: Option<&str>) -> io::Result<PathBuf> {
        let (mut root, directory) = match self {
            StorageType::Path(path) => return Ok(path.clone()),
            StorageType::Temporary(directory) => {
                (dirs::cache_dir().unwrap_or_else(env::temp_dir), directory)
            }
            StorageType::Permanent(directory) => {
                let root = dirs::data_dir().ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        "no data directory available on this platform",
                    )
                })?;
                (root, directory)
            }
        };

        if let Some(group) = app_group_id {
            root.push(validate_segment(group)?);
        }
        root.push(validate_segment(directory.name())?);
        Ok(root)
    }
}

/// Rejects names that would escape the storage root.
fn validate_segment(segment: &str) -> io::Result<&str> {
    let invalid = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\']);

    if invalid {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid storage path segment: {:?}", segment),
        ));
    }
    Ok(segment)
}
