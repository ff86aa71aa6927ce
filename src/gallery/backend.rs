//! Durable storage backends for the gallery
//!
//! The gallery persists one record: the whole serialized collection under a
//! fixed key (a single file on disk). The backend seam exists so capacity
//! exhaustion can be simulated deterministically: write failures distinguish
//! "out of space" from other I/O problems, which is what drives the
//! degradation cascade in the store.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Why a backend write failed
#[derive(Error, Debug)]
pub enum WriteError {
    /// The payload does not fit in the available capacity.
    /// Durable contents are left unchanged.
    #[error("storage capacity exceeded")]
    CapacityExceeded,

    /// Any other I/O failure
    #[error("storage write failed: {0}")]
    Io(#[from] io::Error),
}

/// A durable slot holding the serialized gallery collection
pub trait StorageBackend: Send + Sync {
    /// Read the stored payload, `None` if nothing was ever written
    fn read(&self) -> io::Result<Option<String>>;

    /// Replace the stored payload atomically with respect to `read`
    fn write(&self, payload: &str) -> Result<(), WriteError>;
}

/// File-backed storage: the collection lives in a single JSON file
pub struct FileBackend {
    path: PathBuf,
    max_bytes: Option<usize>,
}

impl FileBackend {
    /// Create a backend persisting to `path`. Parent directories are
    /// created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: None,
        }
    }

    /// Refuse payloads larger than `max_bytes`, in addition to whatever
    /// the filesystem itself enforces. Zero means unbounded.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = (max_bytes > 0).then_some(max_bytes);
        self
    }

    /// The file this backend writes to
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, payload: &str) -> Result<(), WriteError> {
        if let Some(cap) = self.max_bytes {
            if payload.len() > cap {
                return Err(WriteError::CapacityExceeded);
            }
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write to a sibling temp file and rename, so a failed write never
        // clobbers the previous collection.
        let tmp = self.path.with_extension("json.tmp");
        if let Err(e) = std::fs::write(&tmp, payload) {
            let _ = std::fs::remove_file(&tmp);
            return Err(map_io_error(e));
        }
        std::fs::rename(&tmp, &self.path).map_err(map_io_error)
    }
}

fn map_io_error(e: io::Error) -> WriteError {
    if e.kind() == io::ErrorKind::StorageFull || e.kind() == io::ErrorKind::QuotaExceeded {
        WriteError::CapacityExceeded
    } else {
        WriteError::Io(e)
    }
}

/// In-memory storage with an optional byte capacity, used in tests and
/// anywhere a quota-bounded slot is wanted without touching disk
pub struct MemoryBackend {
    capacity: Option<usize>,
    slot: Mutex<Option<String>>,
}

impl MemoryBackend {
    /// Unbounded in-memory slot
    pub fn new() -> Self {
        Self {
            capacity: None,
            slot: Mutex::new(None),
        }
    }

    /// Slot refusing payloads larger than `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            slot: Mutex::new(None),
        }
    }

    /// Overwrite the slot directly, bypassing the capacity check.
    /// Test hook for seeding corrupt or oversized contents.
    pub fn seed(&self, payload: impl Into<String>) {
        *self.slot.lock().unwrap() = Some(payload.into());
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.slot.lock().unwrap().clone())
    }

    fn write(&self, payload: &str) -> Result<(), WriteError> {
        if let Some(cap) = self.capacity {
            if payload.len() > cap {
                return Err(WriteError::CapacityExceeded);
            }
        }
        *self.slot.lock().unwrap() = Some(payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_backend_round_trip() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path().join("gallery.json"));

        assert!(backend.read().unwrap().is_none());

        backend.write("[1,2,3]").unwrap();
        assert_eq!(backend.read().unwrap().unwrap(), "[1,2,3]");

        backend.write("[]").unwrap();
        assert_eq!(backend.read().unwrap().unwrap(), "[]");
    }

    #[test]
    fn test_file_backend_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path().join("nested/deep/gallery.json"));
        backend.write("[]").unwrap();
        assert_eq!(backend.read().unwrap().unwrap(), "[]");
    }

    #[test]
    fn test_file_backend_max_bytes() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path().join("gallery.json")).with_max_bytes(4);

        backend.write("1234").unwrap();
        let err = backend.write("12345").unwrap_err();
        assert!(matches!(err, WriteError::CapacityExceeded));
        assert_eq!(backend.read().unwrap().unwrap(), "1234");
    }

    #[test]
    fn test_memory_backend_capacity() {
        let backend = MemoryBackend::with_capacity(5);

        backend.write("12345").unwrap();
        assert_eq!(backend.read().unwrap().unwrap(), "12345");

        let err = backend.write("123456").unwrap_err();
        assert!(matches!(err, WriteError::CapacityExceeded));
        // Rejected write leaves the previous payload intact
        assert_eq!(backend.read().unwrap().unwrap(), "12345");
    }

    #[test]
    fn test_memory_backend_unbounded() {
        let backend = MemoryBackend::new();
        let big = "x".repeat(1 << 20);
        backend.write(&big).unwrap();
        assert_eq!(backend.read().unwrap().unwrap().len(), 1 << 20);
    }
}
