//! Whole-collection persistence backends.
//!
//! A backend stores one serialized collection under one logical key. Every
//! write replaces the whole value; there is no partial update or append log.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Logical key the inventory collection lives under.
pub const STORAGE_KEY: &str = "foodwise_items";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage capacity exceeded: {needed} bytes needed, {capacity} available")]
    CapacityExceeded { needed: usize, capacity: usize },

    #[error("storage lock poisoned")]
    Poisoned,
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Get/set of the whole serialized collection.
pub trait CollectionBackend: Send + Sync {
    /// Logical key (or location) of the collection, for diagnostics.
    fn key(&self) -> &str;

    /// Raw serialized collection; `None` if nothing was ever written.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the whole collection.
    fn store(&self, payload: &str) -> Result<(), StorageError>;

    /// Remove the collection entirely.
    fn clear(&self) -> Result<(), StorageError>;

    /// Fingerprint of the persisted value, if the backend can observe writes
    /// made by other handles/processes. Changes whenever the value changes.
    fn revision(&self) -> Option<u64> {
        None
    }
}

impl<B> CollectionBackend for Arc<B>
where
    B: CollectionBackend + ?Sized,
{
    fn key(&self) -> &str {
        (**self).key()
    }

    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn store(&self, payload: &str) -> Result<(), StorageError> {
        (**self).store(payload)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }

    fn revision(&self) -> Option<u64> {
        (**self).revision()
    }
}

/// In-memory backend for tests/dev.
///
/// An optional byte capacity models a storage quota: writes larger than it are
/// rejected and leave the previous value in place.
#[derive(Debug)]
pub struct InMemoryBackend {
    value: RwLock<Option<String>>,
    capacity: Option<usize>,
    revision: AtomicU64,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            value: RwLock::new(None),
            capacity: None,
            revision: AtomicU64::new(0),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::new()
        }
    }

    /// Seed the backend with a raw value (e.g. a corrupt payload in tests).
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: RwLock::new(Some(value.into())),
            ..Self::new()
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionBackend for InMemoryBackend {
    fn key(&self) -> &str {
        STORAGE_KEY
    }

    fn load(&self) -> Result<Option<String>, StorageError> {
        let value = self.value.read().map_err(|_| StorageError::Poisoned)?;
        Ok(value.clone())
    }

    fn store(&self, payload: &str) -> Result<(), StorageError> {
        if let Some(capacity) = self.capacity {
            if payload.len() > capacity {
                return Err(StorageError::CapacityExceeded {
                    needed: payload.len(),
                    capacity,
                });
            }
        }

        let mut value = self.value.write().map_err(|_| StorageError::Poisoned)?;
        *value = Some(payload.to_string());
        self.revision.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut value = self.value.write().map_err(|_| StorageError::Poisoned)?;
        *value = None;
        self.revision.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn revision(&self) -> Option<u64> {
        Some(self.revision.load(Ordering::SeqCst))
    }
}

/// Single JSON file backend.
///
/// Writes go to a uniquely named temp file in the same directory that is then
/// persisted over the target, so readers never observe a half-written
/// collection and concurrent writers never share a temp file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
    key: String,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let key = path.to_string_lossy().into_owned();
        Self { path, key }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CollectionBackend for JsonFileBackend {
    fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }

    fn store(&self, payload: &str) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StorageError::io(dir, e))?;
        tmp.write_all(payload.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| StorageError::io(tmp.path(), e))?;

        tmp.persist(&self.path)
            .map(|_| ())
            .map_err(|e| StorageError::io(&self.path, e.error))
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }

    fn revision(&self) -> Option<u64> {
        let Ok(meta) = fs::metadata(&self.path) else {
            // A missing file is a valid (empty) state with its own revision.
            return Some(0);
        };

        let mut hasher = DefaultHasher::new();
        meta.len().hash(&mut hasher);
        if let Ok(modified) = meta.modified() {
            modified.hash(&mut hasher);
        }
        Some(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_backend_starts_empty_and_replaces_values() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.load().unwrap(), None);

        backend.store("[1]").unwrap();
        backend.store("[1,2]").unwrap();
        assert_eq!(backend.load().unwrap().as_deref(), Some("[1,2]"));

        backend.clear().unwrap();
        assert_eq!(backend.load().unwrap(), None);
    }

    #[test]
    fn capacity_rejects_oversized_writes_and_keeps_previous_value() {
        let backend = InMemoryBackend::with_capacity(4);
        backend.store("[]").unwrap();

        let err = backend.store("[1,2,3]").unwrap_err();
        assert!(matches!(err, StorageError::CapacityExceeded { needed: 7, capacity: 4 }));
        assert_eq!(backend.load().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn in_memory_revision_moves_on_every_write() {
        let backend = InMemoryBackend::new();
        let r0 = backend.revision();
        backend.store("[]").unwrap();
        let r1 = backend.revision();
        backend.clear().unwrap();
        assert_ne!(r0, r1);
        assert_ne!(r1, backend.revision());
    }

    #[test]
    fn json_file_backend_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested").join("items.json"));

        assert_eq!(backend.load().unwrap(), None);
        backend.store("[]").unwrap();
        assert_eq!(backend.load().unwrap().as_deref(), Some("[]"));

        backend.clear().unwrap();
        assert_eq!(backend.load().unwrap(), None);
        // Clearing twice is fine.
        backend.clear().unwrap();
    }

    #[test]
    fn json_file_writes_leave_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("items.json"));
        let other = JsonFileBackend::new(backend.path());

        backend.store("[1]").unwrap();
        other.store("[1,2]").unwrap();
        backend.store("[1,2,3]").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("items.json")]);
        assert_eq!(other.load().unwrap().as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn json_file_revision_tracks_content_changes() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("items.json"));

        let empty = backend.revision();
        backend.store("[{\"a\":1}]").unwrap();
        let written = backend.revision();
        assert_ne!(empty, written);

        // A second handle on the same file observes the same revision.
        let other = JsonFileBackend::new(backend.path());
        assert_eq!(other.revision(), written);
    }
}
