//! File-backed storage
//!
//! Keeps every key in one JSON object document. Writes go to a temporary
//! file in the same directory and are renamed over the document, so readers
//! see either the old or the new document, never a partial one.

use crate::error::StorageError;
use crate::storage::StorageBackend;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// JSON document store on the local filesystem
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Storage at `path`; the file is created on first write
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Backing document path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::io_error(&self.path, e)),
        };
        serde_json::from_str(&raw).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StorageError::io_error(dir, e))?;

        serde_json::to_writer_pretty(&mut tmp, document)
            .map_err(|e| StorageError::io_error(tmp.path(), e.into()))?;
        tmp.flush()
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StorageError::io_error(tmp.path(), e))?;

        tmp.persist(&self.path)
            .map_err(|e| StorageError::io_error(&self.path, e.error))?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document)?;
        tracing::debug!(path = %self.path.display(), key, bytes = value.len(), "storage document rewritten");
        Ok(())
    }
}
