//! Persistent storage backend backed by a JSON document on disk.
//!
//! The document is a single JSON object mapping each key to the JSON text of
//! its value. Every operation re-reads the file, so a value written by one
//! handle (or by an earlier run) is what the next read sees. Writes go to a
//! sibling temp file that is then renamed over the document.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use super::{StorageBackend, StorageError};

type Document = BTreeMap<String, String>;

/// Key-value store persisted to a JSON file.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Create a backend for `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. An unparsable document reads as empty, so the
    /// next write replaces it.
    fn read_document(&self) -> Result<Document, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Document::new());
        }

        Ok(serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(
                path = %self.path.display(),
                error = %e,
                "Discarding unparsable storage document"
            );
            Document::new()
        }))
    }

    fn write_document(&self, document: &Document) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(document)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Document)) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut document = self.read_document()?;
        apply(&mut document);
        self.write_document(&document)
    }
}

impl StorageBackend for FileBackend {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_document()?.remove(key))
    }

    fn set_raw(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.update(|document| {
            document.insert(key.to_owned(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|document| {
            document.remove(key);
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.write_document(&Document::new())
    }

    fn is_persistent(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        FileBackend::new(&path)
            .set_raw("currentUser", r#"{"id":1}"#.to_string())
            .unwrap();

        let reopened = FileBackend::new(&path);
        assert_eq!(
            reopened.get_raw("currentUser").unwrap().as_deref(),
            Some(r#"{"id":1}"#)
        );
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("absent.json"));
        assert_eq!(backend.get_raw("cart").unwrap(), None);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("store.json");
        let backend = FileBackend::new(&path);
        backend.set_raw("cart", "[]".to_string()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("store.json"));
        backend.set_raw("a", "1".to_string()).unwrap();
        backend.set_raw("b", "2".to_string()).unwrap();

        backend.remove("a").unwrap();
        assert_eq!(backend.get_raw("a").unwrap(), None);
        assert_eq!(backend.get_raw("b").unwrap().as_deref(), Some("2"));

        backend.clear().unwrap();
        assert_eq!(backend.get_raw("b").unwrap(), None);
    }

    #[test]
    fn test_truncated_document_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"cart": "#).unwrap();

        let backend = FileBackend::new(&path);
        assert_eq!(backend.get_raw("cart").unwrap(), None);

        backend.set_raw("cart", "[]".to_string()).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let document: Document = serde_json::from_str(&contents).unwrap();
        assert_eq!(document.get("cart").map(String::as_str), Some("[]"));
    }
}
