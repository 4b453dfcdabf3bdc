//! Key-value store for session and cart state.
//!
//! [`Storage`] stores JSON-serializable values under string keys. It is backed
//! by a [`FileBackend`] when a writable path is available and degrades to a
//! [`MemoryBackend`] otherwise, transparently to callers.
//!
//! Backend failures never propagate: reads that fail or hit unparsable data
//! return `None`, failed writes are dropped, and both are logged.

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileBackend;
pub use memory::MemoryBackend;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

/// Well-known storage keys.
pub mod keys {
    /// Key for the logged-in user's session identity.
    pub const CURRENT_USER: &str = "currentUser";

    /// Key for the shopping cart.
    pub const CART: &str = "cart";

    /// Key written and removed when probing a backend.
    pub(crate) const PROBE: &str = "__test__";
}

/// Raw string storage used by [`Storage`].
pub trait StorageBackend: Send + Sync + fmt::Debug {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a raw value under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_raw(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn clear(&self) -> Result<(), StorageError>;

    /// Whether values outlive the process.
    fn is_persistent(&self) -> bool;
}

/// Shared handle to the key-value store.
///
/// Cloning is cheap; all clones see the same backend.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn StorageBackend>,
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("backend", &self.backend)
            .finish()
    }
}

impl Storage {
    /// Open the store at `path`, falling back to memory.
    ///
    /// The file backend is probed by writing and removing a test key. If
    /// there is no path, or the probe fails, a warning is logged and an
    /// in-memory store is returned instead.
    #[must_use]
    pub fn open(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            warn!("No storage path available. Using in-memory storage.");
            return Self::in_memory();
        };

        let backend = FileBackend::new(path);
        match probe(&backend) {
            Ok(()) => {
                debug!(path = %path.display(), "Using file storage");
                Self::with_backend(backend)
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "File storage is not available. Using in-memory storage."
                );
                Self::in_memory()
            }
        }
    }

    /// A non-persistent store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_backend(MemoryBackend::new())
    }

    /// A store over a custom backend.
    #[must_use]
    pub fn with_backend(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Whether values outlive the process.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.backend.is_persistent()
    }

    /// Read and deserialize the value under `key`.
    ///
    /// Returns `None` when the key is absent, the backend fails, or the
    /// stored value does not deserialize as `T`.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get_raw(key) {
            Ok(raw) => raw?,
            Err(e) => {
                error!(key, error = %e, "Error reading from storage");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Ignoring unparsable stored value");
                None
            }
        }
    }

    /// Serialize `value` and store it under `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                error!(key, error = %e, "Error serializing value for storage");
                return;
            }
        };

        if let Err(e) = self.backend.set_raw(key, raw) {
            error!(key, error = %e, "Error saving to storage");
        }
    }

    /// Remove the value under `key`. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            error!(key, error = %e, "Error removing from storage");
        }
    }

    /// Remove every key.
    pub fn clear(&self) {
        if let Err(e) = self.backend.clear() {
            error!(error = %e, "Error clearing storage");
        }
    }
}

fn probe(backend: &FileBackend) -> Result<(), StorageError> {
    backend.set_raw(keys::PROBE, "\"test\"".to_owned())?;
    backend.remove(keys::PROBE)
}
