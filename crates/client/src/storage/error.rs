//! Storage error types.

use thiserror::Error;

/// Errors raised by a storage backend.
///
/// These never reach callers of [`super::Storage`]; they are logged there and
/// absorbed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be encoded.
    #[error("storage document could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}
