use std::error::Error;
use thiserror::Error;

/// Result alias for ranking store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Backend-agnostic failure of a ranking store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or rejected the request.
    #[error("{backend} unavailable: {source}")]
    Unavailable {
        backend: &'static str,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A stored row could not be mapped back onto a ranking record.
    #[error("invalid ranking record: {message}")]
    InvalidRecord { message: String },
    /// The selected backend was left out of this build.
    #[error("storage backend `{backend}` is not compiled in")]
    Unsupported { backend: &'static str },
}

impl StorageError {
    pub fn unavailable(backend: &'static str, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            backend,
            source: Box::new(source),
        }
    }

    /// Construct an error for a row that breaks the ranking record invariants.
    pub fn invalid_record(message: impl Into<String>) -> Self {
        StorageError::InvalidRecord {
            message: message.into(),
        }
    }
}
