use std::error::Error;
use thiserror::Error;

/// Result alias used by every record-store operation.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error surfaced by a record-store backend, whatever sits underneath it.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not serve the request.
    #[error("record store unavailable: {message}")]
    Unavailable {
        /// Human readable description of the failing operation.
        message: String,
        /// Underlying backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Wrap an arbitrary backend failure into [`StorageError::Unavailable`].
    pub fn unavailable(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        StorageError::Unavailable {
            message: message.into(),
            source: Box::new(source),
        }
    }
}
