use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend failed or cannot be reached.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Rendered backend error.
        message: String,
        /// Backend error that caused the failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A session with the same `session_id` already exists.
    #[error("session `{session_id}` already exists")]
    DuplicateSession {
        /// Identifier given by the caller.
        session_id: String,
    },
    /// No session is stored under this `session_id`.
    #[error("session `{session_id}` not found")]
    SessionNotFound {
        /// Identifier given by the caller.
        session_id: String,
    },
    /// The session already recorded its end.
    #[error("session `{session_id}` has already ended")]
    SessionAlreadyEnded {
        /// Identifier given by the caller.
        session_id: String,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
