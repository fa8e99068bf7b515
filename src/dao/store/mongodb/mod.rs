mod config;
mod connection;
mod error;
mod models;
mod store;

pub use config::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::DuplicateSession { session_id } => {
                StorageError::DuplicateSession { session_id }
            }
            MongoDaoError::SessionNotFound { session_id } => {
                StorageError::SessionNotFound { session_id }
            }
            MongoDaoError::SessionAlreadyEnded { session_id } => {
                StorageError::SessionAlreadyEnded { session_id }
            }
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_keep_their_meaning() {
        let ended: StorageError = MongoDaoError::SessionAlreadyEnded {
            session_id: "a".into(),
        }
        .into();
        assert!(matches!(ended, StorageError::SessionAlreadyEnded { ref session_id } if session_id == "a"));

        let missing: StorageError = MongoDaoError::SessionNotFound {
            session_id: "b".into(),
        }
        .into();
        assert!(matches!(missing, StorageError::SessionNotFound { .. }));

        let duplicate: StorageError = MongoDaoError::DuplicateSession {
            session_id: "c".into(),
        }
        .into();
        assert!(matches!(duplicate, StorageError::DuplicateSession { .. }));
    }

    #[test]
    fn backend_failures_become_unavailable() {
        let err: StorageError = MongoDaoError::MalformedCounter {
            collection: "high_scores",
        }
        .into();
        match err {
            StorageError::Unavailable { message, .. } => {
                assert!(message.contains("high_scores"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
