use mongodb::error::Error as MongoError;
use thiserror::Error;

/// Result alias for MongoDB backend operations.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures of the MongoDB backend; the `#[error]` messages describe each variant.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to allocate the next id for `{collection}`")]
    NextId {
        collection: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("counter document for `{collection}` is missing or malformed")]
    MalformedCounter { collection: &'static str },
    #[error("failed to save high score `{id}`")]
    SaveScore {
        id: i64,
        #[source]
        source: MongoError,
    },
    #[error("failed to list top scores for mode `{mode}`")]
    ListScores {
        mode: String,
        #[source]
        source: MongoError,
    },
    #[error("session `{session_id}` already exists")]
    DuplicateSession { session_id: String },
    #[error("session `{session_id}` not found")]
    SessionNotFound { session_id: String },
    #[error("session `{session_id}` has already ended")]
    SessionAlreadyEnded { session_id: String },
    #[error("failed to save session `{session_id}`")]
    SaveSession {
        session_id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to load session `{session_id}`")]
    LoadSession {
        session_id: String,
        #[source]
        source: MongoError,
    },
}
