//! Storage traits and their backends.

pub mod memory;
/// MongoDB backend.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use std::time::SystemTime;

use futures::future::BoxFuture;

use crate::dao::models::{GameSessionEntity, HighScoreEntity, NewHighScore};
use crate::dao::storage::StorageResult;

pub use memory::MemoryStore;

/// Append-only persistence for high scores.
pub trait ScoreStore: Send + Sync {
    /// Persist a submission, assigning it a fresh id and `created_at`.
    fn insert_score(
        &self,
        score: NewHighScore,
        created_at: SystemTime,
    ) -> BoxFuture<'static, StorageResult<HighScoreEntity>>;

    /// Return at most `limit` scores whose mode equals `mode`, best first.
    ///
    /// Equal scores keep insertion order.
    fn top_scores(
        &self,
        mode: String,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<HighScoreEntity>>>;
}

/// Persistence for play sessions keyed by their `session_id`.
pub trait SessionStore: Send + Sync {
    /// Create a session; fails with `DuplicateSession` if `session_id` is taken.
    fn insert_session(
        &self,
        session_id: String,
        player_name: Option<String>,
        started_at: SystemTime,
    ) -> BoxFuture<'static, StorageResult<GameSessionEntity>>;

    /// Record the end of a session in a single conditional write.
    fn end_session(
        &self,
        session_id: String,
        final_score: i64,
        ended_at: SystemTime,
    ) -> BoxFuture<'static, StorageResult<GameSessionEntity>>;

    /// Look a session up; `None` when it was never started.
    fn find_session(
        &self,
        session_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>>;
}

/// A storage backend holding both record collections.
pub trait Store: ScoreStore + SessionStore {
    /// Cheap round trip proving the backend still answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Rebuild the underlying connection in place after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
