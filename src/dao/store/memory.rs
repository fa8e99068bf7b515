//! Process-local backend used for development and tests. Data is lost on restart.

use std::{
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
    time::SystemTime,
};

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::dao::{
    models::{GameSessionEntity, HighScoreEntity, NewHighScore},
    storage::{StorageError, StorageResult},
    store::{ScoreStore, SessionStore, Store},
};

/// In-memory [`Store`] implementation.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    scores: RwLock<ScoreTable>,
    sessions: DashMap<String, GameSessionEntity>,
    last_session_id: AtomicI64,
}

#[derive(Default)]
struct ScoreTable {
    rows: Vec<HighScoreEntity>,
    last_id: i64,
}

impl MemoryStore {
    /// Empty store; ids start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    async fn insert_score(&self, score: NewHighScore, created_at: SystemTime) -> HighScoreEntity {
        let mut table = self.inner.scores.write().await;
        table.last_id += 1;
        let entity = score.into_entity(table.last_id, created_at);
        table.rows.push(entity.clone());
        entity
    }

    async fn top_scores(&self, mode: &str, limit: usize) -> Vec<HighScoreEntity> {
        let table = self.inner.scores.read().await;
        let mut matching: Vec<HighScoreEntity> = table
            .rows
            .iter()
            .filter(|row| row.mode == mode)
            .cloned()
            .collect();
        // Stable sort: rows are kept in insertion order, so ties stay ordered by id.
        matching.sort_by(|a, b| b.score.cmp(&a.score));
        matching.truncate(limit);
        matching
    }

    fn insert_session(
        &self,
        session_id: String,
        player_name: Option<String>,
        started_at: SystemTime,
    ) -> StorageResult<GameSessionEntity> {
        match self.inner.sessions.entry(session_id) {
            Entry::Occupied(entry) => Err(StorageError::DuplicateSession {
                session_id: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                let id = self.inner.last_session_id.fetch_add(1, Ordering::SeqCst) + 1;
                let session = GameSessionEntity {
                    id,
                    session_id: entry.key().clone(),
                    player_name,
                    started_at,
                    ended_at: None,
                    final_score: 0,
                };
                entry.insert(session.clone());
                Ok(session)
            }
        }
    }

    fn end_session(
        &self,
        session_id: String,
        final_score: i64,
        ended_at: SystemTime,
    ) -> StorageResult<GameSessionEntity> {
        // The shard stays write-locked while the guard lives, so check and update are atomic.
        let Some(mut session) = self.inner.sessions.get_mut(&session_id) else {
            return Err(StorageError::SessionNotFound { session_id });
        };
        if session.is_ended() {
            return Err(StorageError::SessionAlreadyEnded { session_id });
        }
        session.ended_at = Some(ended_at);
        session.final_score = final_score;
        Ok(session.clone())
    }
}

impl ScoreStore for MemoryStore {
    fn insert_score(
        &self,
        score: NewHighScore,
        created_at: SystemTime,
    ) -> BoxFuture<'static, StorageResult<HighScoreEntity>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.insert_score(score, created_at).await) })
    }

    fn top_scores(
        &self,
        mode: String,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<HighScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.top_scores(&mode, limit).await) })
    }
}

impl SessionStore for MemoryStore {
    fn insert_session(
        &self,
        session_id: String,
        player_name: Option<String>,
        started_at: SystemTime,
    ) -> BoxFuture<'static, StorageResult<GameSessionEntity>> {
        let result = self.insert_session(session_id, player_name, started_at);
        Box::pin(async move { result })
    }

    fn end_session(
        &self,
        session_id: String,
        final_score: i64,
        ended_at: SystemTime,
    ) -> BoxFuture<'static, StorageResult<GameSessionEntity>> {
        let result = self.end_session(session_id, final_score, ended_at);
        Box::pin(async move { result })
    }

    fn find_session(
        &self,
        session_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>> {
        let found = self
            .inner
            .sessions
            .get(&session_id)
            .map(|session| session.clone());
        Box::pin(async move { Ok(found) })
    }
}

impl Store for MemoryStore {
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
