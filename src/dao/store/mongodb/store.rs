use std::{sync::Arc, time::SystemTime};

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::{DateTime, Document, doc},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::ReturnDocument,
};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{
    config::MongoConfig,
    connection::{
        COUNTER_COLLECTION_NAME, SCORE_COLLECTION_NAME, SESSION_COLLECTION_NAME,
        establish_connection, ensure_indexes,
    },
    error::{MongoDaoError, MongoResult},
    models::{MongoScoreDocument, MongoSessionDocument},
};
use crate::dao::{
    models::{GameSessionEntity, HighScoreEntity, NewHighScore},
    storage::StorageResult,
    store::{ScoreStore, SessionStore, Store},
};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB-backed [`Store`] implementation.
#[derive(Clone)]
pub struct MongoStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    // Held so the connection pool lives as long as the database handle.
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        info!("MongoDB connection re-established");
        Ok(())
    }
}

impl MongoStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        ensure_indexes(&store.database().await).await?;
        Ok(store)
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn score_collection(&self) -> Collection<MongoScoreDocument> {
        self.database()
            .await
            .collection::<MongoScoreDocument>(SCORE_COLLECTION_NAME)
    }

    async fn session_collection(&self) -> Collection<MongoSessionDocument> {
        self.database()
            .await
            .collection::<MongoSessionDocument>(SESSION_COLLECTION_NAME)
    }

    /// Atomically bump the sequence kept for `collection` and return the new value.
    async fn next_id(&self, collection: &'static str) -> MongoResult<i64> {
        let counters = self
            .database()
            .await
            .collection::<Document>(COUNTER_COLLECTION_NAME);

        let counter = counters
            .find_one_and_update(doc! {"_id": collection}, doc! {"$inc": {"seq": 1_i64}})
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::NextId { collection, source })?;

        counter
            .and_then(|document| document.get_i64("seq").ok())
            .ok_or(MongoDaoError::MalformedCounter { collection })
    }

    async fn insert_score(
        &self,
        score: NewHighScore,
        created_at: SystemTime,
    ) -> MongoResult<HighScoreEntity> {
        let id = self.next_id(SCORE_COLLECTION_NAME).await?;
        let document = MongoScoreDocument::from(score.into_entity(id, created_at));

        self.score_collection()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveScore { id, source })?;

        // Echo what was persisted: BSON dates keep milliseconds only.
        let entity = HighScoreEntity::from(document);
        debug!(id, mode = %entity.mode, score = entity.score, "high score stored");
        Ok(entity)
    }

    async fn top_scores(&self, mode: String, limit: usize) -> MongoResult<Vec<HighScoreEntity>> {
        // A zero limit means "unbounded" to MongoDB.
        if limit == 0 {
            return Ok(Vec::new());
        }

        let documents: Vec<MongoScoreDocument> = self
            .score_collection()
            .await
            .find(doc! {"mode": mode.as_str()})
            .sort(doc! {"score": -1, "_id": 1})
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await
            .map_err(|source| MongoDaoError::ListScores {
                mode: mode.clone(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListScores {
                mode: mode.clone(),
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn insert_session(
        &self,
        session_id: String,
        player_name: Option<String>,
        started_at: SystemTime,
    ) -> MongoResult<GameSessionEntity> {
        let id = self.next_id(SESSION_COLLECTION_NAME).await?;
        let document = MongoSessionDocument::from(GameSessionEntity {
            id,
            session_id: session_id.clone(),
            player_name,
            started_at,
            ended_at: None,
            final_score: 0,
        });

        match self.session_collection().await.insert_one(&document).await {
            Ok(_) => Ok(document.into()),
            Err(source) if is_duplicate_key(&source) => {
                Err(MongoDaoError::DuplicateSession { session_id })
            }
            Err(source) => Err(MongoDaoError::SaveSession { session_id, source }),
        }
    }

    async fn end_session(
        &self,
        session_id: String,
        final_score: i64,
        ended_at: SystemTime,
    ) -> MongoResult<GameSessionEntity> {
        // Only an open session matches, so two racing ends cannot both win.
        let updated = self
            .session_collection()
            .await
            .find_one_and_update(
                doc! {"session_id": session_id.as_str(), "ended_at": null},
                doc! {"$set": {
                    "ended_at": DateTime::from_system_time(ended_at),
                    "final_score": final_score,
                }},
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::SaveSession {
                session_id: session_id.clone(),
                source,
            })?;

        if let Some(document) = updated {
            return Ok(document.into());
        }

        match self.find_session(session_id.clone()).await? {
            Some(_) => Err(MongoDaoError::SessionAlreadyEnded { session_id }),
            None => Err(MongoDaoError::SessionNotFound { session_id }),
        }
    }

    async fn find_session(&self, session_id: String) -> MongoResult<Option<GameSessionEntity>> {
        let document = self
            .session_collection()
            .await
            .find_one(doc! {"session_id": session_id.as_str()})
            .await
            .map_err(|source| MongoDaoError::LoadSession { session_id, source })?;

        Ok(document.map(Into::into))
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

impl ScoreStore for MongoStore {
    fn insert_score(
        &self,
        score: NewHighScore,
        created_at: SystemTime,
    ) -> BoxFuture<'static, StorageResult<HighScoreEntity>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .insert_score(score, created_at)
                .await
                .map_err(Into::into)
        })
    }

    fn top_scores(
        &self,
        mode: String,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<HighScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.top_scores(mode, limit).await.map_err(Into::into) })
    }
}

impl SessionStore for MongoStore {
    fn insert_session(
        &self,
        session_id: String,
        player_name: Option<String>,
        started_at: SystemTime,
    ) -> BoxFuture<'static, StorageResult<GameSessionEntity>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .insert_session(session_id, player_name, started_at)
                .await
                .map_err(Into::into)
        })
    }

    fn end_session(
        &self,
        session_id: String,
        final_score: i64,
        ended_at: SystemTime,
    ) -> BoxFuture<'static, StorageResult<GameSessionEntity>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .end_session(session_id, final_score, ended_at)
                .await
                .map_err(Into::into)
        })
    }

    fn find_session(
        &self,
        session_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_session(session_id).await.map_err(Into::into) })
    }
}

impl Store for MongoStore {
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}

#[cfg(test)]
mod tests {
    use mongodb::error::WriteError;

    use super::*;

    fn write_error(code: i32) -> MongoError {
        let write_error: WriteError = serde_json::from_value(serde_json::json!({
            "code": code,
            "errmsg": "E11000 duplicate key error collection: duum.game_sessions",
        }))
        .unwrap();
        MongoError::from(ErrorKind::Write(WriteFailure::WriteError(write_error)))
    }

    #[test]
    fn duplicate_key_write_error_is_detected() {
        assert!(is_duplicate_key(&write_error(DUPLICATE_KEY_CODE)));
    }

    #[test]
    fn other_write_errors_are_not_duplicates() {
        assert!(!is_duplicate_key(&write_error(121)));
    }
}
