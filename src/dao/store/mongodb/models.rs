use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::dao::models::{GameSessionEntity, HighScoreEntity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoScoreDocument {
    #[serde(rename = "_id")]
    id: i64,
    player_name: String,
    score: i64,
    level: i64,
    kills: i64,
    time_played: i64,
    mode: String,
    created_at: DateTime,
}

impl From<HighScoreEntity> for MongoScoreDocument {
    fn from(value: HighScoreEntity) -> Self {
        Self {
            id: value.id,
            player_name: value.player_name,
            score: value.score,
            level: value.level,
            kills: value.kills,
            time_played: value.time_played,
            mode: value.mode,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoScoreDocument> for HighScoreEntity {
    fn from(value: MongoScoreDocument) -> Self {
        Self {
            id: value.id,
            player_name: value.player_name,
            score: value.score,
            level: value.level,
            kills: value.kills,
            time_played: value.time_played,
            mode: value.mode,
            created_at: value.created_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSessionDocument {
    #[serde(rename = "_id")]
    id: i64,
    session_id: String,
    player_name: Option<String>,
    started_at: DateTime,
    // Serialized as an explicit null so `{ended_at: null}` filters match open sessions.
    ended_at: Option<DateTime>,
    #[serde(default)]
    final_score: i64,
}

impl From<GameSessionEntity> for MongoSessionDocument {
    fn from(value: GameSessionEntity) -> Self {
        Self {
            id: value.id,
            session_id: value.session_id,
            player_name: value.player_name,
            started_at: DateTime::from_system_time(value.started_at),
            ended_at: value.ended_at.map(DateTime::from_system_time),
            final_score: value.final_score,
        }
    }
}

impl From<MongoSessionDocument> for GameSessionEntity {
    fn from(value: MongoSessionDocument) -> Self {
        Self {
            id: value.id,
            session_id: value.session_id,
            player_name: value.player_name,
            started_at: value.started_at.to_system_time(),
            ended_at: value.ended_at.map(|at| at.to_system_time()),
            final_score: value.final_score,
        }
    }
}
