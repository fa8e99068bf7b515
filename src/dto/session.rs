use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::GameSessionEntity;
use crate::dto::{format_system_time, validation::validate_session_id};

/// Payload opening a play session.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct StartSessionRequest {
    /// Opaque unique identifier; the server generates a UUID when omitted.
    #[serde(default)]
    #[validate(custom(function = "validate_session_id"))]
    pub session_id: Option<String>,
    /// At most 50 characters.
    #[serde(default)]
    #[validate(length(max = 50))]
    pub player_name: Option<String>,
}

/// Payload closing a play session.
#[serde_as]
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EndSessionRequest {
    /// Defaults to 0.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[schema(value_type = Option<i64>)]
    pub final_score: Option<i64>,
}

/// Stored play session as exposed over the API.
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GameSessionResponse {
    pub id: i64,
    pub session_id: String,
    pub player_name: Option<String>,
    /// RFC 3339 in UTC.
    pub started_at: String,
    /// RFC 3339 in UTC, `null` while the session is running.
    pub ended_at: Option<String>,
    pub final_score: i64,
}

impl From<GameSessionEntity> for GameSessionResponse {
    fn from(entity: GameSessionEntity) -> Self {
        Self {
            id: entity.id,
            session_id: entity.session_id,
            player_name: entity.player_name,
            started_at: format_system_time(entity.started_at),
            ended_at: entity.ended_at.map(format_system_time),
            final_score: entity.final_score,
        }
    }
}
