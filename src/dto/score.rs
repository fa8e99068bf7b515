use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::dao::models::{HighScoreEntity, NewHighScore};
use crate::dto::format_system_time;

/// Largest `limit` accepted on score and leaderboard queries.
pub const MAX_QUERY_LIMIT: usize = 100;

/// Score submission sent by the game once a run is over.
///
/// Every field is optional; missing or `null` values take the column default.
/// Integer fields also accept numeric strings such as `"1500"`.
#[serde_as]
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubmitScoreRequest {
    /// Defaults to "Anonymous"; cut to 50 characters.
    #[serde(default)]
    pub player_name: Option<String>,
    /// Defaults to 0; negative values are stored as-is.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[schema(value_type = Option<i64>)]
    pub score: Option<i64>,
    /// Defaults to 1.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[schema(value_type = Option<i64>)]
    pub level: Option<i64>,
    /// Defaults to 0.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[schema(value_type = Option<i64>)]
    pub kills: Option<i64>,
    /// Seconds spent in the run.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[schema(value_type = Option<i64>)]
    pub time_played: Option<i64>,
    /// Leaderboard bucket, "easy" or "normal" (defaults to "normal").
    #[serde(default)]
    pub mode: Option<String>,
}

impl From<SubmitScoreRequest> for NewHighScore {
    fn from(value: SubmitScoreRequest) -> Self {
        let defaults = NewHighScore::default();
        Self {
            player_name: value.player_name.unwrap_or(defaults.player_name),
            score: value.score.unwrap_or(defaults.score),
            level: value.level.unwrap_or(defaults.level),
            kills: value.kills.unwrap_or(defaults.kills),
            time_played: value.time_played.unwrap_or(defaults.time_played),
            mode: value.mode.unwrap_or(defaults.mode),
        }
    }
}

/// Query string of `GET /api/scores`.
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ScoresQuery {
    /// Leaderboard bucket to rank; defaults to "normal". Matched verbatim.
    pub mode: Option<String>,
    /// Maximum number of scores to return; defaults to 10.
    #[validate(range(min = 1, max = MAX_QUERY_LIMIT))]
    pub limit: Option<usize>,
}

/// Query string of `GET /api/leaderboard`.
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    /// Maximum number of scores per mode; defaults to 20.
    #[validate(range(min = 1, max = MAX_QUERY_LIMIT))]
    pub limit: Option<usize>,
}

/// Stored high score as exposed over the API. Fields mirror the submission after defaults.
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct HighScoreResponse {
    pub id: i64,
    pub player_name: String,
    pub score: i64,
    pub level: i64,
    pub kills: i64,
    pub time_played: i64,
    pub mode: String,
    /// Creation time, RFC 3339 in UTC.
    pub created_at: String,
}

impl From<HighScoreEntity> for HighScoreResponse {
    fn from(entity: HighScoreEntity) -> Self {
        Self {
            id: entity.id,
            player_name: entity.player_name,
            score: entity.score,
            level: entity.level,
            kills: entity.kills,
            time_played: entity.time_played,
            mode: entity.mode,
            created_at: format_system_time(entity.created_at),
        }
    }
}

/// Top scores of every ranked mode, keyed by mode in display order.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse(pub IndexMap<String, Vec<HighScoreResponse>>);
