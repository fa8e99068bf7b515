use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use axum_valid::Valid;

use super::json_or_default;
use crate::{
    dto::score::{
        HighScoreResponse, LeaderboardQuery, LeaderboardResponse, ScoresQuery, SubmitScoreRequest,
    },
    error::AppError,
    services::score_service,
    state::SharedState,
};

/// Score submission and leaderboard queries.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/scores", get(list_scores).post(submit_score))
        .route("/api/leaderboard", get(get_leaderboard))
}

#[utoipa::path(
    get,
    path = "/api/scores",
    tag = "scores",
    params(ScoresQuery),
    responses(
        (status = 200, description = "Best scores of the mode, highest first", body = [HighScoreResponse]),
        (status = 400, description = "Invalid limit")
    )
)]
/// Return the top scores of one mode (default "normal", 10 entries).
pub async fn list_scores(
    State(state): State<SharedState>,
    Valid(Query(query)): Valid<Query<ScoresQuery>>,
) -> Result<Json<Vec<HighScoreResponse>>, AppError> {
    let scores = score_service::top_scores(&state, query).await?;
    Ok(Json(scores))
}

#[utoipa::path(
    post,
    path = "/api/scores",
    tag = "scores",
    request_body = SubmitScoreRequest,
    responses(
        (status = 201, description = "Score stored", body = HighScoreResponse),
        (status = 400, description = "Body is not a score object")
    )
)]
/// Store a finished run. An empty body stores a default score.
pub async fn submit_score(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<(StatusCode, Json<HighScoreResponse>), AppError> {
    let request: SubmitScoreRequest = json_or_default(&body, "score")?;
    let stored = score_service::submit(&state, request).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    tag = "scores",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Best scores of every mode", body = LeaderboardResponse),
        (status = 400, description = "Invalid limit")
    )
)]
/// Return the top scores of both modes (20 entries each by default).
pub async fn get_leaderboard(
    State(state): State<SharedState>,
    Valid(Query(query)): Valid<Query<LeaderboardQuery>>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let leaderboard = score_service::leaderboard(&state, query).await?;
    Ok(Json(leaderboard))
}
