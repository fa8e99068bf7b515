//! Score submission and ranked leaderboard queries.

use indexmap::IndexMap;
use tracing::info;

use crate::{
    dao::models::{DEFAULT_MODE, NewHighScore, clamp_player_name},
    dto::score::{
        HighScoreResponse, LeaderboardQuery, LeaderboardResponse, ScoresQuery, SubmitScoreRequest,
    },
    error::ServiceError,
    state::SharedState,
};

/// Modes shown on the leaderboard, in display order.
pub const RANKED_MODES: [&str; 2] = ["easy", "normal"];

/// Store a score as submitted. Values are trusted as-is; only the name is cut to fit.
pub async fn submit(
    state: &SharedState,
    request: SubmitScoreRequest,
) -> Result<HighScoreResponse, ServiceError> {
    let store = state.require_store().await?;

    let mut score = NewHighScore::from(request);
    score.player_name = clamp_player_name(score.player_name);
    let created_at = state.clock().now();

    let stored = store.insert_score(score, created_at).await?;
    info!(
        id = stored.id,
        mode = %stored.mode,
        score = stored.score,
        "score submitted"
    );
    Ok(stored.into())
}

/// Return the best scores of one mode, highest first.
pub async fn top_scores(
    state: &SharedState,
    query: ScoresQuery,
) -> Result<Vec<HighScoreResponse>, ServiceError> {
    let mode = query.mode.unwrap_or_else(|| DEFAULT_MODE.to_owned());
    let limit = query.limit.unwrap_or(state.config().scores_limit);

    let store = state.require_store().await?;
    let scores = store.top_scores(mode, limit).await?;
    Ok(scores.into_iter().map(Into::into).collect())
}

/// Return the best scores of every ranked mode.
pub async fn leaderboard(
    state: &SharedState,
    query: LeaderboardQuery,
) -> Result<LeaderboardResponse, ServiceError> {
    let limit = query.limit.unwrap_or(state.config().leaderboard_limit);
    let store = state.require_store().await?;

    let mut modes = IndexMap::with_capacity(RANKED_MODES.len());
    for mode in RANKED_MODES {
        let scores = store.top_scores(mode.to_owned(), limit).await?;
        modes.insert(
            mode.to_owned(),
            scores.into_iter().map(HighScoreResponse::from).collect(),
        );
    }
    Ok(LeaderboardResponse(modes))
}

#[cfg(test)]
mod tests {
    use std::{
        sync::Arc,
        time::{Duration, UNIX_EPOCH},
    };

    use super::*;
    use crate::{
        config::AppConfig,
        dao::store::MemoryStore,
        state::{AppState, ManualClock},
    };

    fn state() -> SharedState {
        let clock = ManualClock::new(UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        AppState::with_store(
            AppConfig::default(),
            Arc::new(clock),
            Arc::new(MemoryStore::new()),
        )
    }

    fn request(name: &str, score: i64, mode: &str) -> SubmitScoreRequest {
        SubmitScoreRequest {
            player_name: Some(name.into()),
            score: Some(score),
            mode: Some(mode.into()),
            ..SubmitScoreRequest::default()
        }
    }

    fn mode_query(mode: &str) -> ScoresQuery {
        ScoresQuery {
            mode: Some(mode.into()),
            limit: None,
        }
    }

    #[tokio::test]
    async fn empty_submission_is_stored_with_defaults() {
        let state = state();
        let stored = submit(&state, SubmitScoreRequest::default()).await.unwrap();

        assert_eq!(stored.id, 1);
        assert_eq!(stored.player_name, "Anonymous");
        assert_eq!(stored.score, 0);
        assert_eq!(stored.level, 1);
        assert_eq!(stored.kills, 0);
        assert_eq!(stored.time_played, 0);
        assert_eq!(stored.mode, "normal");
        assert_eq!(stored.created_at, "2023-11-14T22:13:20Z");
    }

    #[tokio::test]
    async fn submitted_easy_scores_rank_highest_first() {
        let state = state();
        submit(&state, request("Bo", 900, "easy")).await.unwrap();
        submit(&state, request("Ace", 1500, "easy")).await.unwrap();

        let top = top_scores(&state, mode_query("easy")).await.unwrap();
        let ranked: Vec<_> = top
            .iter()
            .map(|s| (s.player_name.as_str(), s.score))
            .collect();
        assert_eq!(ranked, [("Ace", 1500), ("Bo", 900)]);
    }

    #[tokio::test]
    async fn negative_scores_are_accepted() {
        let state = state();
        let stored = submit(&state, request("Neg", -40, "normal")).await.unwrap();
        assert_eq!(stored.score, -40);
    }

    #[tokio::test]
    async fn long_player_names_are_cut_to_fifty_chars() {
        let state = state();
        let stored = submit(&state, request(&"n".repeat(80), 1, "normal"))
            .await
            .unwrap();
        assert_eq!(stored.player_name.chars().count(), 50);
    }

    #[tokio::test]
    async fn default_query_ranks_normal_mode_and_caps_at_ten() {
        let state = state();
        for i in 0..15 {
            submit(&state, request(&format!("p{i}"), i * 10, "normal"))
                .await
                .unwrap();
        }
        submit(&state, request("easy", 10_000, "easy")).await.unwrap();

        let top = top_scores(&state, ScoresQuery::default()).await.unwrap();
        assert_eq!(top.len(), 10);
        assert!(top.iter().all(|s| s.mode == "normal"));
        assert!(top.windows(2).all(|pair| pair[0].score >= pair[1].score));
        assert_eq!(top[0].score, 140);
    }

    #[tokio::test]
    async fn unknown_modes_are_stored_and_queried_verbatim() {
        let state = state();
        submit(&state, request("Nm", 5, "nightmare")).await.unwrap();

        assert_eq!(top_scores(&state, mode_query("nightmare")).await.unwrap().len(), 1);
        assert!(top_scores(&state, mode_query("Nightmare")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn leaderboard_lists_easy_then_normal() {
        let state = state();
        submit(&state, request("N", 1, "normal")).await.unwrap();
        submit(&state, request("E", 2, "easy")).await.unwrap();

        let LeaderboardResponse(modes) = leaderboard(&state, LeaderboardQuery::default())
            .await
            .unwrap();
        let keys: Vec<_> = modes.keys().map(String::as_str).collect();
        assert_eq!(keys, RANKED_MODES);
        assert_eq!(modes["easy"][0].player_name, "E");
        assert_eq!(modes["normal"][0].player_name, "N");
    }

    #[tokio::test]
    async fn degraded_state_refuses_submissions() {
        let state = AppState::new(
            AppConfig::default(),
            Arc::new(ManualClock::new(UNIX_EPOCH)),
        );
        let err = submit(&state, SubmitScoreRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));
    }
}
