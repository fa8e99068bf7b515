use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the score backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::scores::list_scores,
        crate::routes::scores::submit_score,
        crate::routes::scores::get_leaderboard,
        crate::routes::sessions::start_session,
        crate::routes::sessions::end_session,
        crate::routes::sessions::get_session,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::score::SubmitScoreRequest,
            crate::dto::score::HighScoreResponse,
            crate::dto::score::LeaderboardResponse,
            crate::dto::session::StartSessionRequest,
            crate::dto::session::EndSessionRequest,
            crate::dto::session::GameSessionResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "scores", description = "High-score submission and leaderboards"),
        (name = "sessions", description = "Play session tracking"),
    )
)]
/// OpenAPI document of every route.
pub struct ApiDoc;
