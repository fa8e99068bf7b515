use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use super::json_or_default;
use crate::{
    dto::session::{EndSessionRequest, GameSessionResponse, StartSessionRequest},
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Play session lifecycle routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/sessions", post(start_session))
        .route("/api/sessions/{session_id}", get(get_session))
        .route("/api/sessions/{session_id}/end", post(end_session))
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    tag = "sessions",
    request_body = StartSessionRequest,
    responses(
        (status = 201, description = "Session started", body = GameSessionResponse),
        (status = 400, description = "Invalid session id or player name"),
        (status = 409, description = "Session id already used")
    )
)]
/// Start a play session. An empty body starts an anonymous session with a generated id.
pub async fn start_session(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<(StatusCode, Json<GameSessionResponse>), AppError> {
    let payload: StartSessionRequest = json_or_default(&body, "session start")?;
    let session = session_service::start(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{session_id}/end",
    tag = "sessions",
    params(("session_id" = String, Path, description = "Identifier of the session to end")),
    request_body = EndSessionRequest,
    responses(
        (status = 200, description = "Session ended", body = GameSessionResponse),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session already ended")
    )
)]
/// Record the end of a play session and its final score (0 when the body is empty).
pub async fn end_session(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Result<Json<GameSessionResponse>, AppError> {
    let payload: EndSessionRequest = json_or_default(&body, "session end")?;
    let session = session_service::end(&state, session_id, payload).await?;
    Ok(Json(session))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{session_id}",
    tag = "sessions",
    params(("session_id" = String, Path, description = "Identifier of the session")),
    responses(
        (status = 200, description = "Stored session", body = GameSessionResponse),
        (status = 404, description = "Unknown session")
    )
)]
/// Fetch a play session.
pub async fn get_session(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<GameSessionResponse>, AppError> {
    let session = session_service::get(&state, session_id).await?;
    Ok(Json(session))
}
