//! Lifecycle of play sessions: start, end once, look up.

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::session::{EndSessionRequest, GameSessionResponse, StartSessionRequest},
    error::ServiceError,
    state::SharedState,
};

/// Open a session; a missing `session_id` is replaced by a fresh UUID.
pub async fn start(
    state: &SharedState,
    request: StartSessionRequest,
) -> Result<GameSessionResponse, ServiceError> {
    request.validate()?;

    let StartSessionRequest {
        session_id,
        player_name,
    } = request;
    let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());

    let store = state.require_store().await?;
    let session = store
        .insert_session(session_id, player_name, state.clock().now())
        .await?;
    info!(session_id = %session.session_id, "session started");
    Ok(session.into())
}

/// Record the end of a session. A session can only be ended once.
pub async fn end(
    state: &SharedState,
    session_id: String,
    request: EndSessionRequest,
) -> Result<GameSessionResponse, ServiceError> {
    let final_score = request.final_score.unwrap_or(0);

    let store = state.require_store().await?;
    let session = store
        .end_session(session_id, final_score, state.clock().now())
        .await?;
    info!(
        session_id = %session.session_id,
        final_score = session.final_score,
        "session ended"
    );
    Ok(session.into())
}

/// Look up a session by its identifier.
pub async fn get(
    state: &SharedState,
    session_id: String,
) -> Result<GameSessionResponse, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_session(session_id.clone())
        .await?
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound(format!("session `{session_id}` not found")))
}
