use axum::Router;
use serde::de::DeserializeOwned;

use crate::{error::AppError, state::SharedState};

/// Swagger UI.
pub mod docs;
/// Liveness probe.
pub mod health;
/// `/api/scores` and `/api/leaderboard`.
pub mod scores;
/// `/api/sessions`.
pub mod sessions;

/// Compose all route trees and attach the shared state.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(scores::router())
        .merge(sessions::router())
        .merge(docs::router())
        .with_state(state)
}

/// Decode an optional JSON body: a blank body yields `T::default()`.
pub(crate) fn json_or_default<T>(body: &[u8], what: &str) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| AppError::BadRequest(format!("invalid {what} payload: {err}")))
}
