use serde::Serialize;
use utoipa::ToSchema;

/// Coarse liveness of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// A storage backend is installed and answering.
    Ok,
    /// No usable storage backend; score and session routes answer 503.
    Degraded,
}

/// Payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Whether storage is available.
    pub status: HealthStatus,
}

impl HealthResponse {
    /// Build the payload from the degraded flag.
    pub fn new(degraded: bool) -> Self {
        let status = if degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Ok
        };
        Self { status }
    }
}
