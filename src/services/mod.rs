/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Score submission and leaderboard queries.
pub mod score_service;
/// Play session lifecycle.
pub mod session_service;
/// Background task keeping a storage backend installed.
pub mod storage_supervisor;
