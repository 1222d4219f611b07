/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Score submission, leaderboards and player history.
pub mod ranking_service;
/// Ranking store connection supervisor with degraded-mode handling.
pub mod storage_supervisor;
