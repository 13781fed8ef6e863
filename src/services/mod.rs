//! Business logic invoked by the REST routes.

/// Account administration and role policy.
pub mod admin_service;
/// Registration, login, and profile management.
pub mod auth_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Event card management.
pub mod event_service;
/// Health check service.
pub mod health_service;
/// Leaderboard and statistics queries.
pub mod leaderboard_service;
/// Pick submission and retrieval.
pub mod pick_service;
/// Results posting and the scoring pass.
pub mod results_service;
/// Fixed-weight point rules.
pub mod scoring;
/// The idempotent aggregate recomputation routine.
pub mod stats_service;
/// Storage connection supervision and degraded mode.
pub mod storage_supervisor;
