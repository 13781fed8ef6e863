use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    auth::CurrentAccount,
    dto::{
        common::PageQuery,
        leaderboard::{
            AccountRankingResponse, EventLeaderboardPage, LeaderboardPage, LeaderboardQuery,
            PlatformStatsResponse,
        },
    },
    error::AppError,
    services::leaderboard_service,
    state::SharedState,
};

/// Leaderboard and statistics endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/leaderboard", get(global_leaderboard))
        .route("/leaderboard/me", get(my_ranking))
        .route("/events/{id}/leaderboard", get(event_leaderboard))
        .route("/stats", get(platform_stats))
}

#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "leaderboard",
    params(LeaderboardQuery),
    responses((status = 200, description = "Global ranking page", body = LeaderboardPage))
)]
/// Rank all active accounts by total points, tie-broken by correct picks.
pub async fn global_leaderboard(
    State(state): State<SharedState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardPage>, AppError> {
    Ok(Json(
        leaderboard_service::global_leaderboard(&state, query).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/events/{id}/leaderboard",
    tag = "leaderboard",
    params(
        ("id" = Uuid, Path, description = "Identifier of the event"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Per-event ranking page", body = EventLeaderboardPage),
        (status = 404, description = "Event not found")
    )
)]
/// Rank the scored pick-sets of one event.
pub async fn event_leaderboard(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<EventLeaderboardPage>, AppError> {
    Ok(Json(
        leaderboard_service::event_leaderboard(&state, id, query).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/leaderboard/me",
    tag = "leaderboard",
    params(("Authorization" = String, Header, description = "Bearer token")),
    responses((status = 200, description = "The caller's rank and totals", body = AccountRankingResponse))
)]
/// Return the caller's global rank and aggregate rollup.
pub async fn my_ranking(
    State(state): State<SharedState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<AccountRankingResponse>, AppError> {
    Ok(Json(
        leaderboard_service::my_ranking(&state, &account).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/stats",
    tag = "leaderboard",
    responses((status = 200, description = "Platform-wide counters", body = PlatformStatsResponse))
)]
/// Aggregate platform statistics.
pub async fn platform_stats(
    State(state): State<SharedState>,
) -> Result<Json<PlatformStatsResponse>, AppError> {
    Ok(Json(leaderboard_service::platform_stats(&state).await?))
}
