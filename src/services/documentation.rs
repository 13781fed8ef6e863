//! OpenAPI document assembly.

use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Cageside Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::auth::update_me,
        crate::routes::events::list_events,
        crate::routes::events::get_event,
        crate::routes::picks::submit_picks,
        crate::routes::picks::my_picks,
        crate::routes::picks::my_picks_for_event,
        crate::routes::picks::event_picks,
        crate::routes::leaderboard::global_leaderboard,
        crate::routes::leaderboard::event_leaderboard,
        crate::routes::leaderboard::my_ranking,
        crate::routes::leaderboard::platform_stats,
        crate::routes::admin::list_all_events,
        crate::routes::admin::create_event,
        crate::routes::admin::update_event,
        crate::routes::admin::soft_delete_event,
        crate::routes::admin::purge_event,
        crate::routes::admin::post_results,
        crate::routes::admin::list_accounts,
        crate::routes::admin::update_role,
        crate::routes::admin::update_status,
        crate::routes::admin::recompute_stats,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::auth::RegisterRequest,
            crate::dto::auth::LoginRequest,
            crate::dto::auth::UpdateProfileRequest,
            crate::dto::auth::AccountResponse,
            crate::dto::auth::TokenResponse,
            crate::dto::common::PageInfo,
            crate::dto::event::FighterInput,
            crate::dto::event::FightInput,
            crate::dto::event::CreateEventRequest,
            crate::dto::event::UpdateEventRequest,
            crate::dto::event::FightResultInput,
            crate::dto::event::ResultsRequest,
            crate::dto::event::ResultsResponse,
            crate::dto::event::FighterSummary,
            crate::dto::event::OutcomeSummary,
            crate::dto::event::FightSummary,
            crate::dto::event::EventSummary,
            crate::dto::event::EventListItem,
            crate::dto::pick::PickInput,
            crate::dto::pick::SubmitPicksRequest,
            crate::dto::pick::PickDetailSummary,
            crate::dto::pick::PickSetSummary,
            crate::dto::leaderboard::LeaderboardEntry,
            crate::dto::leaderboard::LeaderboardPage,
            crate::dto::leaderboard::EventLeaderboardEntry,
            crate::dto::leaderboard::EventLeaderboardPage,
            crate::dto::leaderboard::StatsSummary,
            crate::dto::leaderboard::AccountRankingResponse,
            crate::dto::leaderboard::PlatformStatsResponse,
            crate::dto::admin::AccountPage,
            crate::dto::admin::UpdateRoleRequest,
            crate::dto::admin::UpdateStatusRequest,
            crate::dto::admin::PurgeResponse,
            crate::dto::admin::RecomputeStatsResponse,
            crate::dao::models::EventStatus,
            crate::dao::models::FightWinner,
            crate::dao::models::FightMethod,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login, and profile management"),
        (name = "events", description = "Public event cards"),
        (name = "picks", description = "Pick submission and retrieval"),
        (name = "leaderboard", description = "Rankings and statistics"),
        (name = "admin", description = "Administrative management endpoints"),
    )
)]
pub struct ApiDoc;
