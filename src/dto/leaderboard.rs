//! Leaderboard and statistics DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    dao::models::AccountStatsEntity,
    dto::common::PageInfo,
};

/// Query parameters for the global leaderboard.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Requested page size.
    pub page_size: Option<u32>,
    /// Re-derive totals from scored pick-sets and prefer them over the cache.
    pub verify: Option<bool>,
}

/// One row of the global leaderboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based rank across all pages.
    pub rank: u32,
    /// Ranked account.
    pub account_id: Uuid,
    /// Handle of the ranked account.
    pub handle: String,
    /// Points across all scored events.
    pub total_points: u32,
    /// Correct picks across all scored events, the tie-breaker.
    pub correct_picks: u32,
    /// Picks across all scored events.
    pub total_picks: u32,
    /// Overall accuracy percentage.
    pub accuracy: f64,
    /// Scored events entered.
    pub events_participated: u32,
    /// Highest single-event score.
    pub best_event_score: u32,
}

/// A page of the global leaderboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardPage {
    /// Ranked rows for this page.
    pub entries: Vec<LeaderboardEntry>,
    /// Pagination cursor.
    pub page: PageInfo,
}

/// One row of a per-event leaderboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventLeaderboardEntry {
    /// 1-based rank across all pages.
    pub rank: u32,
    /// Ranked account.
    pub account_id: Uuid,
    /// Handle of the ranked account.
    pub handle: String,
    /// Points earned at this event.
    pub points: u32,
    /// Correct picks at this event, the tie-breaker.
    pub correct_picks: u32,
    /// Picks made at this event.
    pub total_picks: u32,
    /// Accuracy percentage at this event.
    pub accuracy: f64,
}

/// A page of a per-event leaderboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventLeaderboardPage {
    /// The event being ranked.
    pub event_id: Uuid,
    /// Ranked rows for this page.
    pub entries: Vec<EventLeaderboardEntry>,
    /// Pagination cursor.
    pub page: PageInfo,
}

/// Aggregate rollup projection reused across responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsSummary {
    /// Picks across all scored sets.
    pub total_picks: u32,
    /// Correct picks across all scored sets.
    pub correct_picks: u32,
    /// Points across all scored sets.
    pub total_points: u32,
    /// Scored events entered.
    pub events_participated: u32,
    /// Highest single-event score.
    pub best_event_score: u32,
    /// Correct-pick streak counted from the most recent pick backwards.
    pub current_streak: u32,
    /// Longest correct-pick streak ever.
    pub longest_streak: u32,
    /// Overall accuracy percentage.
    pub avg_accuracy: f64,
}

impl From<AccountStatsEntity> for StatsSummary {
    fn from(stats: AccountStatsEntity) -> Self {
        Self {
            total_picks: stats.total_picks,
            correct_picks: stats.correct_picks,
            total_points: stats.total_points,
            events_participated: stats.events_participated,
            best_event_score: stats.best_event_score,
            current_streak: stats.current_streak,
            longest_streak: stats.longest_streak,
            avg_accuracy: stats.avg_accuracy,
        }
    }
}

/// The calling account's position in the global ranking.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountRankingResponse {
    /// The account being ranked.
    pub account_id: Uuid,
    /// Handle of the account.
    pub handle: String,
    /// 1-based rank, absent while the account has no scored picks.
    pub rank: Option<u32>,
    /// How many accounts are ranked in total.
    pub ranked_accounts: u32,
    /// The account's aggregate rollup.
    pub stats: StatsSummary,
}

/// Platform-wide counters for the public stats endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlatformStatsResponse {
    /// Registered accounts.
    pub total_accounts: u32,
    /// Accounts currently active.
    pub active_accounts: u32,
    /// Events ever created, soft-deleted ones excluded.
    pub total_events: u32,
    /// Events with at least one posted result.
    pub completed_events: u32,
    /// Pick-sets ever submitted.
    pub total_pick_sets: u32,
    /// Individual picks ever submitted.
    pub total_picks: u32,
    /// Points awarded across all scored pick-sets.
    pub total_points_awarded: u64,
}
