//! Leaderboard queries: global ranking, per-event ranking, personal rank,
//! and platform-wide counters.

use std::collections::HashMap;
use std::time::SystemTime;

use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::{AccountEntity, AccountStatsEntity, EventStatus},
    dto::{
        common::{PageQuery, paginate},
        leaderboard::{
            AccountRankingResponse, EventLeaderboardEntry, EventLeaderboardPage, LeaderboardEntry,
            LeaderboardPage, LeaderboardQuery, PlatformStatsResponse,
        },
    },
    error::ServiceError,
    services::stats_service,
    state::SharedState,
};

/// Rank all active accounts by total points, tie-broken by correct picks.
///
/// With `verify` set, each ranked account's rollup is rebuilt from its scored
/// pick-sets before ranking; a drifted cache is logged and the fresh value
/// wins. This is the read-time guard against stale aggregates.
pub async fn global_leaderboard(
    state: &SharedState,
    query: LeaderboardQuery,
) -> Result<LeaderboardPage, ServiceError> {
    let store = state.require_pick_store().await?;

    let handles: HashMap<Uuid, String> = store
        .list_accounts()
        .await?
        .into_iter()
        .filter(|account| account.is_active)
        .map(|account| (account.id, account.handle))
        .collect();

    let mut stats: Vec<AccountStatsEntity> = store
        .list_stats()
        .await?
        .into_iter()
        .filter(|stats| handles.contains_key(&stats.account_id))
        .collect();

    if query.verify.unwrap_or(false) {
        for cached in &mut stats {
            let fresh = stats_service::recompute_account_stats(state, cached.account_id).await?;
            if fresh.total_points != cached.total_points
                || fresh.correct_picks != cached.correct_picks
                || fresh.total_picks != cached.total_picks
            {
                warn!(
                    account_id = %cached.account_id,
                    cached_points = cached.total_points,
                    fresh_points = fresh.total_points,
                    "cached account stats drifted from scored pick-sets; using recomputed values"
                );
            }
            *cached = fresh;
        }
    }

    sort_for_ranking(&mut stats, &handles);

    let entries: Vec<LeaderboardEntry> = stats
        .into_iter()
        .enumerate()
        .map(|(index, stats)| LeaderboardEntry {
            rank: index as u32 + 1,
            handle: handles
                .get(&stats.account_id)
                .cloned()
                .unwrap_or_default(),
            account_id: stats.account_id,
            total_points: stats.total_points,
            correct_picks: stats.correct_picks,
            total_picks: stats.total_picks,
            accuracy: stats.avg_accuracy,
            events_participated: stats.events_participated,
            best_event_score: stats.best_event_score,
        })
        .collect();

    let page = query.page.unwrap_or(1);
    let page_size = state.config().clamp_page_size(query.page_size);
    let (entries, info) = paginate(entries, page, page_size);

    Ok(LeaderboardPage {
        entries,
        page: info,
    })
}

/// Rank the submitted and scored pick-sets of one event.
pub async fn event_leaderboard(
    state: &SharedState,
    event_id: Uuid,
    query: PageQuery,
) -> Result<EventLeaderboardPage, ServiceError> {
    let store = state.require_pick_store().await?;

    store
        .find_event(event_id)
        .await?
        .filter(|event| event.is_active)
        .ok_or_else(|| ServiceError::NotFound(format!("event `{event_id}` not found")))?;

    let handles: HashMap<Uuid, String> = store
        .list_accounts()
        .await?
        .into_iter()
        .filter(|account| account.is_active)
        .map(|account| (account.id, account.handle))
        .collect();

    let mut sets: Vec<_> = store
        .list_pick_sets_for_event(event_id)
        .await?
        .into_iter()
        .filter(|set| set.is_submitted && set.is_scored)
        .filter(|set| handles.contains_key(&set.account_id))
        .collect();

    sets.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then(b.correct_picks.cmp(&a.correct_picks))
            .then_with(|| handles[&a.account_id].cmp(&handles[&b.account_id]))
    });

    let entries: Vec<EventLeaderboardEntry> = sets
        .into_iter()
        .enumerate()
        .map(|(index, set)| EventLeaderboardEntry {
            rank: index as u32 + 1,
            handle: handles
                .get(&set.account_id)
                .cloned()
                .unwrap_or_default(),
            account_id: set.account_id,
            points: set.total_points,
            correct_picks: set.correct_picks,
            total_picks: set.total_picks,
            accuracy: set.accuracy,
        })
        .collect();

    let page = query.page.unwrap_or(1);
    let page_size = state.config().clamp_page_size(query.page_size);
    let (entries, info) = paginate(entries, page, page_size);

    Ok(EventLeaderboardPage {
        event_id,
        entries,
        page: info,
    })
}

/// The calling account's rank and rollup.
pub async fn my_ranking(
    state: &SharedState,
    account: &AccountEntity,
) -> Result<AccountRankingResponse, ServiceError> {
    let store = state.require_pick_store().await?;

    let handles: HashMap<Uuid, String> = store
        .list_accounts()
        .await?
        .into_iter()
        .filter(|account| account.is_active)
        .map(|account| (account.id, account.handle))
        .collect();

    let mut stats: Vec<AccountStatsEntity> = store
        .list_stats()
        .await?
        .into_iter()
        .filter(|stats| handles.contains_key(&stats.account_id))
        .collect();
    sort_for_ranking(&mut stats, &handles);

    let ranked_accounts = stats.len() as u32;
    let rank = stats
        .iter()
        .position(|stats| stats.account_id == account.id)
        // Accounts that never scored a pick sit outside the ranking.
        .filter(|_| has_scored_picks(&stats, account.id))
        .map(|index| index as u32 + 1);

    let own = store
        .find_stats(account.id)
        .await?
        .unwrap_or_else(|| AccountStatsEntity::empty(account.id, SystemTime::now()));

    Ok(AccountRankingResponse {
        account_id: account.id,
        handle: account.handle.clone(),
        rank,
        ranked_accounts,
        stats: own.into(),
    })
}

/// Aggregate platform counters for the public stats endpoint.
pub async fn platform_stats(state: &SharedState) -> Result<PlatformStatsResponse, ServiceError> {
    let store = state.require_pick_store().await?;

    let accounts = store.list_accounts().await?;
    let events = store.list_events(false).await?;
    let stats = store.list_stats().await?;

    let mut total_pick_sets = 0u32;
    let mut total_picks = 0u32;
    for event in &events {
        for set in store.list_pick_sets_for_event(event.id).await? {
            total_pick_sets += 1;
            total_picks += set.total_picks;
        }
    }

    Ok(PlatformStatsResponse {
        total_accounts: accounts.len() as u32,
        active_accounts: accounts.iter().filter(|a| a.is_active).count() as u32,
        total_events: events.len() as u32,
        completed_events: events
            .iter()
            .filter(|event| event.status == EventStatus::Completed)
            .count() as u32,
        total_pick_sets,
        total_picks,
        total_points_awarded: stats.iter().map(|s| u64::from(s.total_points)).sum(),
    })
}

fn sort_for_ranking(stats: &mut [AccountStatsEntity], handles: &HashMap<Uuid, String>) {
    stats.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then(b.correct_picks.cmp(&a.correct_picks))
            .then_with(|| handles[&a.account_id].cmp(&handles[&b.account_id]))
    });
}

fn has_scored_picks(stats: &[AccountStatsEntity], account_id: Uuid) -> bool {
    stats
        .iter()
        .find(|stats| stats.account_id == account_id)
        .is_some_and(|stats| stats.events_participated > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::models::AccountStatsEntity,
        services::pick_service::tests::seeded_account,
        state::test_state,
    };

    async fn seed_stats(
        state: &SharedState,
        handle: &str,
        total_points: u32,
        correct_picks: u32,
    ) -> AccountEntity {
        let account = seeded_account(state, handle).await;
        let store = state.require_pick_store().await.unwrap();
        let mut stats = AccountStatsEntity::empty(account.id, SystemTime::now());
        stats.total_points = total_points;
        stats.correct_picks = correct_picks;
        stats.total_picks = correct_picks.max(1) * 2;
        stats.events_participated = 1;
        store.save_stats(stats).await.unwrap();
        account
    }

    #[tokio::test]
    async fn ranking_breaks_point_ties_on_correct_picks() {
        let state = test_state().await;
        let first = seed_stats(&state, "account_one", 50, 10).await;
        let second = seed_stats(&state, "account_two", 30, 8).await;
        let third = seed_stats(&state, "account_three", 30, 9).await;

        let page = global_leaderboard(
            &state,
            LeaderboardQuery {
                page: Some(1),
                page_size: Some(2),
                verify: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[0].account_id, first.id);
        assert_eq!(page.entries[0].rank, 1);
        // 30 points with 9 correct beats 30 points with 8 correct.
        assert_eq!(page.entries[1].account_id, third.id);
        assert!(page.page.has_next);
        assert!(!page.page.has_prev);

        let page_two = global_leaderboard(
            &state,
            LeaderboardQuery {
                page: Some(2),
                page_size: Some(2),
                verify: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(page_two.entries.len(), 1);
        assert_eq!(page_two.entries[0].account_id, second.id);
        assert_eq!(page_two.entries[0].rank, 3);
        assert!(page_two.page.has_prev);
    }

    #[tokio::test]
    async fn inactive_accounts_are_excluded_from_ranking() {
        let state = test_state().await;
        seed_stats(&state, "account_one", 50, 10).await;
        let retired = seed_stats(&state, "account_two", 90, 20).await;

        let store = state.require_pick_store().await.unwrap();
        let mut account = store.find_account(retired.id).await.unwrap().unwrap();
        account.is_active = false;
        store.save_account(account).await.unwrap();

        let page = global_leaderboard(&state, LeaderboardQuery::default())
            .await
            .unwrap();
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].handle, "account_one");
    }

    #[tokio::test]
    async fn verify_mode_repairs_a_drifted_cache() {
        let state = test_state().await;
        // Stats claim 50 points but the account has no scored pick-sets at all.
        let account = seed_stats(&state, "account_one", 50, 10).await;

        let page = global_leaderboard(
            &state,
            LeaderboardQuery {
                page: None,
                page_size: None,
                verify: Some(true),
            },
        )
        .await
        .unwrap();

        assert_eq!(page.entries[0].total_points, 0);

        // The repair is persisted, not just reported.
        let store = state.require_pick_store().await.unwrap();
        let stats = store.find_stats(account.id).await.unwrap().unwrap();
        assert_eq!(stats.total_points, 0);
    }

    #[tokio::test]
    async fn unranked_account_has_no_rank_but_sees_totals() {
        let state = test_state().await;
        let account = seeded_account(&state, "fresh_face").await;

        let ranking = my_ranking(&state, &account).await.unwrap();
        assert_eq!(ranking.rank, None);
        assert_eq!(ranking.stats.total_points, 0);
    }
}
