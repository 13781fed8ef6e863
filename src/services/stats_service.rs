//! The single idempotent aggregation routine behind every account rollup.
//!
//! AccountStats rows are never incremented in place. Any caller that changed
//! scoring state asks this module to rebuild the affected account's rollup
//! from the full set of its scored pick-sets, which removes the
//! double-counting hazard of additive updates by construction.

use std::time::SystemTime;

use tracing::debug;
use uuid::Uuid;

use crate::{
    dao::models::{AccountStatsEntity, PickSetEntity, accuracy_percent},
    error::ServiceError,
    state::SharedState,
};

/// Rebuild one account's rollup from scratch and persist it.
pub async fn recompute_account_stats(
    state: &SharedState,
    account_id: Uuid,
) -> Result<AccountStatsEntity, ServiceError> {
    let store = state.require_pick_store().await?;

    let mut scored: Vec<(SystemTime, PickSetEntity)> = Vec::new();
    for pick_set in store.list_pick_sets_for_account(account_id).await? {
        if !pick_set.is_scored {
            continue;
        }
        // Streaks follow the chronology of the cards, not submission order.
        let event_date = store
            .find_event(pick_set.event_id)
            .await?
            .map(|event| event.event_date)
            .unwrap_or(pick_set.created_at);
        scored.push((event_date, pick_set));
    }
    scored.sort_by(|a, b| a.0.cmp(&b.0));

    let stats = fold_stats(
        account_id,
        scored.iter().map(|(_, pick_set)| pick_set),
        SystemTime::now(),
    );

    store.save_stats(stats.clone()).await?;
    debug!(
        account_id = %account_id,
        total_points = stats.total_points,
        events = stats.events_participated,
        "recomputed account stats"
    );
    Ok(stats)
}

/// Rebuild every account's rollup; the administrative recovery pass.
pub async fn recompute_all(state: &SharedState) -> Result<u32, ServiceError> {
    let store = state.require_pick_store().await?;
    let accounts = store.list_accounts().await?;

    let mut recomputed = 0;
    for account in accounts {
        recompute_account_stats(state, account.id).await?;
        recomputed += 1;
    }
    Ok(recomputed)
}

/// Pure fold of chronologically ordered scored pick-sets into a rollup.
pub fn fold_stats<'a>(
    account_id: Uuid,
    pick_sets: impl Iterator<Item = &'a PickSetEntity>,
    now: SystemTime,
) -> AccountStatsEntity {
    let mut stats = AccountStatsEntity::empty(account_id, now);
    let mut run = 0u32;

    for pick_set in pick_sets {
        stats.total_picks += pick_set.total_picks;
        stats.correct_picks += pick_set.correct_picks;
        stats.total_points += pick_set.total_points;
        stats.events_participated += 1;
        stats.best_event_score = stats.best_event_score.max(pick_set.total_points);

        let mut picks: Vec<_> = pick_set.picks.iter().collect();
        picks.sort_by_key(|pick| pick.position);
        for pick in picks {
            if pick.is_correct {
                run += 1;
                stats.longest_streak = stats.longest_streak.max(run);
            } else {
                run = 0;
            }
        }
    }

    stats.current_streak = run;
    stats.avg_accuracy = accuracy_percent(stats.correct_picks, stats.total_picks);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::{FightMethod, FightWinner, PickDetailEntity};

    fn detail(position: u32, is_correct: bool, points: u32) -> PickDetailEntity {
        PickDetailEntity {
            position,
            winner: FightWinner::Fighter1,
            method: FightMethod::Decision,
            round: None,
            time: None,
            points,
            is_correct,
        }
    }

    fn scored_set(points: u32, correct: u32, picks: Vec<PickDetailEntity>) -> PickSetEntity {
        let now = SystemTime::now();
        let total = picks.len() as u32;
        PickSetEntity {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            is_submitted: true,
            submitted_at: Some(now),
            is_scored: true,
            scored_at: Some(now),
            total_points: points,
            correct_picks: correct,
            total_picks: total,
            accuracy: accuracy_percent(correct, total),
            picks,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_iterator_yields_empty_rollup() {
        let stats = fold_stats(Uuid::new_v4(), std::iter::empty(), SystemTime::now());
        assert_eq!(stats.total_points, 0);
        assert_eq!(stats.events_participated, 0);
        assert_eq!(stats.avg_accuracy, 0.0);
    }

    #[test]
    fn totals_and_best_event_score_accumulate() {
        let sets = vec![
            scored_set(9, 2, vec![detail(1, true, 5), detail(2, true, 4)]),
            scored_set(4, 1, vec![detail(1, true, 4), detail(2, false, 0)]),
        ];
        let stats = fold_stats(Uuid::new_v4(), sets.iter(), SystemTime::now());

        assert_eq!(stats.total_points, 13);
        assert_eq!(stats.correct_picks, 3);
        assert_eq!(stats.total_picks, 4);
        assert_eq!(stats.events_participated, 2);
        assert_eq!(stats.best_event_score, 9);
        assert_eq!(stats.avg_accuracy, 75.0);
    }

    #[test]
    fn streaks_span_event_boundaries() {
        let sets = vec![
            scored_set(8, 2, vec![detail(1, false, 0), detail(2, true, 4), detail(3, true, 4)]),
            scored_set(4, 1, vec![detail(1, true, 4), detail(2, false, 0)]),
        ];
        let stats = fold_stats(Uuid::new_v4(), sets.iter(), SystemTime::now());

        // Longest run crosses from the first card into the second.
        assert_eq!(stats.longest_streak, 3);
        // The trailing miss resets the current streak.
        assert_eq!(stats.current_streak, 0);
    }

    #[test]
    fn current_streak_counts_the_trailing_run() {
        let sets = vec![scored_set(
            8,
            2,
            vec![detail(1, false, 0), detail(2, true, 4), detail(3, true, 4)],
        )];
        let stats = fold_stats(Uuid::new_v4(), sets.iter(), SystemTime::now());
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
    }
}
