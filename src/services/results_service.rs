//! Results posting and the scoring pass over submitted pick-sets.
//!
//! The pass is a full re-scan: outcomes are stamped, every submitted set for
//! the event is rescored from zero, and each affected account's rollup is
//! rebuilt from its complete scored history. Posting corrected results
//! re-runs the identical pass and converges instead of double-counting.

use std::collections::HashSet;
use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{EventStatus, FightOutcomeEntity},
    dto::event::{ResultsRequest, ResultsResponse},
    error::ServiceError,
    services::{scoring, stats_service},
    state::SharedState,
};

/// Stamp outcomes for an event and rescore everything that depends on them.
pub async fn post_results(
    state: &SharedState,
    event_id: Uuid,
    request: ResultsRequest,
) -> Result<ResultsResponse, ServiceError> {
    request.validate()?;
    let store = state.require_pick_store().await?;
    let now = SystemTime::now();

    let mut event = store
        .find_event(event_id)
        .await?
        .filter(|event| event.is_active)
        .ok_or_else(|| ServiceError::NotFound(format!("event `{event_id}` not found")))?;

    let mut seen = HashSet::new();
    for result in &request.results {
        if !seen.insert(result.position) {
            return Err(ServiceError::InvalidInput(format!(
                "duplicate result for fight position `{}`",
                result.position
            )));
        }
        if event.fight_at(result.position).is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "fight position `{}` is not on this card",
                result.position
            )));
        }
    }

    for result in request.results {
        let fight = event
            .fights
            .iter_mut()
            .find(|fight| fight.position == result.position)
            .ok_or_else(|| {
                ServiceError::Internal(format!(
                    "fight position `{}` vanished during results validation",
                    result.position
                ))
            })?;
        fight.outcome = Some(FightOutcomeEntity {
            winner: result.winner,
            method: result.method,
            round: result.round,
            time: result.time,
        });
        fight.is_completed = true;
    }

    if event.status.can_transition(EventStatus::Completed) {
        event.status = EventStatus::Completed;
    }
    event.updated_at = now;
    store.save_event(event.clone()).await?;

    let weights = state.config().scoring();
    let mut pick_sets_scored = 0u32;
    let mut affected_accounts = HashSet::new();

    for mut pick_set in store.list_pick_sets_for_event(event_id).await? {
        if !pick_set.is_submitted {
            continue;
        }
        scoring::rescore_pick_set(weights, &mut pick_set, &event, now);
        affected_accounts.insert(pick_set.account_id);
        store.save_pick_set(pick_set).await?;
        pick_sets_scored += 1;
    }

    for account_id in &affected_accounts {
        stats_service::recompute_account_stats(state, *account_id).await?;
    }

    let fights_completed = event
        .fights
        .iter()
        .filter(|fight| fight.is_completed)
        .count() as u32;

    info!(
        event_id = %event_id,
        fights_completed,
        pick_sets_scored,
        accounts_updated = affected_accounts.len(),
        "results posted and scored"
    );

    Ok(ResultsResponse {
        event_id,
        fights_completed,
        pick_sets_scored,
        accounts_updated: affected_accounts.len() as u32,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        dao::models::{FightMethod, FightWinner},
        dto::event::FightResultInput,
        services::{
            event_service::{self, tests::create_request},
            pick_service::{
                self,
                tests::{pick_input, picks, seeded_account},
            },
        },
        state::test_state,
    };
    use std::time::Duration;

    pub(crate) fn result_input(
        position: u32,
        winner: FightWinner,
        method: FightMethod,
        round: Option<u8>,
    ) -> FightResultInput {
        FightResultInput {
            position,
            winner,
            method,
            round,
            time: round.map(|_| "4:32".into()),
        }
    }

    pub(crate) fn results(inputs: Vec<FightResultInput>) -> ResultsRequest {
        ResultsRequest { results: inputs }
    }

    async fn event_with_submission(
        state: &crate::state::SharedState,
    ) -> (crate::dao::models::AccountEntity, uuid::Uuid) {
        let account = seeded_account(state, "iron_mike").await;
        let event = event_service::create_event(
            state,
            create_request(Duration::from_secs(7200), Duration::from_secs(3600), &[1]),
        )
        .await
        .unwrap();

        pick_service::submit_picks(
            state,
            &account,
            event.id,
            picks(vec![pick_input(1, FightWinner::Fighter1, Some(2))]),
        )
        .await
        .unwrap();

        (account, event.id)
    }

    #[tokio::test]
    async fn exact_prediction_scores_five_points() {
        let state = test_state().await;
        let (account, event_id) = event_with_submission(&state).await;

        let response = post_results(
            &state,
            event_id,
            results(vec![result_input(
                1,
                FightWinner::Fighter1,
                FightMethod::KoTko,
                Some(2),
            )]),
        )
        .await
        .unwrap();

        assert_eq!(response.pick_sets_scored, 1);
        assert_eq!(response.accounts_updated, 1);

        let set = pick_service::my_picks_for_event(&state, account.id, event_id)
            .await
            .unwrap();
        assert_eq!(set.total_points, 5);
        assert_eq!(set.correct_picks, 1);
        assert!(set.is_scored);

        let store = state.require_pick_store().await.unwrap();
        let stats = store.find_stats(account.id).await.unwrap().unwrap();
        assert_eq!(stats.total_points, 5);
        assert_eq!(stats.events_participated, 1);
        assert_eq!(stats.best_event_score, 5);
    }

    #[tokio::test]
    async fn wrong_round_scores_four_points() {
        let state = test_state().await;
        let (account, event_id) = event_with_submission(&state).await;

        post_results(
            &state,
            event_id,
            results(vec![result_input(
                1,
                FightWinner::Fighter1,
                FightMethod::KoTko,
                Some(3),
            )]),
        )
        .await
        .unwrap();

        let set = pick_service::my_picks_for_event(&state, account.id, event_id)
            .await
            .unwrap();
        assert_eq!(set.total_points, 4);
        assert_eq!(set.correct_picks, 1);
    }

    #[tokio::test]
    async fn posting_identical_results_twice_does_not_double_count() {
        let state = test_state().await;
        let (account, event_id) = event_with_submission(&state).await;

        let request = || {
            results(vec![result_input(
                1,
                FightWinner::Fighter1,
                FightMethod::KoTko,
                Some(2),
            )])
        };

        post_results(&state, event_id, request()).await.unwrap();
        post_results(&state, event_id, request()).await.unwrap();

        let store = state.require_pick_store().await.unwrap();
        let stats = store.find_stats(account.id).await.unwrap().unwrap();
        assert_eq!(stats.total_points, 5);
        assert_eq!(stats.total_picks, 1);
        assert_eq!(stats.events_participated, 1);

        let set = pick_service::my_picks_for_event(&state, account.id, event_id)
            .await
            .unwrap();
        assert_eq!(set.total_points, 5);
    }

    #[tokio::test]
    async fn corrected_results_overwrite_the_prior_scoring_state() {
        let state = test_state().await;
        let (account, event_id) = event_with_submission(&state).await;

        post_results(
            &state,
            event_id,
            results(vec![result_input(
                1,
                FightWinner::Fighter1,
                FightMethod::KoTko,
                Some(2),
            )]),
        )
        .await
        .unwrap();

        // Correction: the other fighter actually won.
        post_results(
            &state,
            event_id,
            results(vec![result_input(
                1,
                FightWinner::Fighter2,
                FightMethod::KoTko,
                Some(2),
            )]),
        )
        .await
        .unwrap();

        let store = state.require_pick_store().await.unwrap();
        let stats = store.find_stats(account.id).await.unwrap().unwrap();
        assert_eq!(stats.total_points, 0);
        assert_eq!(stats.correct_picks, 0);
    }

    #[tokio::test]
    async fn results_for_unknown_positions_are_rejected() {
        let state = test_state().await;
        let (_, event_id) = event_with_submission(&state).await;

        let err = post_results(
            &state,
            event_id,
            results(vec![result_input(
                7,
                FightWinner::Fighter1,
                FightMethod::KoTko,
                Some(1),
            )]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn results_flip_the_event_to_completed() {
        let state = test_state().await;
        let (_, event_id) = event_with_submission(&state).await;

        post_results(
            &state,
            event_id,
            results(vec![result_input(
                1,
                FightWinner::Fighter1,
                FightMethod::Decision,
                None,
            )]),
        )
        .await
        .unwrap();

        let event = event_service::get_event(&state, event_id).await.unwrap();
        assert_eq!(event.status, EventStatus::Completed);
        assert!(event.fights[0].is_completed);
    }
}
