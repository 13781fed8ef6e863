//! Pick submission and retrieval.
//!
//! Submission is idempotently keyed by (account, event): resubmitting before
//! the deadline replaces the whole detail set in one document write, so no
//! stale rows can survive a resubmission.

use std::collections::HashSet;
use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{AccountEntity, EventEntity, PickDetailEntity, PickSetEntity},
    dto::pick::{PickSetSummary, SubmitPicksRequest},
    error::ServiceError,
    state::SharedState,
};

/// Create or replace the caller's pick-set for an event.
pub async fn submit_picks(
    state: &SharedState,
    account: &AccountEntity,
    event_id: Uuid,
    request: SubmitPicksRequest,
) -> Result<PickSetSummary, ServiceError> {
    request.validate()?;
    let store = state.require_pick_store().await?;
    let now = SystemTime::now();

    let event = store
        .find_event(event_id)
        .await?
        .filter(|event| event.is_active)
        .ok_or_else(|| ServiceError::NotFound(format!("event `{event_id}` not found")))?;

    ensure_submissions_open(&event, now)?;
    ensure_picks_match_card(&event, &request)?;

    // Resubmission keeps the identity of the existing set and replaces its
    // details wholesale.
    let existing = store.find_pick_set(account.id, event_id).await?;
    let (id, created_at) = existing
        .map(|set| (set.id, set.created_at))
        .unwrap_or((Uuid::new_v4(), now));

    let picks: Vec<PickDetailEntity> = request
        .picks
        .into_iter()
        .map(|pick| PickDetailEntity {
            position: pick.position,
            winner: pick.winner,
            method: pick.method,
            round: pick.round,
            time: pick.time,
            points: 0,
            is_correct: false,
        })
        .collect();

    let total_picks = picks.len() as u32;
    let pick_set = PickSetEntity {
        id,
        account_id: account.id,
        event_id,
        is_submitted: true,
        submitted_at: Some(now),
        is_scored: false,
        scored_at: None,
        total_points: 0,
        correct_picks: 0,
        total_picks,
        accuracy: 0.0,
        picks,
        created_at,
        updated_at: now,
    };

    store.save_pick_set(pick_set.clone()).await?;
    info!(
        account_id = %account.id,
        event_id = %event_id,
        picks = total_picks,
        "pick-set submitted"
    );

    Ok(pick_set.into())
}

/// Every pick-set the caller has submitted, most recent event first.
pub async fn my_picks(
    state: &SharedState,
    account_id: Uuid,
) -> Result<Vec<PickSetSummary>, ServiceError> {
    let store = state.require_pick_store().await?;
    let mut sets = store.list_pick_sets_for_account(account_id).await?;
    sets.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    Ok(sets.into_iter().map(Into::into).collect())
}

/// The caller's pick-set for one event.
pub async fn my_picks_for_event(
    state: &SharedState,
    account_id: Uuid,
    event_id: Uuid,
) -> Result<PickSetSummary, ServiceError> {
    let store = state.require_pick_store().await?;
    store
        .find_pick_set(account_id, event_id)
        .await?
        .map(Into::into)
        .ok_or_else(|| {
            ServiceError::NotFound(format!("no picks submitted for event `{event_id}`"))
        })
}

/// All pick-sets for an event; participants may look once the deadline has
/// passed, admins any time.
pub async fn event_picks(
    state: &SharedState,
    caller: &AccountEntity,
    event_id: Uuid,
) -> Result<Vec<PickSetSummary>, ServiceError> {
    let store = state.require_pick_store().await?;
    let now = SystemTime::now();

    let event = store
        .find_event(event_id)
        .await?
        .filter(|event| event.is_active)
        .ok_or_else(|| ServiceError::NotFound(format!("event `{event_id}` not found")))?;

    if !caller.is_admin {
        let participating = store.find_pick_set(caller.id, event_id).await?.is_some();
        if !participating {
            return Err(ServiceError::Forbidden(
                "only participants can view picks for this event".into(),
            ));
        }
        if now <= event.pick_deadline {
            return Err(ServiceError::Forbidden(
                "picks stay private until the deadline passes".into(),
            ));
        }
    }

    let mut sets = store.list_pick_sets_for_event(event_id).await?;
    sets.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
    Ok(sets.into_iter().map(Into::into).collect())
}

fn ensure_submissions_open(event: &EventEntity, now: SystemTime) -> Result<(), ServiceError> {
    if event.any_fight_completed() {
        return Err(ServiceError::InvalidState(
            "results already posted; the event is closed".into(),
        ));
    }
    if now >= event.event_date {
        return Err(ServiceError::InvalidState(
            "the event has started; picks are locked".into(),
        ));
    }
    if now > event.pick_deadline {
        return Err(ServiceError::InvalidState(
            "the pick deadline has passed".into(),
        ));
    }
    Ok(())
}

fn ensure_picks_match_card(
    event: &EventEntity,
    request: &SubmitPicksRequest,
) -> Result<(), ServiceError> {
    let mut seen = HashSet::new();
    for pick in &request.picks {
        if !seen.insert(pick.position) {
            return Err(ServiceError::InvalidInput(format!(
                "duplicate pick for fight position `{}`",
                pick.position
            )));
        }
        if event.fight_at(pick.position).is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "fight position `{}` is not on this card",
                pick.position
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        dao::models::{FightMethod, FightWinner},
        dto::pick::PickInput,
        services::event_service::{self, tests::create_request},
        state::test_state,
    };
    use std::time::Duration;

    pub(crate) async fn seeded_account(state: &crate::state::SharedState, handle: &str) -> AccountEntity {
        let now = SystemTime::now();
        let account = AccountEntity {
            id: Uuid::new_v4(),
            handle: handle.into(),
            email: format!("{handle}@example.com"),
            password_hash: String::new(),
            is_admin: false,
            is_owner: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let store = state.require_pick_store().await.unwrap();
        store.save_account(account.clone()).await.unwrap();
        store
            .save_stats(crate::dao::models::AccountStatsEntity::empty(account.id, now))
            .await
            .unwrap();
        account
    }

    pub(crate) fn pick_input(position: u32, winner: FightWinner, round: Option<u8>) -> PickInput {
        PickInput {
            position,
            winner,
            method: if round.is_some() {
                FightMethod::KoTko
            } else {
                FightMethod::Decision
            },
            round,
            time: None,
        }
    }

    pub(crate) fn picks(inputs: Vec<PickInput>) -> SubmitPicksRequest {
        SubmitPicksRequest { picks: inputs }
    }

    #[tokio::test]
    async fn submission_roundtrip() {
        let state = test_state().await;
        let account = seeded_account(&state, "iron_mike").await;
        let event = event_service::create_event(
            &state,
            create_request(Duration::from_secs(7200), Duration::from_secs(3600), &[1, 2]),
        )
        .await
        .unwrap();

        let summary = submit_picks(
            &state,
            &account,
            event.id,
            picks(vec![
                pick_input(1, FightWinner::Fighter1, Some(2)),
                pick_input(2, FightWinner::Fighter2, None),
            ]),
        )
        .await
        .unwrap();

        assert_eq!(summary.total_picks, 2);
        assert!(!summary.is_scored);
        assert_eq!(summary.total_points, 0);

        let mine = my_picks_for_event(&state, account.id, event.id).await.unwrap();
        assert_eq!(mine.id, summary.id);
    }

    #[tokio::test]
    async fn resubmission_replaces_the_prior_detail_set() {
        let state = test_state().await;
        let account = seeded_account(&state, "iron_mike").await;
        let event = event_service::create_event(
            &state,
            create_request(Duration::from_secs(7200), Duration::from_secs(3600), &[1, 2, 3]),
        )
        .await
        .unwrap();

        let first = submit_picks(
            &state,
            &account,
            event.id,
            picks(vec![
                pick_input(1, FightWinner::Fighter1, Some(2)),
                pick_input(2, FightWinner::Fighter1, Some(1)),
            ]),
        )
        .await
        .unwrap();

        let second = submit_picks(
            &state,
            &account,
            event.id,
            picks(vec![pick_input(3, FightWinner::Fighter2, None)]),
        )
        .await
        .unwrap();

        // Same set identity, fully replaced details.
        assert_eq!(first.id, second.id);
        assert_eq!(second.total_picks, 1);
        assert_eq!(second.picks.len(), 1);
        assert_eq!(second.picks[0].position, 3);
    }

    #[tokio::test]
    async fn submissions_after_the_deadline_are_rejected() {
        let state = test_state().await;
        let account = seeded_account(&state, "iron_mike").await;
        // Deadline already in the past, event date still ahead.
        let event = event_service::create_event(
            &state,
            crate::dto::event::CreateEventRequest {
                pick_deadline: crate::dto::format_system_time(
                    SystemTime::now() - Duration::from_secs(60),
                ),
                ..create_request(Duration::from_secs(7200), Duration::from_secs(3600), &[1])
            },
        )
        .await
        .unwrap();

        let err = submit_picks(
            &state,
            &account,
            event.id,
            picks(vec![pick_input(1, FightWinner::Fighter1, Some(1))]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn picks_for_unknown_positions_are_rejected() {
        let state = test_state().await;
        let account = seeded_account(&state, "iron_mike").await;
        let event = event_service::create_event(
            &state,
            create_request(Duration::from_secs(7200), Duration::from_secs(3600), &[1]),
        )
        .await
        .unwrap();

        let err = submit_picks(
            &state,
            &account,
            event.id,
            picks(vec![pick_input(9, FightWinner::Fighter1, Some(1))]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn event_picks_stay_private_until_the_deadline() {
        let state = test_state().await;
        let account = seeded_account(&state, "iron_mike").await;
        let event = event_service::create_event(
            &state,
            create_request(Duration::from_secs(7200), Duration::from_secs(3600), &[1]),
        )
        .await
        .unwrap();

        submit_picks(
            &state,
            &account,
            event.id,
            picks(vec![pick_input(1, FightWinner::Fighter1, Some(1))]),
        )
        .await
        .unwrap();

        let err = event_picks(&state, &account, event.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let mut admin = seeded_account(&state, "boss_lady").await;
        admin.is_admin = true;
        let visible = event_picks(&state, &admin, event.id).await.unwrap();
        assert_eq!(visible.len(), 1);
    }
}
