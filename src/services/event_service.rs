//! Event card management: listing, creation, roster edits, soft delete, purge.

use std::collections::HashSet;
use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{EventEntity, EventStatus, FightEntity, FighterEntity},
    dto::{
        admin::PurgeResponse,
        event::{
            CreateEventRequest, EventListItem, EventSummary, FightInput, UpdateEventRequest,
            event_list_item, event_summary,
        },
        parse_rfc3339,
    },
    error::ServiceError,
    state::SharedState,
};

/// Public listing of active events, soonest card first.
pub async fn list_events(state: &SharedState) -> Result<Vec<EventListItem>, ServiceError> {
    let store = state.require_pick_store().await?;
    let now = SystemTime::now();

    Ok(store
        .list_events(false)
        .await?
        .into_iter()
        .map(|event| {
            let status = event.effective_status(now);
            event_list_item(event, status)
        })
        .collect())
}

/// Admin listing including soft-deleted cards.
pub async fn list_all_events(state: &SharedState) -> Result<Vec<EventListItem>, ServiceError> {
    let store = state.require_pick_store().await?;
    let now = SystemTime::now();

    Ok(store
        .list_events(true)
        .await?
        .into_iter()
        .map(|event| {
            let status = event.effective_status(now);
            event_list_item(event, status)
        })
        .collect())
}

/// Public event detail; soft-deleted cards are invisible here.
pub async fn get_event(state: &SharedState, id: Uuid) -> Result<EventSummary, ServiceError> {
    let store = state.require_pick_store().await?;
    let event = store
        .find_event(id)
        .await?
        .filter(|event| event.is_active)
        .ok_or_else(|| ServiceError::NotFound(format!("event `{id}` not found")))?;

    let status = event.effective_status(SystemTime::now());
    Ok(event_summary(event, status))
}

/// Create a new card with its fight roster.
pub async fn create_event(
    state: &SharedState,
    request: CreateEventRequest,
) -> Result<EventSummary, ServiceError> {
    request.validate()?;
    let store = state.require_pick_store().await?;
    let now = SystemTime::now();

    let event_date = parse_date(&request.event_date, "event_date")?;
    let pick_deadline = parse_date(&request.pick_deadline, "pick_deadline")?;
    ensure_deadline_before_date(pick_deadline, event_date)?;
    let fights = build_roster(request.fights)?;

    let event = EventEntity {
        id: Uuid::new_v4(),
        name: request.name,
        venue: request.venue,
        event_date,
        pick_deadline,
        status: EventStatus::Upcoming,
        is_active: true,
        fights,
        created_at: now,
        updated_at: now,
    };

    store.save_event(event.clone()).await?;
    info!(event_id = %event.id, fights = event.fights.len(), "created event");

    let status = event.effective_status(now);
    Ok(event_summary(event, status))
}

/// Apply a partial update to a card.
pub async fn update_event(
    state: &SharedState,
    id: Uuid,
    request: UpdateEventRequest,
) -> Result<EventSummary, ServiceError> {
    request.validate()?;
    let store = state.require_pick_store().await?;
    let now = SystemTime::now();

    let mut event = store
        .find_event(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("event `{id}` not found")))?;

    if let Some(name) = request.name {
        event.name = name;
    }
    if let Some(venue) = request.venue {
        event.venue = Some(venue);
    }
    if let Some(raw) = request.event_date {
        event.event_date = parse_date(&raw, "event_date")?;
    }
    if let Some(raw) = request.pick_deadline {
        event.pick_deadline = parse_date(&raw, "pick_deadline")?;
    }
    ensure_deadline_before_date(event.pick_deadline, event.event_date)?;

    if let Some(fights) = request.fights {
        if event.any_fight_completed() {
            return Err(ServiceError::InvalidState(
                "the roster cannot be replaced once results are posted".into(),
            ));
        }
        event.fights = build_roster(fights)?;
    }

    event.updated_at = now;
    store.save_event(event.clone()).await?;

    let status = event.effective_status(now);
    Ok(event_summary(event, status))
}

/// Soft-delete a card so it disappears from the public surface.
pub async fn soft_delete_event(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_pick_store().await?;

    let mut event = store
        .find_event(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("event `{id}` not found")))?;

    if event.is_active {
        event.is_active = false;
        event.updated_at = SystemTime::now();
        store.save_event(event).await?;
        info!(event_id = %id, "soft-deleted event");
    }
    Ok(())
}

/// Hard-delete a soft-deleted card together with its orphan pick-sets.
pub async fn purge_event(state: &SharedState, id: Uuid) -> Result<PurgeResponse, ServiceError> {
    let store = state.require_pick_store().await?;

    let event = store
        .find_event(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("event `{id}` not found")))?;
    if event.is_active {
        return Err(ServiceError::InvalidState(
            "only soft-deleted events can be purged".into(),
        ));
    }

    let pick_sets_removed = store.delete_pick_sets_for_event(id).await?;
    let event_deleted = store.delete_event(id).await?;
    info!(event_id = %id, pick_sets_removed, "purged event");

    Ok(PurgeResponse {
        event_id: id,
        event_deleted,
        pick_sets_removed,
    })
}

fn parse_date(raw: &str, field: &str) -> Result<SystemTime, ServiceError> {
    parse_rfc3339(raw)
        .map_err(|_| ServiceError::InvalidInput(format!("`{field}` is not a valid RFC 3339 timestamp")))
}

fn ensure_deadline_before_date(
    pick_deadline: SystemTime,
    event_date: SystemTime,
) -> Result<(), ServiceError> {
    if pick_deadline >= event_date {
        return Err(ServiceError::InvalidInput(
            "pick_deadline must be strictly before event_date".into(),
        ));
    }
    Ok(())
}

fn build_roster(fights: Vec<FightInput>) -> Result<Vec<FightEntity>, ServiceError> {
    let mut seen = HashSet::new();
    let mut roster = fights
        .into_iter()
        .map(|fight| {
            if !seen.insert(fight.position) {
                return Err(ServiceError::InvalidInput(format!(
                    "duplicate fight position `{}` on the card",
                    fight.position
                )));
            }
            Ok(FightEntity {
                position: fight.position,
                fighter1: build_fighter(fight.fighter1),
                fighter2: build_fighter(fight.fighter2),
                is_completed: false,
                outcome: None,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    roster.sort_by_key(|fight| fight.position);
    Ok(roster)
}

fn build_fighter(input: crate::dto::event::FighterInput) -> FighterEntity {
    FighterEntity {
        name: input.name,
        record: input.record,
        image_url: input.image_url,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::dto::event::FighterInput;
    use crate::state::test_state;
    use std::time::Duration;

    pub(crate) fn fighter_input(name: &str) -> FighterInput {
        FighterInput {
            name: name.into(),
            record: None,
            image_url: None,
        }
    }

    pub(crate) fn fight_input(position: u32) -> FightInput {
        FightInput {
            position,
            fighter1: fighter_input("Alpha"),
            fighter2: fighter_input("Bravo"),
        }
    }

    pub(crate) fn create_request(
        event_in: Duration,
        deadline_in: Duration,
        positions: &[u32],
    ) -> CreateEventRequest {
        let now = SystemTime::now();
        CreateEventRequest {
            name: "Test Card 1".into(),
            venue: Some("The Armory".into()),
            event_date: crate::dto::format_system_time(now + event_in),
            pick_deadline: crate::dto::format_system_time(now + deadline_in),
            fights: positions.iter().copied().map(fight_input).collect(),
        }
    }

    #[tokio::test]
    async fn create_and_fetch_roundtrip() {
        let state = test_state().await;
        let created = create_event(
            &state,
            create_request(Duration::from_secs(7200), Duration::from_secs(3600), &[1, 2]),
        )
        .await
        .unwrap();

        let fetched = get_event(&state, created.id).await.unwrap();
        assert_eq!(fetched.fights.len(), 2);
        assert_eq!(fetched.status, EventStatus::Upcoming);
    }

    #[tokio::test]
    async fn deadline_must_precede_event_date() {
        let state = test_state().await;
        let err = create_event(
            &state,
            create_request(Duration::from_secs(3600), Duration::from_secs(7200), &[1]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn duplicate_positions_are_rejected() {
        let state = test_state().await;
        let err = create_event(
            &state,
            create_request(Duration::from_secs(7200), Duration::from_secs(3600), &[1, 1]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn soft_deleted_events_vanish_from_the_public_surface() {
        let state = test_state().await;
        let created = create_event(
            &state,
            create_request(Duration::from_secs(7200), Duration::from_secs(3600), &[1]),
        )
        .await
        .unwrap();

        soft_delete_event(&state, created.id).await.unwrap();

        assert!(matches!(
            get_event(&state, created.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(list_events(&state).await.unwrap().is_empty());
        assert_eq!(list_all_events(&state).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn purge_requires_prior_soft_delete() {
        let state = test_state().await;
        let created = create_event(
            &state,
            create_request(Duration::from_secs(7200), Duration::from_secs(3600), &[1]),
        )
        .await
        .unwrap();

        assert!(matches!(
            purge_event(&state, created.id).await,
            Err(ServiceError::InvalidState(_))
        ));

        soft_delete_event(&state, created.id).await.unwrap();
        let purge = purge_event(&state, created.id).await.unwrap();
        assert!(purge.event_deleted);
    }
}
