//! Event card, fight roster, and results DTOs.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{
        EventEntity, EventStatus, FightEntity, FightMethod, FightOutcomeEntity, FightWinner,
        FighterEntity,
    },
    dto::{format_system_time, validation::validate_fight_time},
};

/// Incoming fighter description for a roster entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct FighterInput {
    /// Display name.
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    /// Professional record, free-form.
    #[validate(length(max = 32))]
    pub record: Option<String>,
    /// Portrait URL on an external asset host.
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Incoming bout definition for a card.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct FightInput {
    /// Position on the card, 1-based.
    #[validate(range(min = 1))]
    pub position: u32,
    /// First listed fighter.
    #[validate(nested)]
    pub fighter1: FighterInput,
    /// Second listed fighter.
    #[validate(nested)]
    pub fighter2: FighterInput,
}

/// Payload creating a new event card.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateEventRequest {
    /// Display name of the card.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Venue description.
    #[validate(length(max = 200))]
    pub venue: Option<String>,
    /// RFC 3339 date the card starts.
    pub event_date: String,
    /// RFC 3339 submission cutoff, strictly before `event_date`.
    pub pick_deadline: String,
    /// Bouts on the card.
    #[validate(length(min = 1), nested)]
    pub fights: Vec<FightInput>,
}

/// Partial event mutation; omitted fields are left untouched.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateEventRequest {
    /// New display name.
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// New venue description.
    #[validate(length(max = 200))]
    pub venue: Option<String>,
    /// New RFC 3339 event date.
    pub event_date: Option<String>,
    /// New RFC 3339 pick deadline.
    pub pick_deadline: Option<String>,
    /// Replacement roster; rejected once any fight has a result.
    #[validate(length(min = 1), nested)]
    pub fights: Option<Vec<FightInput>>,
}

/// One posted fight result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FightResultInput {
    /// Card position of the fight this result belongs to.
    pub position: u32,
    /// Winner designation.
    pub winner: FightWinner,
    /// Finishing method.
    pub method: FightMethod,
    /// Finishing round, required unless the method is a decision.
    pub round: Option<u8>,
    /// Finishing clock time, absent for decisions.
    pub time: Option<String>,
}

impl Validate for FightResultInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_round_and_time(self.method, self.round, self.time.as_deref(), &mut errors);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Round and time are present iff the method can finish inside a round.
pub(crate) fn validate_round_and_time(
    method: FightMethod,
    round: Option<u8>,
    time: Option<&str>,
    errors: &mut ValidationErrors,
) {
    if method.requires_round() {
        match round {
            None => {
                let mut err = ValidationError::new("round_required");
                err.message = Some("round is required unless the method is a decision".into());
                errors.add("round", err);
            }
            Some(round) if !(1..=5).contains(&round) => {
                let mut err = ValidationError::new("round_range");
                err.message = Some("round must be between 1 and 5".into());
                errors.add("round", err);
            }
            Some(_) => {}
        }

        if let Some(time) = time {
            if let Err(err) = validate_fight_time(time) {
                errors.add("time", err);
            }
        }
    } else {
        if round.is_some() {
            let mut err = ValidationError::new("round_forbidden");
            err.message = Some("decision results carry no round".into());
            errors.add("round", err);
        }
        if time.is_some() {
            let mut err = ValidationError::new("time_forbidden");
            err.message = Some("decision results carry no time".into());
            errors.add("time", err);
        }
    }
}

/// Payload posting final outcomes for an event.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ResultsRequest {
    /// One result per completed fight.
    #[validate(length(min = 1), nested)]
    pub results: Vec<FightResultInput>,
}

/// Summary returned after a results pass.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultsResponse {
    /// The event that was scored.
    pub event_id: Uuid,
    /// How many fights now carry a result.
    pub fights_completed: u32,
    /// How many pick-sets were (re)scored.
    pub pick_sets_scored: u32,
    /// How many account rollups were recomputed.
    pub accounts_updated: u32,
}

/// Public projection of a fighter.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FighterSummary {
    /// Display name.
    pub name: String,
    /// Professional record, if known.
    pub record: Option<String>,
    /// Portrait URL, if any.
    pub image_url: Option<String>,
}

/// Public projection of a posted outcome.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OutcomeSummary {
    /// Winner designation.
    pub winner: FightWinner,
    /// Finishing method.
    pub method: FightMethod,
    /// Finishing round, absent for decisions.
    pub round: Option<u8>,
    /// Finishing clock time, absent for decisions.
    pub time: Option<String>,
}

/// Public projection of a bout.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FightSummary {
    /// Position on the card.
    pub position: u32,
    /// First listed fighter.
    pub fighter1: FighterSummary,
    /// Second listed fighter.
    pub fighter2: FighterSummary,
    /// Whether the result has been posted.
    pub is_completed: bool,
    /// The result, once posted.
    pub outcome: Option<OutcomeSummary>,
}

/// Full event detail including the roster.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventSummary {
    /// Event identifier.
    pub id: Uuid,
    /// Display name of the card.
    pub name: String,
    /// Venue description.
    pub venue: Option<String>,
    /// RFC 3339 date the card starts.
    pub event_date: String,
    /// RFC 3339 submission cutoff.
    pub pick_deadline: String,
    /// Lifecycle status, live computed from the event date.
    pub status: EventStatus,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Bouts on the card.
    pub fights: Vec<FightSummary>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-update timestamp.
    pub updated_at: String,
}

/// Condensed event row for listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListItem {
    /// Event identifier.
    pub id: Uuid,
    /// Display name of the card.
    pub name: String,
    /// Venue description.
    pub venue: Option<String>,
    /// RFC 3339 date the card starts.
    pub event_date: String,
    /// RFC 3339 submission cutoff.
    pub pick_deadline: String,
    /// Lifecycle status, live computed from the event date.
    pub status: EventStatus,
    /// Number of bouts on the card.
    pub fight_count: u32,
}

impl From<FighterEntity> for FighterSummary {
    fn from(fighter: FighterEntity) -> Self {
        Self {
            name: fighter.name,
            record: fighter.record,
            image_url: fighter.image_url,
        }
    }
}

impl From<FightOutcomeEntity> for OutcomeSummary {
    fn from(outcome: FightOutcomeEntity) -> Self {
        Self {
            winner: outcome.winner,
            method: outcome.method,
            round: outcome.round,
            time: outcome.time,
        }
    }
}

impl From<FightEntity> for FightSummary {
    fn from(fight: FightEntity) -> Self {
        Self {
            position: fight.position,
            fighter1: fight.fighter1.into(),
            fighter2: fight.fighter2.into(),
            is_completed: fight.is_completed,
            outcome: fight.outcome.map(Into::into),
        }
    }
}

/// Project an entity together with the effective status computed at `now`.
pub fn event_summary(event: EventEntity, status: EventStatus) -> EventSummary {
    EventSummary {
        id: event.id,
        name: event.name,
        venue: event.venue,
        event_date: format_system_time(event.event_date),
        pick_deadline: format_system_time(event.pick_deadline),
        status,
        is_active: event.is_active,
        fights: event.fights.into_iter().map(Into::into).collect(),
        created_at: format_system_time(event.created_at),
        updated_at: format_system_time(event.updated_at),
    }
}

/// Project an entity into a condensed listing row.
pub fn event_list_item(event: EventEntity, status: EventStatus) -> EventListItem {
    EventListItem {
        id: event.id,
        name: event.name,
        venue: event.venue,
        event_date: format_system_time(event.event_date),
        pick_deadline: format_system_time(event.pick_deadline),
        status,
        fight_count: event.fights.len() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(method: FightMethod, round: Option<u8>, time: Option<&str>) -> FightResultInput {
        FightResultInput {
            position: 1,
            winner: FightWinner::Fighter1,
            method,
            round,
            time: time.map(str::to_owned),
        }
    }

    #[test]
    fn finishes_require_a_round() {
        assert!(result(FightMethod::KoTko, Some(2), Some("4:32")).validate().is_ok());
        assert!(result(FightMethod::Submission, Some(1), None).validate().is_ok());
        assert!(result(FightMethod::KoTko, None, None).validate().is_err());
        assert!(result(FightMethod::KoTko, Some(6), None).validate().is_err());
    }

    #[test]
    fn decisions_carry_no_round_or_time() {
        assert!(result(FightMethod::Decision, None, None).validate().is_ok());
        assert!(result(FightMethod::Decision, Some(3), None).validate().is_err());
        assert!(result(FightMethod::Decision, None, Some("5:00")).validate().is_err());
    }
}
