//! Entities persisted by the storage layer and shared across services.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Registered account with credentials and role flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountEntity {
    /// Stable identifier for the account.
    pub id: Uuid,
    /// Unique login handle.
    pub handle: String,
    /// Unique contact address.
    pub email: String,
    /// Argon2 password hash, never exposed through DTOs.
    pub password_hash: String,
    /// Whether the account may use administrative endpoints.
    pub is_admin: bool,
    /// Owner accounts are protected from role and status mutations by non-owners.
    pub is_owner: bool,
    /// Inactive accounts cannot log in and are hidden from rankings.
    pub is_active: bool,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time this account was updated.
    pub updated_at: SystemTime,
}

/// Lifecycle status of an event card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Card announced, picks open until the deadline.
    Upcoming,
    /// Event date passed, no results posted yet.
    Live,
    /// At least one fight has a posted result.
    Completed,
}

impl EventStatus {
    /// Lifecycle moves strictly forward: upcoming, live, completed.
    pub fn can_transition(self, next: EventStatus) -> bool {
        matches!(
            (self, next),
            (EventStatus::Upcoming, EventStatus::Live)
                | (EventStatus::Upcoming, EventStatus::Completed)
                | (EventStatus::Live, EventStatus::Completed)
        )
    }
}

/// A scheduled fight card owning an ordered collection of fights.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventEntity {
    /// Stable identifier for the event.
    pub id: Uuid,
    /// Display name of the card.
    pub name: String,
    /// Venue description, free-form.
    pub venue: Option<String>,
    /// When the card starts.
    pub event_date: SystemTime,
    /// Submission cutoff, strictly before `event_date` (validated at the API layer).
    pub pick_deadline: SystemTime,
    /// Current lifecycle status.
    pub status: EventStatus,
    /// Soft-delete flag; inactive events are hidden from the public surface.
    pub is_active: bool,
    /// Bouts on the card, ordered by position.
    pub fights: Vec<FightEntity>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time this event was updated.
    pub updated_at: SystemTime,
}

impl EventEntity {
    /// Find a fight by its card position.
    pub fn fight_at(&self, position: u32) -> Option<&FightEntity> {
        self.fights.iter().find(|fight| fight.position == position)
    }

    /// Whether any fight on the card already has a posted result.
    pub fn any_fight_completed(&self) -> bool {
        self.fights.iter().any(|fight| fight.is_completed)
    }

    /// Lifecycle status as observed at `now`.
    ///
    /// Live is derived rather than stored: a card whose date has passed
    /// without results is live, and nothing ever moves backwards.
    pub fn effective_status(&self, now: SystemTime) -> EventStatus {
        match self.status {
            EventStatus::Completed => EventStatus::Completed,
            _ if now >= self.event_date => EventStatus::Live,
            _ => EventStatus::Upcoming,
        }
    }
}

/// One participant of a fight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FighterEntity {
    /// Display name.
    pub name: String,
    /// Optional professional record, e.g. "24-1-0".
    pub record: Option<String>,
    /// Optional portrait URL served by an external asset host.
    pub image_url: Option<String>,
}

/// One scheduled bout within an event card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FightEntity {
    /// Position on the card, unique within the event.
    pub position: u32,
    /// First listed fighter.
    pub fighter1: FighterEntity,
    /// Second listed fighter.
    pub fighter2: FighterEntity,
    /// Gate for scoring: outcome fields are only present when true.
    pub is_completed: bool,
    /// Posted result, present only once the fight is completed.
    pub outcome: Option<FightOutcomeEntity>,
}

/// Winner designation relative to the fight's listing order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FightWinner {
    /// The first listed fighter won.
    Fighter1,
    /// The second listed fighter won.
    Fighter2,
}

/// How a fight ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub enum FightMethod {
    /// Knockout or technical knockout.
    #[serde(rename = "KO/TKO")]
    KoTko,
    /// Submission finish.
    Submission,
    /// Went to the judges' scorecards; carries no round or time.
    Decision,
}

impl FightMethod {
    /// Decisions carry no finishing round or time.
    pub fn requires_round(self) -> bool {
        !matches!(self, FightMethod::Decision)
    }
}

/// Final outcome of a completed fight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FightOutcomeEntity {
    /// Winner designation.
    pub winner: FightWinner,
    /// Finishing method.
    pub method: FightMethod,
    /// Finishing round, absent for decisions.
    pub round: Option<u8>,
    /// Finishing time within the round ("4:32"), absent for decisions.
    pub time: Option<String>,
}

/// All picks one account submitted for one event, plus cached totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickSetEntity {
    /// Stable identifier for the pick-set.
    pub id: Uuid,
    /// Owning account; (account_id, event_id) is unique.
    pub account_id: Uuid,
    /// Event the picks are for.
    pub event_id: Uuid,
    /// Whether the set has been submitted (it always is once persisted here).
    pub is_submitted: bool,
    /// When the set was last submitted.
    pub submitted_at: Option<SystemTime>,
    /// Whether a scoring pass has run over this set.
    pub is_scored: bool,
    /// When the set was last scored.
    pub scored_at: Option<SystemTime>,
    /// Cached sum of points over all picks.
    pub total_points: u32,
    /// Cached count of correct picks.
    pub correct_picks: u32,
    /// Cached count of picks in the set.
    pub total_picks: u32,
    /// Cached accuracy percentage, 0 when the set is empty.
    pub accuracy: f64,
    /// One prediction per fight position.
    pub picks: Vec<PickDetailEntity>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time this pick-set was updated.
    pub updated_at: SystemTime,
}

/// One account's forecast for one fight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickDetailEntity {
    /// Card position of the predicted fight, unique within the set.
    pub position: u32,
    /// Predicted winner.
    pub winner: FightWinner,
    /// Predicted method.
    pub method: FightMethod,
    /// Predicted round, required unless the method is a decision.
    pub round: Option<u8>,
    /// Predicted finishing time, optional and absent for decisions.
    pub time: Option<String>,
    /// Points earned, populated by scoring.
    pub points: u32,
    /// Whether the predicted winner was right, populated by scoring.
    pub is_correct: bool,
}

/// Denormalized per-account rollup recomputed whenever the account's pick-sets are scored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountStatsEntity {
    /// Account this rollup belongs to, one record per account.
    pub account_id: Uuid,
    /// Picks across all scored sets.
    pub total_picks: u32,
    /// Correct picks across all scored sets.
    pub correct_picks: u32,
    /// Points across all scored sets.
    pub total_points: u32,
    /// Number of scored events entered.
    pub events_participated: u32,
    /// Highest single-event score.
    pub best_event_score: u32,
    /// Correct-pick streak counted from the most recent pick backwards.
    pub current_streak: u32,
    /// Longest correct-pick streak ever.
    pub longest_streak: u32,
    /// Overall accuracy percentage, 0 when no picks were scored.
    pub avg_accuracy: f64,
    /// Last time this rollup was recomputed.
    pub updated_at: SystemTime,
}

impl AccountStatsEntity {
    /// Empty rollup created alongside a fresh account.
    pub fn empty(account_id: Uuid, now: SystemTime) -> Self {
        Self {
            account_id,
            total_picks: 0,
            correct_picks: 0,
            total_points: 0,
            events_participated: 0,
            best_event_score: 0,
            current_streak: 0,
            longest_streak: 0,
            avg_accuracy: 0.0,
            updated_at: now,
        }
    }
}

/// Accuracy percentage, defined as 0 when no picks were made.
pub fn accuracy_percent(correct: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(correct) / f64::from(total) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_status_only_moves_forward() {
        assert!(EventStatus::Upcoming.can_transition(EventStatus::Live));
        assert!(EventStatus::Upcoming.can_transition(EventStatus::Completed));
        assert!(EventStatus::Live.can_transition(EventStatus::Completed));

        assert!(!EventStatus::Live.can_transition(EventStatus::Upcoming));
        assert!(!EventStatus::Completed.can_transition(EventStatus::Live));
        assert!(!EventStatus::Completed.can_transition(EventStatus::Upcoming));
    }

    #[test]
    fn decisions_carry_no_round() {
        assert!(FightMethod::KoTko.requires_round());
        assert!(FightMethod::Submission.requires_round());
        assert!(!FightMethod::Decision.requires_round());
    }

    #[test]
    fn accuracy_is_zero_for_empty_sets() {
        assert_eq!(accuracy_percent(0, 0), 0.0);
        assert_eq!(accuracy_percent(1, 2), 50.0);
        assert_eq!(accuracy_percent(3, 3), 100.0);
    }
}
