//! Pick submission and retrieval DTOs.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{FightMethod, FightWinner, PickDetailEntity, PickSetEntity},
    dto::{event::validate_round_and_time, format_system_time},
};

/// One predicted fight outcome inside a submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PickInput {
    /// Card position of the predicted fight.
    pub position: u32,
    /// Predicted winner.
    pub winner: FightWinner,
    /// Predicted method.
    pub method: FightMethod,
    /// Predicted round, required unless the method is a decision.
    pub round: Option<u8>,
    /// Predicted finishing clock time, optional and absent for decisions.
    pub time: Option<String>,
}

impl Validate for PickInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_round_and_time(self.method, self.round, self.time.as_deref(), &mut errors);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload submitting (or resubmitting) picks for one event.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitPicksRequest {
    /// One prediction per fight the caller wants to score on.
    #[validate(length(min = 1), nested)]
    pub picks: Vec<PickInput>,
}

/// Public projection of a single scored or unscored pick.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PickDetailSummary {
    /// Card position of the predicted fight.
    pub position: u32,
    /// Predicted winner.
    pub winner: FightWinner,
    /// Predicted method.
    pub method: FightMethod,
    /// Predicted round, absent for decisions.
    pub round: Option<u8>,
    /// Predicted finishing clock time.
    pub time: Option<String>,
    /// Points earned once scored.
    pub points: u32,
    /// Whether the predicted winner was right once scored.
    pub is_correct: bool,
}

/// Public projection of one account's picks for one event.
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct PickSetSummary {
    /// Pick-set identifier.
    pub id: Uuid,
    /// Owning account.
    pub account_id: Uuid,
    /// Event the picks are for.
    pub event_id: Uuid,
    /// RFC 3339 submission timestamp.
    pub submitted_at: Option<String>,
    /// Whether a scoring pass has run.
    pub is_scored: bool,
    /// RFC 3339 scoring timestamp.
    pub scored_at: Option<String>,
    /// Sum of points over all picks.
    pub total_points: u32,
    /// Count of correct picks.
    pub correct_picks: u32,
    /// Count of picks in the set.
    pub total_picks: u32,
    /// Accuracy percentage, 0 for an empty set.
    pub accuracy: f64,
    /// The individual predictions.
    pub picks: Vec<PickDetailSummary>,
}

impl From<PickDetailEntity> for PickDetailSummary {
    fn from(detail: PickDetailEntity) -> Self {
        Self {
            position: detail.position,
            winner: detail.winner,
            method: detail.method,
            round: detail.round,
            time: detail.time,
            points: detail.points,
            is_correct: detail.is_correct,
        }
    }
}

impl From<PickSetEntity> for PickSetSummary {
    fn from(set: PickSetEntity) -> Self {
        Self {
            id: set.id,
            account_id: set.account_id,
            event_id: set.event_id,
            submitted_at: set.submitted_at.map(format_system_time),
            is_scored: set.is_scored,
            scored_at: set.scored_at.map(format_system_time),
            total_points: set.total_points,
            correct_picks: set.correct_picks,
            total_picks: set.total_picks,
            accuracy: set.accuracy,
            picks: set.picks.into_iter().map(Into::into).collect(),
        }
    }
}
