//! Fixed-weight point rules applied when fight results are posted.
//!
//! A pick only earns anything once its predicted winner matches the outcome;
//! method and round credit never flows to a pick that backed the wrong
//! fighter. Rescoring always starts from zero, so running a pass twice over
//! the same outcomes converges to the same totals.

use std::time::SystemTime;

use crate::{
    config::ScoringWeights,
    dao::models::{
        EventEntity, FightOutcomeEntity, PickDetailEntity, PickSetEntity, accuracy_percent,
    },
};

/// Outcome of scoring one pick against one posted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickScore {
    /// Points earned.
    pub points: u32,
    /// Whether the predicted winner was right.
    pub is_correct: bool,
}

impl PickScore {
    const MISS: Self = Self {
        points: 0,
        is_correct: false,
    };
}

/// Score one pick against a posted outcome.
pub fn score_pick(
    weights: ScoringWeights,
    pick: &PickDetailEntity,
    outcome: &FightOutcomeEntity,
) -> PickScore {
    if pick.winner != outcome.winner {
        return PickScore::MISS;
    }

    let mut points = weights.winner;
    if pick.method == outcome.method {
        points += weights.method;
    }
    if let (Some(predicted), Some(actual)) = (pick.round, outcome.round) {
        if predicted == actual {
            points += weights.round;
        }
    }

    PickScore {
        points,
        is_correct: true,
    }
}

/// Recompute a pick-set's details and cached totals from the event's current
/// outcomes, stamping the scoring state.
///
/// Picks whose fight has no posted result yet score zero; they still count
/// towards the total so accuracy reflects the whole card.
pub fn rescore_pick_set(
    weights: ScoringWeights,
    pick_set: &mut PickSetEntity,
    event: &EventEntity,
    now: SystemTime,
) {
    let mut total_points = 0;
    let mut correct_picks = 0;

    for pick in &mut pick_set.picks {
        let outcome = event
            .fight_at(pick.position)
            .filter(|fight| fight.is_completed)
            .and_then(|fight| fight.outcome.as_ref());

        let score = match outcome {
            Some(outcome) => score_pick(weights, pick, outcome),
            None => PickScore::MISS,
        };

        pick.points = score.points;
        pick.is_correct = score.is_correct;
        total_points += score.points;
        if score.is_correct {
            correct_picks += 1;
        }
    }

    pick_set.total_points = total_points;
    pick_set.correct_picks = correct_picks;
    pick_set.total_picks = pick_set.picks.len() as u32;
    pick_set.accuracy = accuracy_percent(correct_picks, pick_set.total_picks);
    pick_set.is_scored = true;
    pick_set.scored_at = Some(now);
    pick_set.updated_at = now;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::{FightEntity, FightMethod, FightWinner, FighterEntity};
    use std::time::Duration;
    use uuid::Uuid;

    fn weights() -> ScoringWeights {
        ScoringWeights::default()
    }

    fn pick(winner: FightWinner, method: FightMethod, round: Option<u8>) -> PickDetailEntity {
        PickDetailEntity {
            position: 1,
            winner,
            method,
            round,
            time: None,
            points: 0,
            is_correct: false,
        }
    }

    fn outcome(winner: FightWinner, method: FightMethod, round: Option<u8>) -> FightOutcomeEntity {
        FightOutcomeEntity {
            winner,
            method,
            round,
            time: None,
        }
    }

    fn fighter(name: &str) -> FighterEntity {
        FighterEntity {
            name: name.into(),
            record: None,
            image_url: None,
        }
    }

    fn event_with_outcomes(outcomes: Vec<(u32, Option<FightOutcomeEntity>)>) -> EventEntity {
        let now = SystemTime::now();
        EventEntity {
            id: Uuid::new_v4(),
            name: "Test Card".into(),
            venue: None,
            event_date: now,
            pick_deadline: now - Duration::from_secs(3600),
            status: crate::dao::models::EventStatus::Completed,
            is_active: true,
            fights: outcomes
                .into_iter()
                .map(|(position, outcome)| FightEntity {
                    position,
                    fighter1: fighter("Alpha"),
                    fighter2: fighter("Bravo"),
                    is_completed: outcome.is_some(),
                    outcome,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn exact_prediction_earns_full_points() {
        let score = score_pick(
            weights(),
            &pick(FightWinner::Fighter1, FightMethod::KoTko, Some(2)),
            &outcome(FightWinner::Fighter1, FightMethod::KoTko, Some(2)),
        );
        assert_eq!(score.points, 5);
        assert!(score.is_correct);
    }

    #[test]
    fn wrong_round_still_earns_winner_and_method() {
        let score = score_pick(
            weights(),
            &pick(FightWinner::Fighter1, FightMethod::KoTko, Some(2)),
            &outcome(FightWinner::Fighter1, FightMethod::KoTko, Some(3)),
        );
        assert_eq!(score.points, 4);
        assert!(score.is_correct);
    }

    #[test]
    fn wrong_winner_earns_nothing_even_with_matching_method() {
        let score = score_pick(
            weights(),
            &pick(FightWinner::Fighter2, FightMethod::KoTko, Some(2)),
            &outcome(FightWinner::Fighter1, FightMethod::KoTko, Some(2)),
        );
        assert_eq!(score.points, 0);
        assert!(!score.is_correct);
    }

    #[test]
    fn decision_prediction_matches_decision_outcome() {
        let score = score_pick(
            weights(),
            &pick(FightWinner::Fighter1, FightMethod::Decision, None),
            &outcome(FightWinner::Fighter1, FightMethod::Decision, None),
        );
        // No round to credit on a decision.
        assert_eq!(score.points, 4);
        assert!(score.is_correct);
    }

    #[test]
    fn rescoring_is_idempotent() {
        let event = event_with_outcomes(vec![(
            1,
            Some(outcome(FightWinner::Fighter1, FightMethod::KoTko, Some(2))),
        )]);
        let now = SystemTime::now();
        let mut set = PickSetEntity {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            event_id: event.id,
            is_submitted: true,
            submitted_at: Some(now),
            is_scored: false,
            scored_at: None,
            total_points: 0,
            correct_picks: 0,
            total_picks: 1,
            accuracy: 0.0,
            picks: vec![pick(FightWinner::Fighter1, FightMethod::KoTko, Some(2))],
            created_at: now,
            updated_at: now,
        };

        rescore_pick_set(weights(), &mut set, &event, now);
        assert_eq!(set.total_points, 5);
        assert_eq!(set.correct_picks, 1);
        assert_eq!(set.accuracy, 100.0);
        assert!(set.is_scored);

        // A second pass over the same outcomes must not change anything.
        rescore_pick_set(weights(), &mut set, &event, now);
        assert_eq!(set.total_points, 5);
        assert_eq!(set.correct_picks, 1);
    }

    #[test]
    fn picks_for_unscored_fights_count_towards_accuracy() {
        let event = event_with_outcomes(vec![
            (
                1,
                Some(outcome(FightWinner::Fighter1, FightMethod::KoTko, Some(2))),
            ),
            (2, None),
        ]);
        let now = SystemTime::now();
        let mut set = PickSetEntity {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            event_id: event.id,
            is_submitted: true,
            submitted_at: Some(now),
            is_scored: false,
            scored_at: None,
            total_points: 0,
            correct_picks: 0,
            total_picks: 2,
            accuracy: 0.0,
            picks: vec![
                pick(FightWinner::Fighter1, FightMethod::KoTko, Some(2)),
                PickDetailEntity {
                    position: 2,
                    ..pick(FightWinner::Fighter1, FightMethod::Decision, None)
                },
            ],
            created_at: now,
            updated_at: now,
        };

        rescore_pick_set(weights(), &mut set, &event, now);
        assert_eq!(set.total_points, 5);
        assert_eq!(set.correct_picks, 1);
        assert_eq!(set.total_picks, 2);
        assert_eq!(set.accuracy, 50.0);
    }
}
