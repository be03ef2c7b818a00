//! Adaptive goal adjustment.
//!
//! The next goal is the larger of a challenge target (recent average raised
//! by the challenge rate) and a floor just above the current goal, so a goal
//! keeps moving even through a weak month and never drops.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::DailyValue;

pub const DEFAULT_CHALLENGE_RATE: f64 = 1.10;
pub const DEFAULT_FLOOR_RATE: f64 = 1.05;
pub const DEFAULT_MIN_DATA_POINTS: usize = 7;

/// Round to the nearest integer with halves going up.
///
/// Inputs are non-negative; negative values clamp to zero.
pub fn round_half_up(x: f64) -> u32 {
    let rounded = (x + 0.5).floor();
    if rounded <= 0.0 {
        0
    } else if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GoalStatus {
    InsufficientData { points: usize, required: usize },
    Maintained,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::InsufficientData { points, required } => write!(
                f,
                "insufficient data ({} of {} days recorded)",
                points, required
            ),
            GoalStatus::Maintained => write!(f, "goal maintained"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GoalDecision {
    Unchanged { goal: u32, reason: GoalStatus },
    Updated { previous: u32, goal: u32 },
}

impl GoalDecision {
    /// The goal the habit should carry after this review.
    pub fn goal(&self) -> u32 {
        match self {
            GoalDecision::Unchanged { goal, .. } | GoalDecision::Updated { goal, .. } => *goal,
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, GoalDecision::Updated { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalPolicy {
    pub challenge_rate: f64,
    pub floor_rate: f64,
    pub min_data_points: usize,
}

impl Default for GoalPolicy {
    fn default() -> Self {
        Self {
            challenge_rate: DEFAULT_CHALLENGE_RATE,
            floor_rate: DEFAULT_FLOOR_RATE,
            min_data_points: DEFAULT_MIN_DATA_POINTS,
        }
    }
}

impl GoalPolicy {
    /// Decide the next goal from `history`, which the caller has already
    /// narrowed to the review window.
    pub fn next_goal(&self, history: &[DailyValue], current_goal: u32) -> GoalDecision {
        if history.len() < self.min_data_points || history.is_empty() {
            return GoalDecision::Unchanged {
                goal: current_goal,
                reason: GoalStatus::InsufficientData {
                    points: history.len(),
                    required: self.min_data_points,
                },
            };
        }

        let total: f64 = history.iter().map(|v| f64::from(v.value)).sum();
        let average = total / history.len() as f64;

        let challenge_target = round_half_up(average * self.challenge_rate);
        let minimum_viable_target = round_half_up(f64::from(current_goal) * self.floor_rate);
        let final_goal = challenge_target.max(minimum_viable_target);

        log::debug!(
            "goal review: average={:.2} challenge={} floor={} current={}",
            average,
            challenge_target,
            minimum_viable_target,
            current_goal
        );

        if final_goal == current_goal {
            GoalDecision::Unchanged {
                goal: current_goal,
                reason: GoalStatus::Maintained,
            }
        } else {
            GoalDecision::Updated {
                previous: current_goal,
                goal: final_goal,
            }
        }
    }
}

/// [`GoalPolicy::next_goal`] with the default rates.
pub fn next_goal(history: &[DailyValue], current_goal: u32) -> GoalDecision {
    GoalPolicy::default().next_goal(history, current_goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn history(values: &[u32]) -> Vec<DailyValue> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| DailyValue::new(start + Duration::days(i as i64), v))
            .collect()
    }

    #[test]
    fn empty_history_is_insufficient() {
        assert_eq!(
            next_goal(&[], 100),
            GoalDecision::Unchanged {
                goal: 100,
                reason: GoalStatus::InsufficientData { points: 0, required: 7 },
            }
        );
    }

    #[test]
    fn six_points_is_still_insufficient() {
        let decision = next_goal(&history(&[500; 6]), 100);
        assert_eq!(decision.goal(), 100);
        assert!(matches!(
            decision,
            GoalDecision::Unchanged { reason: GoalStatus::InsufficientData { points: 6, .. }, .. }
        ));
    }

    #[test]
    fn thirty_days_at_goal_raises_by_challenge_rate() {
        let decision = next_goal(&history(&[100; 30]), 100);
        assert_eq!(decision, GoalDecision::Updated { previous: 100, goal: 110 });
    }

    #[test]
    fn underperformance_still_raises_to_floor() {
        let decision = next_goal(&history(&[50; 7]), 1000);
        assert_eq!(decision, GoalDecision::Updated { previous: 1000, goal: 1050 });
    }

    #[test]
    fn mixed_values_use_arithmetic_mean() {
        // mean 200, challenge 220, floor 105
        let decision = next_goal(&history(&[100, 300, 150, 250, 200, 180, 220]), 100);
        assert_eq!(decision.goal(), 220);
    }

    #[test]
    fn zero_goal_with_zero_history_is_maintained() {
        let decision = next_goal(&history(&[0; 10]), 0);
        assert_eq!(
            decision,
            GoalDecision::Unchanged { goal: 0, reason: GoalStatus::Maintained }
        );
    }

    #[test]
    fn maintained_when_targets_round_back_to_current() {
        let policy = GoalPolicy {
            challenge_rate: 1.0,
            floor_rate: 1.0,
            min_data_points: 7,
        };
        let decision = policy.next_goal(&history(&[40; 7]), 50);
        assert_eq!(
            decision,
            GoalDecision::Unchanged { goal: 50, reason: GoalStatus::Maintained }
        );
    }

    #[test]
    fn small_goals_round_half_up_at_the_floor() {
        // 10 * 1.05 = 10.5 -> 11, a round-half-even rule would give 10
        let decision = next_goal(&history(&[0; 7]), 10);
        assert_eq!(decision.goal(), 11);
    }

    #[test]
    fn round_half_up_pins_half_boundaries() {
        assert_eq!(round_half_up(0.5), 1);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(3.5), 4);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(0.0), 0);
        assert_eq!(round_half_up(-3.0), 0);
    }

    #[test]
    fn repeated_reviews_never_decrease() {
        let values = history(&[80; 30]);
        let mut goal = 100;
        for _ in 0..10 {
            let next = next_goal(&values, goal).goal();
            assert!(next >= goal);
            goal = next;
        }
        assert!(goal > 100);
    }

    #[test]
    fn custom_minimum_data_points() {
        let policy = GoalPolicy {
            min_data_points: 3,
            ..GoalPolicy::default()
        };
        assert!(policy.next_goal(&history(&[100; 3]), 100).is_updated());
    }

    #[test]
    fn status_text_distinguishes_reasons() {
        let insufficient = GoalStatus::InsufficientData { points: 2, required: 7 };
        assert_eq!(insufficient.to_string(), "insufficient data (2 of 7 days recorded)");
        assert_eq!(GoalStatus::Maintained.to_string(), "goal maintained");
    }

    #[test]
    fn decision_serializes_with_tag() {
        let json = serde_json::to_value(GoalDecision::Updated { previous: 100, goal: 110 }).unwrap();
        assert_eq!(json["decision"], "updated");
        assert_eq!(json["goal"], 110);
    }
}
