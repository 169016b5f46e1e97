//! Engagement contributions of activities and workout sessions.
//!
//! The session contribution doubles as the reward for batch feedback.

use serde::{Deserialize, Serialize};

// Activity contribution
/// Contribution of an activity that was skipped
const INCOMPLETE_PENALTY: f64 = -0.1;
/// Base contribution for completing an activity
const COMPLETION_BONUS: f64 = 0.5;
/// Bonus when motivation rose during the activity
const MOTIVATION_BONUS: f64 = 0.3;
/// Bonus for an enjoyment or overall rating at or above [`RATING_BONUS_MIN`]
const RATING_BONUS: f64 = 0.2;
const RATING_BONUS_MIN: u8 = 4;
const CONTRIBUTION_CAP: f64 = 1.0;

// Session contribution
/// Weight of the completion rate
const COMPLETION_RATE_WEIGHT: f64 = 0.5;
/// Upper bound of the motivation bonus
const MOTIVATION_DELTA_CAP: f64 = 0.3;
/// Motivation delta is divided by this before capping
const MOTIVATION_DELTA_SCALE: f64 = 5.0;

/// One activity as reported by the client after a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCompletion {
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    /// Motivation (1-5) before starting.
    #[serde(default)]
    pub motivation_before: Option<f64>,
    /// Motivation (1-5) afterwards.
    #[serde(default)]
    pub motivation_after: Option<f64>,
    /// Enjoyment (1-5).
    #[serde(default)]
    pub enjoyment_rating: Option<u8>,
    #[serde(default)]
    pub duration_minutes: u32,
}

impl ActivityCompletion {
    /// `after - before` when both ratings are present.
    #[must_use]
    pub fn motivation_delta(&self) -> Option<f64> {
        match (self.motivation_before, self.motivation_after) {
            (Some(before), Some(after)) if before.is_finite() && after.is_finite() => {
                Some(after - before)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn engagement_contribution(&self) -> f64 {
        if !self.completed {
            return INCOMPLETE_PENALTY;
        }
        let mut contribution = COMPLETION_BONUS;
        if self.motivation_delta().is_some_and(|delta| delta > 0.0) {
            contribution += MOTIVATION_BONUS;
        }
        if self.enjoyment_rating.is_some_and(|r| r >= RATING_BONUS_MIN) {
            contribution += RATING_BONUS;
        }
        contribution.min(CONTRIBUTION_CAP)
    }
}

/// Aggregated metrics of a workout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_activities: usize,
    pub completed_activities: usize,
    /// `completed / total`, 0 for an empty session.
    pub completion_rate: f64,
    pub avg_motivation_before: f64,
    pub avg_motivation_after: f64,
    pub avg_motivation_delta: f64,
    pub total_duration_minutes: u32,
    pub overall_rating: Option<u8>,
}

#[allow(clippy::cast_precision_loss)]
fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl SessionSummary {
    /// Motivation averages only cover completed activities.
    #[must_use]
    pub fn from_activities(activities: &[ActivityCompletion], overall_rating: Option<u8>) -> Self {
        let completed: Vec<&ActivityCompletion> =
            activities.iter().filter(|a| a.completed).collect();
        #[allow(clippy::cast_precision_loss)]
        let completion_rate = if activities.is_empty() {
            0.0
        } else {
            completed.len() as f64 / activities.len() as f64
        };

        Self {
            total_activities: activities.len(),
            completed_activities: completed.len(),
            completion_rate,
            avg_motivation_before: average(completed.iter().filter_map(|a| a.motivation_before)),
            avg_motivation_after: average(completed.iter().filter_map(|a| a.motivation_after)),
            avg_motivation_delta: average(completed.iter().filter_map(|a| a.motivation_delta())),
            total_duration_minutes: activities.iter().map(|a| a.duration_minutes).sum(),
            overall_rating,
        }
    }

    #[must_use]
    pub fn engagement_contribution(&self) -> f64 {
        if self.completion_rate <= 0.0 {
            return INCOMPLETE_PENALTY;
        }
        let mut contribution = self.completion_rate * COMPLETION_RATE_WEIGHT;
        if self.avg_motivation_delta > 0.0 {
            contribution +=
                (self.avg_motivation_delta / MOTIVATION_DELTA_SCALE).min(MOTIVATION_DELTA_CAP);
        }
        if self.overall_rating.is_some_and(|r| r >= RATING_BONUS_MIN) {
            contribution += RATING_BONUS;
        }
        contribution.min(CONTRIBUTION_CAP)
    }
}
