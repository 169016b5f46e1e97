#![warn(clippy::unwrap_used, clippy::expect_used)]

//! Engagement-driven adaptation of recommended activities.
//!
//! Everything in this crate is a pure transform: templates from the activity
//! catalog go in, adjusted copies or classifications come out. The policy
//! table is never touched here; the only shared signal is the engagement
//! history the serving layer keeps per user and per activity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use wellrl_core::ActivityTemplate;

pub mod history;
pub mod plan;
pub mod session;

pub use history::{mean_of_last, EngagementHistory, ADJUST_WINDOW, INCLUSION_WINDOW};
pub use plan::{
    activity_counts, adapt_program, select_activities, AdaptedProgram, MentalProgram,
    PhysicalProgram, ProgramCatalog, ProgramPlan,
};
pub use session::{ActivityCompletion, SessionSummary};

// Difficulty adjustment thresholds
/// Average engagement above which an activity gets harder
const ADJUST_UPPER: f64 = 0.7;
/// Average engagement below which an activity gets easier
const ADJUST_LOWER: f64 = 0.3;
/// Duration multiplier when increasing difficulty
const DURATION_UP: f64 = 1.15;
/// Duration multiplier when decreasing difficulty
const DURATION_DOWN: f64 = 0.85;
/// Shortest duration (minutes) a decrease may produce
const MIN_DURATION: u32 = 5;

// Inclusion thresholds
/// Minimum number of scores before an activity may be removed
const REMOVAL_MIN_SAMPLES: usize = 5;
/// Average engagement below which an activity is removed
const REMOVAL_THRESHOLD: f64 = 0.2;

// Classification thresholds
/// Average engagement above which the plan asks for more difficulty
const CLASSIFY_UPPER: f64 = 0.65;
/// Average engagement below which the plan asks for less difficulty
const CLASSIFY_LOWER: f64 = 0.35;

/// Direction of a difficulty adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyChange {
    Increased,
    Decreased,
    Maintained,
}

impl DifficultyChange {
    /// Repetition hint shown alongside the adjusted activity.
    #[must_use]
    pub fn reps_hint(self) -> &'static str {
        match self {
            DifficultyChange::Increased => "Add 2-3 more reps per set",
            DifficultyChange::Decreased => "Reduce by 2-3 reps per set",
            DifficultyChange::Maintained => "Keep current reps",
        }
    }
}

/// Adjusted copy of a catalog template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedActivity {
    #[serde(flatten)]
    pub activity: ActivityTemplate,
    pub intensity_adjustment: DifficultyChange,
    pub reps_adjustment: String,
    /// Engagement average the adjustment was based on.
    pub average_engagement: f64,
}

/// Adjusts the duration of `template` from recent engagement.
///
/// The average of the last [`ADJUST_WINDOW`] entries of `recent` is used; an
/// empty history falls back to `immediate`. `recent` is chronological.
#[must_use]
pub fn adjust(template: &ActivityTemplate, immediate: f64, recent: &[f64]) -> AdjustedActivity {
    let average = mean_of_last(recent, ADJUST_WINDOW).unwrap_or(immediate);
    let duration = f64::from(template.duration);

    let (change, duration) = if average > ADJUST_UPPER {
        (DifficultyChange::Increased, truncate(duration * DURATION_UP))
    } else if average < ADJUST_LOWER {
        (
            DifficultyChange::Decreased,
            truncate(duration * DURATION_DOWN).max(MIN_DURATION),
        )
    } else {
        (DifficultyChange::Maintained, template.duration)
    };

    let mut activity = template.clone();
    activity.duration = duration;
    AdjustedActivity {
        activity,
        intensity_adjustment: change,
        reps_adjustment: change.reps_hint().to_string(),
        average_engagement: average,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate(minutes: f64) -> u32 {
    minutes.floor().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Whether an activity stays in the plan.
///
/// Removal needs at least [`REMOVAL_MIN_SAMPLES`] scores whose recent average
/// (last [`INCLUSION_WINDOW`]) is below [`REMOVAL_THRESHOLD`].
#[must_use]
pub fn should_include(history: &[f64]) -> bool {
    match mean_of_last(history, INCLUSION_WINDOW) {
        Some(average) => !(history.len() >= REMOVAL_MIN_SAMPLES && average < REMOVAL_THRESHOLD),
        None => true,
    }
}

/// Activity names grouped by the recommended modification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPlan {
    pub keep: Vec<String>,
    pub increase_difficulty: Vec<String>,
    pub decrease_difficulty: Vec<String>,
    pub remove: Vec<String>,
}

/// Sorts activities into keep / harder / easier / remove from per-activity history.
///
/// Activities without history are kept. Order within each group follows `activities`.
pub fn classify<'a, I>(activities: I, engagement: &HashMap<String, Vec<f64>>) -> ActivityPlan
where
    I: IntoIterator<Item = &'a ActivityTemplate>,
{
    let mut plan = ActivityPlan::default();
    for activity in activities {
        let name = activity.name.clone();
        let history = engagement.get(&activity.name).map_or(&[][..], Vec::as_slice);

        if !should_include(history) {
            plan.remove.push(name);
            continue;
        }
        match mean_of_last(history, ADJUST_WINDOW) {
            Some(average) if average > CLASSIFY_UPPER => plan.increase_difficulty.push(name),
            Some(average) if average < CLASSIFY_LOWER => plan.decrease_difficulty.push(name),
            _ => plan.keep.push(name),
        }
    }
    plan
}
