//! Turning a chosen action into concrete activities and an adapted program.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use wellrl_core::{Action, ActivityTemplate, Segment, SegmentCatalog};

/// Number of (physical, mental) activities drawn per action.
#[must_use]
pub fn activity_counts(action: Action) -> (usize, usize) {
    match action {
        Action::IncreaseIntensity => (2, 0),
        Action::DecreaseIntensity => (1, 0),
        Action::IncreaseMeditation | Action::IntroduceJournaling => (0, 2),
        Action::MotivationalMessage | Action::Maintain => (1, 1),
    }
}

/// Samples activities for `action` without replacement; short lists yield fewer.
pub fn select_activities<R: Rng + ?Sized>(
    action: Action,
    catalog: &SegmentCatalog,
    rng: &mut R,
) -> Vec<ActivityTemplate> {
    let (physical, mental) = activity_counts(action);
    catalog
        .physical
        .choose_multiple(rng, physical)
        .chain(catalog.mental.choose_multiple(rng, mental))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalProgram {
    pub name: String,
    pub description: String,
    pub exercises: Vec<String>,
    pub duration: String,
    pub frequency: String,
    pub intensity: String,
    pub progression: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentalProgram {
    pub name: String,
    pub description: String,
    pub activities: Vec<String>,
    pub duration: String,
    pub frequency: String,
    pub focus: String,
}

/// Baseline program for a segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_program: Option<PhysicalProgram>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mental_program: Option<MentalProgram>,
    #[serde(default)]
    pub reminders: Vec<String>,
}

/// Baseline programs keyed by segment label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramCatalog(pub BTreeMap<String, ProgramPlan>);

impl ProgramCatalog {
    #[must_use]
    pub fn for_segment(&self, segment: Segment) -> Option<&ProgramPlan> {
        self.0.get(segment.label())
    }
}

/// A baseline program after applying an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptedProgram {
    #[serde(flatten)]
    pub program: ProgramPlan,
    /// Empty when the program lacks the section the action targets.
    pub adaptation_reason: String,
    pub rl_action: String,
}

/// Applies `action` to a copy of `baseline`.
#[must_use]
pub fn adapt_program(baseline: &ProgramPlan, action: Action) -> AdaptedProgram {
    let mut program = baseline.clone();
    let mut reason = "";

    match action {
        Action::IncreaseIntensity => {
            if let Some(physical) = program.physical_program.as_mut() {
                physical.intensity = "Increased".to_string();
                physical.progression = "Ready for increased challenge".to_string();
                reason = "RL: Increasing workout intensity based on engagement";
            }
        }
        Action::DecreaseIntensity => {
            if let Some(physical) = program.physical_program.as_mut() {
                physical.intensity = "Reduced".to_string();
                physical.progression = "Focus on consistency and habit building".to_string();
                reason = "RL: Reducing intensity to improve adherence";
            }
        }
        Action::IncreaseMeditation => {
            if let Some(mental) = program.mental_program.as_mut() {
                mental.frequency = "Daily or increased sessions".to_string();
                mental.focus = "Enhanced mindfulness and stress reduction".to_string();
                reason = "RL: Increasing meditation for better mental health outcomes";
            }
        }
        Action::MotivationalMessage => {
            program.reminders.push("Daily motivational check-in".to_string());
            reason = "RL: Adding motivational support to boost engagement";
        }
        Action::IntroduceJournaling => {
            if let Some(mental) = program.mental_program.as_mut() {
                mental
                    .activities
                    .push("Structured journaling for reflection".to_string());
                reason = "RL: Adding journaling to improve self-awareness";
            }
        }
        Action::Maintain => {
            reason = "RL: Current plan working well, maintaining current strategy";
        }
    }

    AdaptedProgram {
        program,
        adaptation_reason: reason.to_string(),
        rl_action: action.name().to_string(),
    }
}
