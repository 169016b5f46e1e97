//! Der geschlossene Aktionsraum der Empfehlungs-Policy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Anzahl der Aktionen. Der Aktionsraum wird zur Laufzeit nie erweitert.
pub const ACTION_COUNT: usize = 6;

const UNKNOWN_ACTION_NAME: &str = "Unknown Action";

/// Empfehlbare Anpassungen am Programm eines Nutzers.
///
/// Die numerischen Ids (0..=5) sind Teil des Snapshot-Formats und des
/// Nutzerprofils (`last_recommended_action`) und dürfen sich nicht ändern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Action {
    IncreaseIntensity,
    DecreaseIntensity,
    IncreaseMeditation,
    MotivationalMessage,
    IntroduceJournaling,
    Maintain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown action id {0}")]
pub struct UnknownAction(pub u8);

impl Action {
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::IncreaseIntensity,
        Action::DecreaseIntensity,
        Action::IncreaseMeditation,
        Action::MotivationalMessage,
        Action::IntroduceJournaling,
        Action::Maintain,
    ];

    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Action::IncreaseIntensity => 0,
            Action::DecreaseIntensity => 1,
            Action::IncreaseMeditation => 2,
            Action::MotivationalMessage => 3,
            Action::IntroduceJournaling => 4,
            Action::Maintain => 5,
        }
    }

    /// Position in einer Wertezeile `[f64; ACTION_COUNT]`.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.id())
    }

    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// Lesbarer Name, wie er in Antworten an Clients erscheint.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Action::IncreaseIntensity => "Increase Workout Intensity (IWI)",
            Action::DecreaseIntensity => "Decrease Workout Intensity (DWI)",
            Action::IncreaseMeditation => "Increase Meditation Frequency (IMF)",
            Action::MotivationalMessage => "Send Motivational Message (SMM)",
            Action::IntroduceJournaling => "Introduce Journaling Feature (IJF)",
            Action::Maintain => "Maintain Current Plan (MCP)",
        }
    }

    /// Begründung für den Nutzer.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Action::IncreaseIntensity => {
                "Your fitness level suggests increasing workout intensity for better results"
            }
            Action::DecreaseIntensity => "Let's ease up on intensity to prevent burnout",
            Action::IncreaseMeditation => {
                "Meditation can help with stress management and clarity"
            }
            Action::MotivationalMessage => {
                "Time for a balanced routine combining physical and mental wellness"
            }
            Action::IntroduceJournaling => {
                "Journaling can help process emotions and track progress"
            }
            Action::Maintain => "Your current routine is working well, let's maintain it",
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = UnknownAction;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(UnknownAction(id))
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        action.id()
    }
}

/// Name zu einer beliebigen (evtl. ungültigen) Aktions-Id.
#[must_use]
pub fn action_name(id: i64) -> &'static str {
    u8::try_from(id)
        .ok()
        .and_then(Action::from_id)
        .map_or(UNKNOWN_ACTION_NAME, Action::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_and_dense() {
        for (idx, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), idx);
            assert_eq!(Action::from_id(action.id()), Some(*action));
        }
        assert_eq!(Action::from_id(6), None);
    }

    #[test]
    fn action_name_handles_unknown_ids() {
        assert_eq!(action_name(0), "Increase Workout Intensity (IWI)");
        assert_eq!(action_name(5), "Maintain Current Plan (MCP)");
        assert_eq!(action_name(6), "Unknown Action");
        assert_eq!(action_name(-1), "Unknown Action");
        assert_eq!(action_name(1_000), "Unknown Action");
    }

    #[test]
    fn serializes_as_numeric_id() {
        let json = serde_json::to_string(&Action::IntroduceJournaling).expect("serialize");
        assert_eq!(json, "4");
        let back: Action = serde_json::from_str("2").expect("deserialize");
        assert_eq!(back, Action::IncreaseMeditation);
        assert!(serde_json::from_str::<Action>("9").is_err());
    }
}
