//! Datensatz des Profil-Dienstes und die Rückschreib-Mengen.
//!
//! Der Profil-Dienst ist ein externer Kollaborateur: wellrl liest
//! [`UserProfile`] und liefert nach einer Empfehlung bzw. nach Feedback genau
//! die Felder zurück, die der Dienst aktualisieren soll.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::action::Action;
use crate::features::{UserFeatures, DEFAULT_ENGAGEMENT, DEFAULT_MOTIVATION};
use crate::segment::Segment;

const MIN_RATING: i64 = 1;
const MAX_RATING: i64 = 5;
const DEFAULT_RATING: i64 = 3;

fn default_engagement() -> f64 {
    DEFAULT_ENGAGEMENT
}

fn default_motivation() -> f64 {
    DEFAULT_MOTIVATION
}

fn default_rating() -> i64 {
    DEFAULT_RATING
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub age: Option<f64>,
    /// "male", "female" oder frei; nur "female" ergibt das Bit 1.
    pub gender: Option<String>,
    /// Körpergröße in cm.
    pub height: Option<f64>,
    /// Gewicht in kg.
    pub weight: Option<f64>,
    /// GAD-7 (0–21).
    pub anxiety_score: Option<f64>,
    pub activity_days: Option<f64>,
    #[serde(default = "default_engagement")]
    pub engagement_score: f64,
    #[serde(default = "default_motivation")]
    pub motivation_score: f64,
    pub segment_label: Option<i64>,
    pub last_recommended_action: Option<i64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_recommendation_timestamp: Option<OffsetDateTime>,
    #[serde(default)]
    pub workouts_completed: u32,
    #[serde(default)]
    pub meditation_sessions: u32,
}

/// Rückschreibung nach einer Empfehlung.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationUpdate {
    pub last_recommended_action: Action,
    #[serde(with = "time::serde::rfc3339")]
    pub last_recommendation_timestamp: OffsetDateTime,
}

/// Feedback-Formular, wie es der Client schickt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackForm {
    /// Änderung des Engagements, wird auf [-1, 1] geklemmt.
    #[serde(default)]
    pub engagement_delta: f64,
    #[serde(default)]
    pub workout_completed: bool,
    #[serde(default)]
    pub meditation_completed: bool,
    /// Zufriedenheit 1–5, wird geklemmt.
    #[serde(default = "default_rating")]
    pub feedback_rating: i64,
}

/// Rückschreibung nach Feedback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackUpdate {
    pub engagement_score: f64,
    pub motivation_score: f64,
    pub workouts_completed: u32,
    pub meditation_sessions: u32,
}

/// Merkmale vor und nach dem Feedback plus die Rückschreibung.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackOutcome {
    pub before: UserFeatures,
    pub after: UserFeatures,
    pub update: FeedbackUpdate,
}

impl UserProfile {
    /// BMI aus Größe und Gewicht, falls beide vorhanden und positiv.
    #[must_use]
    pub fn bmi(&self) -> Option<f64> {
        match (self.weight, self.height) {
            (Some(weight), Some(height)) if weight > 0.0 && height > 0.0 => {
                let meters = height / 100.0;
                Some(weight / (meters * meters))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn gender_bit(&self) -> u8 {
        u8::from(self.gender.as_deref() == Some("female"))
    }

    /// Segment aus dem Label; ohne Label per Heuristik, sofern Angst- und
    /// Aktivitätswerte vorliegen. Ungültige Labels ergeben das Default-Segment.
    #[must_use]
    pub fn segment(&self) -> Segment {
        match (self.segment_label, self.anxiety_score, self.activity_days) {
            (Some(id), _, _) => Segment::from_id(id).unwrap_or_default(),
            (None, Some(anxiety), Some(activity)) if anxiety.is_finite() && activity.is_finite() => {
                Segment::infer(anxiety, activity)
            }
            _ => Segment::default(),
        }
    }

    /// Zuletzt empfohlene Aktion; fehlende oder ungültige Ids ergeben `Maintain`.
    #[must_use]
    pub fn last_action(&self) -> Action {
        self.last_recommended_action
            .and_then(|id| u8::try_from(id).ok())
            .and_then(Action::from_id)
            .unwrap_or(Action::Maintain)
    }

    #[must_use]
    pub fn features(&self) -> UserFeatures {
        self.features_with(self.engagement_score, self.motivation_score)
    }

    fn features_with(&self, engagement: f64, motivation: f64) -> UserFeatures {
        UserFeatures {
            age: self.age,
            gender: Some(self.gender_bit()),
            bmi: self.bmi(),
            anxiety_score: self.anxiety_score,
            activity_days: self.activity_days,
            engagement: Some(engagement),
            motivation: Some(motivation),
            segment: Some(self.segment().label().to_string()),
        }
    }

    #[must_use]
    pub fn record_recommendation(&self, action: Action, at: OffsetDateTime) -> RecommendationUpdate {
        RecommendationUpdate {
            last_recommended_action: action,
            last_recommendation_timestamp: at,
        }
    }

    /// Wendet ein Feedback-Formular an, ohne das Profil selbst zu verändern.
    #[must_use]
    pub fn apply_feedback(&self, form: &FeedbackForm) -> FeedbackOutcome {
        let delta = if form.engagement_delta.is_finite() {
            form.engagement_delta.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        #[allow(clippy::cast_precision_loss)]
        let rating = form.feedback_rating.clamp(MIN_RATING, MAX_RATING) as f64;

        let old_engagement = if self.engagement_score.is_finite() {
            self.engagement_score
        } else {
            DEFAULT_ENGAGEMENT
        };
        let engagement = (old_engagement + delta).clamp(0.0, 1.0);

        let update = FeedbackUpdate {
            engagement_score: engagement,
            motivation_score: rating,
            workouts_completed: self.workouts_completed + u32::from(form.workout_completed),
            meditation_sessions: self.meditation_sessions + u32::from(form.meditation_completed),
        };

        FeedbackOutcome {
            before: self.features_with(old_engagement, self.motivation_score),
            after: self.features_with(engagement, rating),
            update,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile() -> UserProfile {
        serde_json::from_value(json!({
            "age": 41,
            "gender": "female",
            "height": 165,
            "weight": 70,
            "anxiety_score": 14,
            "activity_days": 2,
            "engagement_score": 0.6,
            "motivation_score": 3,
            "segment_label": 1,
            "last_recommended_action": 2,
            "workouts_completed": 4,
            "meditation_sessions": 1
        }))
        .expect("profile fixture")
    }

    #[test]
    fn features_derive_bmi_gender_and_segment() {
        let features = profile().features();
        let bmi = features.bmi.expect("bmi");
        assert!((bmi - 70.0 / (1.65 * 1.65)).abs() < 1e-9);
        assert_eq!(features.gender, Some(1));
        assert_eq!(
            features.segment.as_deref(),
            Some("Moderate Anxiety, Moderate Activity")
        );
    }

    #[test]
    fn missing_height_leaves_bmi_to_default() {
        let mut p = profile();
        p.height = None;
        assert_eq!(p.features().bmi, None);
        p.height = Some(0.0);
        assert_eq!(p.bmi(), None);
    }

    #[test]
    fn invalid_segment_label_uses_default() {
        let mut p = profile();
        p.segment_label = Some(42);
        assert_eq!(p.segment(), Segment::WellnessSeekers);
    }

    #[test]
    fn missing_segment_label_is_inferred() {
        let mut p = profile();
        p.segment_label = None;
        p.anxiety_score = Some(18.0);
        p.activity_days = Some(1.0);
        assert_eq!(p.segment(), Segment::HighAnxietyLowActivity);
        p.anxiety_score = None;
        assert_eq!(p.segment(), Segment::WellnessSeekers);
    }

    #[test]
    fn stale_last_action_defaults_to_maintain() {
        let mut p = profile();
        assert_eq!(p.last_action(), Action::IncreaseMeditation);
        p.last_recommended_action = Some(17);
        assert_eq!(p.last_action(), Action::Maintain);
        p.last_recommended_action = Some(-1);
        assert_eq!(p.last_action(), Action::Maintain);
        p.last_recommended_action = None;
        assert_eq!(p.last_action(), Action::Maintain);
    }

    #[test]
    fn feedback_clamps_and_counts() {
        let p = profile();
        let outcome = p.apply_feedback(&FeedbackForm {
            engagement_delta: 3.0,
            workout_completed: true,
            meditation_completed: false,
            feedback_rating: 9,
        });
        assert!((outcome.update.engagement_score - 1.0).abs() < f64::EPSILON);
        assert!((outcome.update.motivation_score - 5.0).abs() < f64::EPSILON);
        assert_eq!(outcome.update.workouts_completed, 5);
        assert_eq!(outcome.update.meditation_sessions, 1);
        assert_eq!(outcome.before.engagement, Some(0.6));
        assert_eq!(outcome.before.motivation, Some(3.0));
        assert_eq!(outcome.after.engagement, Some(1.0));
        assert_eq!(outcome.after.motivation, Some(5.0));
    }

    #[test]
    fn feedback_floors_engagement_at_zero() {
        let outcome = profile().apply_feedback(&FeedbackForm {
            engagement_delta: -0.9,
            workout_completed: false,
            meditation_completed: true,
            feedback_rating: 0,
        });
        assert!(outcome.update.engagement_score.abs() < f64::EPSILON);
        assert!((outcome.update.motivation_score - 1.0).abs() < f64::EPSILON);
        assert_eq!(outcome.update.meditation_sessions, 2);
    }

    #[test]
    fn recommendation_update_serializes_timestamp() {
        let at = OffsetDateTime::UNIX_EPOCH;
        let update = profile().record_recommendation(Action::Maintain, at);
        let value = serde_json::to_value(&update).expect("serialize");
        assert_eq!(value["last_recommended_action"], 5);
        assert_eq!(value["last_recommendation_timestamp"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn recommendation_timestamp_uses_four_digit_year() {
        let at = OffsetDateTime::from_unix_timestamp(1_792_300_000).expect("valid timestamp");
        let update = profile().record_recommendation(Action::IncreaseIntensity, at);
        let raw = serde_json::to_string(&update).expect("serialize");
        assert!(raw.contains("\"last_recommendation_timestamp\":\"2026-10-18T"), "{raw}");
        assert!(!raw.contains("+00"), "{raw}");

        let back: RecommendationUpdate = serde_json::from_str(&raw).expect("parse back");
        assert_eq!(back, update);
    }

    #[test]
    fn stored_profile_timestamp_round_trips_as_rfc3339() {
        let mut profile = profile();
        profile.last_recommendation_timestamp = Some(OffsetDateTime::UNIX_EPOCH);
        let value = serde_json::to_value(&profile).expect("serialize");
        assert_eq!(value["last_recommendation_timestamp"], "1970-01-01T00:00:00Z");
    }
}
