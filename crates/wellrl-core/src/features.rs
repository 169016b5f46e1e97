//! Rohmerkmale eines Nutzers vor der Diskretisierung.

use serde::{Deserialize, Serialize};

pub const DEFAULT_AGE: f64 = 30.0;
pub const DEFAULT_BMI: f64 = 25.0;
pub const DEFAULT_ANXIETY: f64 = 10.0;
pub const DEFAULT_ACTIVITY_DAYS: f64 = 3.0;
pub const DEFAULT_ENGAGEMENT: f64 = 0.5;
pub const DEFAULT_MOTIVATION: f64 = 3.0;

/// Merkmale, wie sie der Profil-Dienst liefert. Jedes Feld darf fehlen;
/// fehlende oder nicht-endliche Werte werden durch die `DEFAULT_*`-Konstanten
/// ersetzt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFeatures {
    pub age: Option<f64>,
    /// 0 = männlich, 1 = weiblich; größere Werte werden auf 1 geklemmt.
    pub gender: Option<u8>,
    pub bmi: Option<f64>,
    /// GAD-7-Score (0–21).
    pub anxiety_score: Option<f64>,
    #[serde(alias = "activity_week")]
    pub activity_days: Option<f64>,
    /// Engagement in [0, 1].
    pub engagement: Option<f64>,
    /// Motivation in [1, 5]. Fließt nur in die Belohnung ein, nicht in den Zustand.
    pub motivation: Option<f64>,
    pub segment: Option<String>,
}

fn finite_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

impl UserFeatures {
    #[must_use]
    pub fn age_or_default(&self) -> f64 {
        finite_or(self.age, DEFAULT_AGE)
    }

    #[must_use]
    pub fn gender_or_default(&self) -> u8 {
        self.gender.unwrap_or(0).min(1)
    }

    #[must_use]
    pub fn bmi_or_default(&self) -> f64 {
        finite_or(self.bmi, DEFAULT_BMI)
    }

    #[must_use]
    pub fn anxiety_or_default(&self) -> f64 {
        finite_or(self.anxiety_score, DEFAULT_ANXIETY)
    }

    #[must_use]
    pub fn activity_days_or_default(&self) -> f64 {
        finite_or(self.activity_days, DEFAULT_ACTIVITY_DAYS)
    }

    #[must_use]
    pub fn engagement_or_default(&self) -> f64 {
        finite_or(self.engagement, DEFAULT_ENGAGEMENT)
    }

    #[must_use]
    pub fn motivation_or_default(&self) -> f64 {
        finite_or(self.motivation, DEFAULT_MOTIVATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_non_finite_values_use_defaults() {
        let features = UserFeatures {
            age: Some(f64::NAN),
            bmi: Some(f64::INFINITY),
            gender: Some(7),
            ..UserFeatures::default()
        };
        assert!((features.age_or_default() - DEFAULT_AGE).abs() < f64::EPSILON);
        assert!((features.bmi_or_default() - DEFAULT_BMI).abs() < f64::EPSILON);
        assert_eq!(features.gender_or_default(), 1);
        assert!((features.engagement_or_default() - DEFAULT_ENGAGEMENT).abs() < f64::EPSILON);
        assert!((features.motivation_or_default() - DEFAULT_MOTIVATION).abs() < f64::EPSILON);
    }

    #[test]
    fn accepts_legacy_activity_week_field() {
        let features: UserFeatures =
            serde_json::from_str(r#"{"activity_week": 5, "segment": "Wellness Seekers"}"#)
                .expect("deserialize");
        assert_eq!(features.activity_days, Some(5.0));
        assert_eq!(features.age, None);
    }
}
