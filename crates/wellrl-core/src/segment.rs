//! Nutzersegmente und ihre Ids im Zustandsvektor.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "High Anxiety, Low Activity")]
    HighAnxietyLowActivity,
    #[serde(rename = "Moderate Anxiety, Moderate Activity")]
    ModerateAnxietyModerateActivity,
    #[serde(rename = "Low Anxiety, High Activity")]
    LowAnxietyHighActivity,
    #[serde(rename = "Physical Health Risk")]
    PhysicalHealthRisk,
    /// Kanonisches Default-Segment für unbekannte Labels.
    #[default]
    #[serde(rename = "Wellness Seekers")]
    WellnessSeekers,
    #[serde(rename = "Inactive, Unengaged")]
    InactiveUnengaged,
}

impl Segment {
    pub const ALL: [Segment; 6] = [
        Segment::HighAnxietyLowActivity,
        Segment::ModerateAnxietyModerateActivity,
        Segment::LowAnxietyHighActivity,
        Segment::PhysicalHealthRisk,
        Segment::WellnessSeekers,
        Segment::InactiveUnengaged,
    ];

    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Segment::HighAnxietyLowActivity => 0,
            Segment::ModerateAnxietyModerateActivity => 1,
            Segment::LowAnxietyHighActivity => 2,
            Segment::PhysicalHealthRisk => 3,
            Segment::WellnessSeekers => 4,
            Segment::InactiveUnengaged => 5,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Segment::HighAnxietyLowActivity => "High Anxiety, Low Activity",
            Segment::ModerateAnxietyModerateActivity => "Moderate Anxiety, Moderate Activity",
            Segment::LowAnxietyHighActivity => "Low Anxiety, High Activity",
            Segment::PhysicalHealthRisk => "Physical Health Risk",
            Segment::WellnessSeekers => "Wellness Seekers",
            Segment::InactiveUnengaged => "Inactive, Unengaged",
        }
    }

    #[must_use]
    pub fn from_id(id: i64) -> Option<Self> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| Self::ALL.get(idx))
            .copied()
    }

    /// Exakter Label-Vergleich; unbekannte Labels fallen auf das Default-Segment.
    #[must_use]
    pub fn lookup(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|segment| segment.label() == label)
            .unwrap_or_default()
    }

    /// Heuristische Zuordnung aus GAD-7-Score und aktiven Tagen pro Woche.
    ///
    /// Greift nur, wenn das Profil kein Segment-Label trägt.
    #[must_use]
    pub fn infer(anxiety_score: f64, activity_days: f64) -> Self {
        if anxiety_score > 15.0 && activity_days < 3.0 {
            Segment::HighAnxietyLowActivity
        } else if anxiety_score > 10.0 && activity_days < 4.0 {
            Segment::ModerateAnxietyModerateActivity
        } else if anxiety_score < 10.0 && activity_days >= 4.0 {
            Segment::LowAnxietyHighActivity
        } else {
            Segment::PhysicalHealthRisk
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_falls_back_to_wellness_seekers() {
        assert_eq!(Segment::lookup("Physical Health Risk").id(), 3);
        assert_eq!(Segment::lookup("physical health risk"), Segment::WellnessSeekers);
        assert_eq!(Segment::lookup(""), Segment::WellnessSeekers);
        assert_eq!(Segment::default().id(), 4);
    }

    #[test]
    fn from_id_rejects_out_of_range() {
        assert_eq!(Segment::from_id(5), Some(Segment::InactiveUnengaged));
        assert_eq!(Segment::from_id(6), None);
        assert_eq!(Segment::from_id(-2), None);
    }

    #[test]
    fn infer_follows_anxiety_and_activity_thresholds() {
        assert_eq!(Segment::infer(18.0, 1.0), Segment::HighAnxietyLowActivity);
        assert_eq!(Segment::infer(12.0, 3.0), Segment::ModerateAnxietyModerateActivity);
        assert_eq!(Segment::infer(4.0, 5.0), Segment::LowAnxietyHighActivity);
        assert_eq!(Segment::infer(10.0, 5.0), Segment::PhysicalHealthRisk);
    }

    #[test]
    fn serializes_with_label() {
        let json = serde_json::to_string(&Segment::InactiveUnengaged).expect("serialize");
        assert_eq!(json, "\"Inactive, Unengaged\"");
    }
}
